use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the budget home directory, its subdirectories and:
/// - Creates an initial `config.json` file pointing at `store_url`
/// - Moves `api_key_file` into the secrets directory.
///
/// # Arguments
/// - `budget_home` - The directory that will be the root of the budget home, e.g.
///   `$HOME/budgetflow`
/// - `api_key_file` - A file holding the store API key.
/// - `store_url` - The base URL of the store, e.g. `https://abcdefgh.supabase.co`
///
/// # Errors
/// - Returns an error if `store_url` is invalid or any file operations fail.
pub async fn init(budget_home: &Path, api_key_file: &Path, store_url: &str) -> Result<Out<()>> {
    let config = Config::create(budget_home, api_key_file, store_url)
        .await
        .context("Unable to create the budget home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the budgetflow directory at {}",
        config.root().display()
    )
    .into())
}
