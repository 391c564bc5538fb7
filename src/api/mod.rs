//! The remote systems budgetflow talks to: the transaction store and the animation assets.
//!
//! The `Store` trait is the seam between the ledger and the backend. `SupabaseStore` talks to the
//! hosted REST API, `TestStore` keeps everything in memory so the whole program can run without a
//! network connection.

mod assets;
mod supabase;
mod test_store;

use crate::model::{NewTransaction, Transaction};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use assets::{Animation, AssetCache, AssetLoader, AssetSource, HttpAssetSource};
pub use supabase::SupabaseStore;
pub use test_store::TestStore;

/// The name of the table that holds transactions.
pub const TRANSACTIONS: &str = "transactions";

/// When this environment variable is set and non-empty, the in-memory `TestStore` is used.
pub const TEST_MODE_ENV: &str = "BUDGETFLOW_IN_TEST_MODE";

/// The order in which `Store::fetch_all` returns rows.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// Newest `date` first. Ties keep whatever order the store returns them in.
    #[default]
    DateDescending,
    Unordered,
}

serde_plain::derive_display_from_serialize!(Order);
serde_plain::derive_fromstr_from_deserialize!(Order);

/// The capability to read and create transactions.
#[async_trait::async_trait]
pub trait Store {
    /// Retrieves every stored transaction.
    async fn fetch_all(&mut self, order: Order) -> Result<Vec<Transaction>>;

    /// Creates one transaction. The store assigns `id`, `owner` and `created_at`.
    async fn insert(&mut self, transaction: &NewTransaction) -> Result<()>;
}

/// Decides which `Store` implementation is used.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Remote,
    Test,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    /// `Mode::Test` if `BUDGETFLOW_IN_TEST_MODE` is set to a non-empty value, otherwise
    /// `Mode::Remote`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Remote,
        }
    }
}

/// Builds the store for `mode`.
pub async fn store(config: &Config, mode: Mode) -> Result<Box<dyn Store + Send>> {
    debug!("Using the {mode} store");
    Ok(match mode {
        Mode::Remote => Box::new(SupabaseStore::new(config).await?),
        Mode::Test => Box::new(TestStore::load(config.test_store_path()).await?),
    })
}

/// Sorts newest first. The sort is stable so rows with equal dates keep their relative order.
/// Dates that cannot be parsed sort last.
pub(crate) fn sort_date_descending(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.day().cmp(&a.day()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Kind;
    use crate::test::tx;
    use std::str::FromStr;

    #[test]
    fn test_sort_date_descending() {
        let mut transactions = vec![
            tx("a", "1", Kind::Debit, "2024-03-01"),
            tx("b", "1", Kind::Debit, "bogus"),
            tx("c", "1", Kind::Debit, "2024-03-05"),
            tx("d", "1", Kind::Debit, "2024-03-05T08:00:00"),
        ];
        sort_date_descending(&mut transactions);
        let ids: Vec<_> = transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn test_mode_strings() {
        assert_eq!(Mode::from_str("test").unwrap(), Mode::Test);
        assert_eq!(Mode::Remote.to_string(), "remote");
        assert_eq!(Order::default(), Order::DateDescending);
    }
}
