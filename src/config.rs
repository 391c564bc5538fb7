//! Configuration file handling for budgetflow.
//!
//! The configuration file is stored at `$BUDGET_HOME/config.json` and holds the URL of the
//! transaction store, where to find its API key, and where the dashboard animations live.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "budgetflow";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const ASSETS: &str = "assets";
const API_KEY: &str = "api_key";
const CONFIG_JSON: &str = "config.json";
const TEST_STORE_JSON: &str = "test_store.json";

/// The animations shown on the dashboard and the files they are loaded from by default.
pub const DEFAULT_ANIMATIONS: [(&str, &str); 3] = [
    ("growth", "growth.json"),
    ("glitch", "glitch.json"),
    ("cashflow", "cashflow.json"),
];

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGET_HOME` and from there it loads `$BUDGET_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the budget home directory, its subdirectories and:
    /// - Creates an initial `config.json` file pointing at `store_url`
    /// - Moves `api_key_file` into its default location in the secrets directory.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the budget home, e.g. `$HOME/budgetflow`
    /// - `api_key_file` - A file holding the key used to authenticate with the store.
    /// - `store_url` - The base URL of the store, e.g. `https://abcdefgh.supabase.co`
    ///
    /// # Errors
    /// - Returns an error if `store_url` is not a valid URL or any file operation fails.
    pub async fn create(
        dir: impl Into<PathBuf>,
        api_key_file: &Path,
        store_url: &str,
    ) -> Result<Self> {
        let store_url = validate_store_url(store_url)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the budget home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;
        utils::make_dir(root.join(ASSETS)).await?;

        utils::rename(api_key_file, secrets.join(API_KEY)).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            store_url,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `budget_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the secrets directory exists
    pub async fn load(budget_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = budget_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The budget home directory is missing, run 'budgetflow init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            secrets: root.join(SECRETS),
            root,
            config_path,
            config_file,
        };
        utils::read_dir(&config.secrets)
            .await
            .context("The secrets directory is missing or unreadable")?;
        debug!("Loaded config from {}", config.config_path.display());
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn store_url(&self) -> &str {
        &self.config_file.store_url
    }

    /// The file that `TestStore` persists to when running in test mode.
    pub fn test_store_path(&self) -> PathBuf {
        self.root.join(TEST_STORE_JSON)
    }

    /// Returns the stored `api_key_path` if it is absolute, otherwise resolves the relative path.
    pub fn api_key_path(&self) -> PathBuf {
        self.resolve(self.config_file.api_key_path())
    }

    /// Reads the store API key.
    pub async fn api_key(&self) -> Result<String> {
        let path = self.api_key_path();
        let key = utils::read(&path)
            .await
            .context("Unable to read the store API key")?;
        let key = key.trim();
        if key.is_empty() {
            bail!("The store API key file '{}' is empty", path.display())
        }
        Ok(key.to_string())
    }

    /// The directory that relative animation URLs are resolved against.
    pub fn asset_dir(&self) -> PathBuf {
        self.resolve(self.config_file.asset_dir())
    }

    /// The URL of the named dashboard animation, if one is configured.
    pub fn animation(&self, name: &str) -> Option<&str> {
        self.config_file.animations.get(name).map(String::as_str)
    }

    /// All configured animations, by name.
    pub fn animations(&self) -> &BTreeMap<String, String> {
        &self.config_file.animations
    }

    fn resolve(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budgetflow",
///   "config_version": 1,
///   "store_url": "https://abcdefgh.supabase.co",
///   "api_key_path": ".secrets/api_key",
///   "asset_dir": "assets",
///   "animations": {
///     "cashflow": "cashflow.json",
///     "glitch": "glitch.json",
///     "growth": "https://assets.example.com/growth.json"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budgetflow"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the transaction store
    store_url: String,

    /// Path to the store API key (optional, relative to the budget home or absolute)
    /// Defaults to $BUDGET_HOME/.secrets/api_key if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key_path: Option<PathBuf>,

    /// Directory for local animation files (optional, relative to the budget home or absolute)
    /// Defaults to $BUDGET_HOME/assets if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    asset_dir: Option<PathBuf>,

    /// Dashboard animations by name. Values are either `http(s)` URLs or paths inside `asset_dir`.
    #[serde(default = "default_animations")]
    animations: BTreeMap<String, String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            store_url: String::new(),
            api_key_path: None,
            asset_dir: None,
            animations: default_animations(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Unable to load the config file")?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file, expected {}",
            config.config_version,
            CONFIG_VERSION
        );
        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }

    fn api_key_path(&self) -> PathBuf {
        self.api_key_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(API_KEY))
    }

    fn asset_dir(&self) -> PathBuf {
        self.asset_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(ASSETS))
    }
}

fn default_animations() -> BTreeMap<String, String> {
    DEFAULT_ANIMATIONS
        .iter()
        .map(|(name, file)| (name.to_string(), file.to_string()))
        .collect()
}

/// Checks that `store_url` is an absolute http(s) URL and strips any trailing slash.
fn validate_store_url(store_url: &str) -> Result<String> {
    let url = url::Url::parse(store_url)
        .with_context(|| format!("Invalid store URL '{store_url}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("The store URL must use http or https, got '{}'", url.scheme())
    }
    Ok(store_url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const URL: &str = "https://abcdefgh.supabase.co";

    #[tokio::test]
    async fn test_config_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("budget_home");
        let key_file = dir.path().join("key.txt");
        utils::write(&key_file, "secret-key\n").await.unwrap();

        let created = Config::create(&home, &key_file, &format!("{URL}/"))
            .await
            .unwrap();
        assert_eq!(created.store_url(), URL);
        assert!(created.secrets().is_dir());
        assert!(!key_file.exists());
        assert_eq!(created.api_key().await.unwrap(), "secret-key");

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.store_url(), URL);
        assert_eq!(loaded.asset_dir(), loaded.root().join(ASSETS));
        assert_eq!(loaded.animation("growth"), Some("growth.json"));
        assert_eq!(loaded.animations().len(), 3);
        assert_eq!(loaded.test_store_path(), loaded.root().join(TEST_STORE_JSON));
    }

    #[tokio::test]
    async fn test_config_create_rejects_bad_url() {
        let dir = TempDir::new().unwrap();
        let key_file = dir.path().join("key.txt");
        utils::write(&key_file, "k").await.unwrap();
        assert!(Config::create(dir.path(), &key_file, "not a url").await.is_err());
        assert!(Config::create(dir.path(), &key_file, "ftp://x.example")
            .await
            .is_err());
        // The key is only moved once the URL has been accepted.
        assert!(key_file.exists());
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let message = format!("{:#}", Config::load(dir.path()).await.unwrap_err());
        assert!(message.contains("The config file is missing"));
    }

    #[tokio::test]
    async fn test_config_file_minimal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "budgetflow",
            "config_version": 1,
            "store_url": "https://x.supabase.co"
        }"#;
        utils::write(&path, json).await.unwrap();

        let config = ConfigFile::load(&path).await.unwrap();
        assert_eq!(config.animations, default_animations());
        assert_eq!(config.api_key_path(), PathBuf::from(SECRETS).join(API_KEY));
        assert_eq!(config.asset_dir(), PathBuf::from(ASSETS));
    }

    #[tokio::test]
    async fn test_config_file_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{"app_name": "moneyapp", "config_version": 1, "store_url": ""}"#;
        utils::write(&path, json).await.unwrap();

        let result = ConfigFile::load(&path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let mut original = ConfigFile {
            store_url: URL.to_string(),
            api_key_path: Some(PathBuf::from("/etc/budgetflow/key")),
            ..ConfigFile::default()
        };
        original
            .animations
            .insert("growth".to_string(), "https://cdn.example.com/g.json".to_string());
        original.save(&path).await.unwrap();

        let loaded = ConfigFile::load(&path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("api_key_path"));
        assert!(!json.contains("asset_dir"));
    }
}
