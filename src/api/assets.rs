//! Loading of the dashboard animations.
//!
//! An animation is a JSON document identified by a URL. Documents are fetched at most once per
//! `AssetCache`; a failed fetch is logged, degrades to `Animation::Placeholder` and is retried the
//! next time it is asked for.

use crate::{utils, Result};
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// The result of asking for an animation. Loading never fails outright.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "document", rename_all = "snake_case")]
pub enum Animation {
    Document(Value),
    Placeholder,
}

impl Animation {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Animation::Placeholder)
    }
}

/// Successfully parsed animation documents by URL. It is never invalidated.
#[derive(Debug, Default, Clone)]
pub struct AssetCache {
    documents: HashMap<String, Value>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&Value> {
        self.documents.get(url)
    }

    pub fn insert(&mut self, url: impl Into<String>, document: Value) {
        self.documents.insert(url.into(), document);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.documents.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Somewhere animation documents can be fetched from.
#[async_trait::async_trait]
pub trait AssetSource {
    async fn fetch(&self, url: &str) -> Result<Value>;
}

/// Fetches `http://` and `https://` URLs over the network and reads anything else as a file
/// relative to `asset_dir`.
pub struct HttpAssetSource {
    client: reqwest::Client,
    asset_dir: PathBuf,
}

impl HttpAssetSource {
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            asset_dir: asset_dir.into(),
        }
    }

    async fn fetch_remote(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to request the animation at {url}"))?;
        let status = response.status();
        anyhow::ensure!(
            status.is_success(),
            "Fetching the animation at {url} failed with status {status}"
        );
        response
            .json::<Value>()
            .await
            .with_context(|| format!("The animation at {url} is not valid JSON"))
    }

    async fn fetch_local(&self, url: &str) -> Result<Value> {
        let path = self.asset_dir.join(url.trim_start_matches('/'));
        utils::deserialize(&path).await
    }
}

#[async_trait::async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, url: &str) -> Result<Value> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.fetch_remote(url).await
        } else {
            self.fetch_local(url).await
        }
    }
}

/// Resolves animation URLs to documents through an `AssetCache`.
pub struct AssetLoader {
    source: Box<dyn AssetSource + Send + Sync>,
    cache: AssetCache,
}

impl AssetLoader {
    pub fn new(source: Box<dyn AssetSource + Send + Sync>, cache: AssetCache) -> Self {
        Self { source, cache }
    }

    /// Returns the cached document for `url` or fetches it. Any failure is logged and turned into
    /// `Animation::Placeholder` without touching the cache.
    pub async fn load(&mut self, url: &str) -> Animation {
        if let Some(document) = self.cache.get(url) {
            debug!("Animation cache hit for {url}");
            return Animation::Document(document.clone());
        }
        match self.source.fetch(url).await {
            Ok(document) => {
                self.cache.insert(url, document.clone());
                Animation::Document(document)
            }
            Err(e) => {
                warn!("Unable to load the animation at {url}: {e:#}");
                Animation::Placeholder
            }
        }
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Gives the cache back so that it can be handed to another loader.
    pub fn into_cache(self) -> AssetCache {
        self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Serves a fixed document for one URL, fails for everything else, and counts fetches.
    struct FakeSource {
        url: &'static str,
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl AssetSource for FakeSource {
        async fn fetch(&self, url: &str) -> Result<Value> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if url == self.url {
                Ok(json!({"v": "5.7.4", "layers": []}))
            } else {
                Err(anyhow!("404 Not Found"))
            }
        }
    }

    fn loader(url: &'static str) -> (AssetLoader, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = FakeSource {
            url,
            fetches: fetches.clone(),
        };
        (AssetLoader::new(Box::new(source), AssetCache::new()), fetches)
    }

    #[tokio::test]
    async fn test_fetches_once() {
        let (mut loader, fetches) = loader("/growth.json");
        let first = loader.load("/growth.json").await;
        let second = loader.load("/growth.json").await;
        assert_eq!(first, second);
        assert!(!first.is_placeholder());
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(loader.cache().contains("/growth.json"));
    }

    #[tokio::test]
    async fn test_failure_is_placeholder_and_not_cached() {
        let (mut loader, fetches) = loader("/growth.json");
        assert_eq!(loader.load("/glitch.json").await, Animation::Placeholder);
        assert_eq!(loader.load("/glitch.json").await, Animation::Placeholder);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert!(loader.cache().is_empty());
    }

    #[tokio::test]
    async fn test_preloaded_cache_skips_fetch() {
        let (loader, fetches) = loader("/growth.json");
        let mut cache = loader.into_cache();
        cache.insert("/cashflow.json", json!({"cached": true}));
        let source = FakeSource {
            url: "/growth.json",
            fetches: fetches.clone(),
        };
        let mut loader = AssetLoader::new(Box::new(source), cache);
        assert_eq!(
            loader.load("/cashflow.json").await,
            Animation::Document(json!({"cached": true}))
        );
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_files() {
        let dir = TempDir::new().unwrap();
        utils::write(dir.path().join("growth.json"), r#"{"fr": 30}"#)
            .await
            .unwrap();
        utils::write(dir.path().join("broken.json"), "{not json")
            .await
            .unwrap();
        let source = HttpAssetSource::new(dir.path());

        assert_eq!(source.fetch("/growth.json").await.unwrap(), json!({"fr": 30}));
        assert_eq!(source.fetch("growth.json").await.unwrap(), json!({"fr": 30}));
        assert!(source.fetch("broken.json").await.is_err());
        assert!(source.fetch("missing.json").await.is_err());

        let mut loader = AssetLoader::new(Box::new(source), AssetCache::new());
        assert!(loader.load("broken.json").await.is_placeholder());
        assert!(!loader.load("growth.json").await.is_placeholder());
        assert_eq!(loader.cache().len(), 1);
    }

    #[test]
    fn test_animation_serialization() {
        let value = serde_json::to_value(Animation::Placeholder).unwrap();
        assert_eq!(value, json!({"status": "placeholder"}));
    }
}
