//! Static JSON documents: where they live and how they are read.

use std::{fmt, fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::model::{History, Item};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resource {
    Prices,
    History(String),
}

impl Resource {
    /// Path relative to the data root.
    pub fn path(&self) -> String {
        match self {
            Resource::Prices => "prices.json".to_string(),
            Resource::History(material) => format!("history/{}.json", material),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Prices => write!(f, "prices"),
            Resource::History(material) => write!(f, "history/{}", material),
        }
    }
}

/// Anything that can hand out a document body by relative path.
pub trait Source: Send + Sync {
    fn get(&self, path: &str) -> Result<String>;
    fn describe(&self) -> String;
}

pub struct HttpSource {
    base: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("mc-prices/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(HttpSource {
            base: base.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl Source for HttpSource {
    fn get(&self, path: &str) -> Result<String> {
        let url = format!("{}/{}", self.base, path);
        let body = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("GET {}", url))?
            .error_for_status()?
            .text()?;
        Ok(body)
    }

    fn describe(&self) -> String {
        self.base.clone()
    }
}

pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }
}

impl Source for DirSource {
    fn get(&self, path: &str) -> Result<String> {
        let file = self.root.join(path);
        fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// `http://` and `https://` roots are fetched over the network, anything else
/// is a directory on disk.
pub fn source_from(root: &str) -> Result<Arc<dyn Source>> {
    if root.starts_with("http://") || root.starts_with("https://") {
        Ok(Arc::new(HttpSource::new(root)?))
    } else {
        Ok(Arc::new(DirSource::new(root)))
    }
}

/// Single-attempt document reads. Failures are logged and reported as `None`.
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn Source>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn Source>) -> Self {
        Fetcher { source }
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// One read of `resource` parsed as JSON, or `None` after logging why not.
    pub fn fetch(&self, resource: &Resource) -> Option<serde_json::Value> {
        match self.try_fetch(resource) {
            Ok(value) => {
                debug!(%resource, "fetched");
                Some(value)
            }
            Err(err) => {
                warn!(%resource, "fetch failed: {err:#}");
                None
            }
        }
    }

    pub fn prices(&self) -> Option<Vec<Item>> {
        self.fetch_as(&Resource::Prices)
    }

    pub fn history(&self, material: &str) -> Option<History> {
        self.fetch_as(&Resource::History(material.to_string()))
    }

    fn fetch_as<T: DeserializeOwned>(&self, resource: &Resource) -> Option<T> {
        let value = self.fetch(resource)?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(%resource, "unexpected document shape: {err}");
                None
            }
        }
    }

    fn try_fetch(&self, resource: &Resource) -> Result<serde_json::Value> {
        let body = self.source.get(&resource.path())?;
        serde_json::from_str(&body).with_context(|| format!("parsing {}", resource.path()))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MemorySource;
    use super::*;

    const PRICES: &str = r#"[{"material":"IRON_INGOT","category":"Metal","buyPrice":10,"sellPrice":5,"buyOrders":2,"sellOrders":1}]"#;

    #[test]
    fn resource_paths() {
        assert_eq!(Resource::Prices.path(), "prices.json");
        assert_eq!(Resource::History("GOLD_INGOT".into()).path(), "history/GOLD_INGOT.json");
    }

    #[test]
    fn prices_parse_from_source() {
        let source = MemorySource::with(&[("prices.json", PRICES)]);
        let fetcher = Fetcher::new(source.clone());
        let items = fetcher.prices().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].material, "IRON_INGOT");
        assert_eq!(source.request_count(), 1);
    }

    #[test]
    fn missing_document_is_none_after_one_attempt() {
        let source = MemorySource::with(&[]);
        let fetcher = Fetcher::new(source.clone());
        assert!(fetcher.history("DIRT").is_none());
        assert_eq!(source.request_count(), 1);
        assert_eq!(source.requests.lock().unwrap()[0], "history/DIRT.json");
    }

    #[test]
    fn malformed_json_is_none() {
        let source = MemorySource::with(&[("prices.json", "<html>not json</html>")]);
        assert!(Fetcher::new(source).prices().is_none());
    }

    #[test]
    fn valid_json_with_wrong_shape_is_none() {
        let source = MemorySource::with(&[("prices.json", r#"{"items":[]}"#)]);
        let fetcher = Fetcher::new(source.clone());
        assert!(fetcher.fetch(&Resource::Prices).is_some());
        assert!(fetcher.prices().is_none());
        assert_eq!(source.request_count(), 2);
    }

    #[test]
    fn raw_fetch_returns_json_value() {
        let source = MemorySource::with(&[("prices.json", PRICES)]);
        let value = Fetcher::new(source).fetch(&Resource::Prices).unwrap();
        assert_eq!(value[0]["category"], "Metal");
    }

    #[test]
    fn directory_source_reads_files() {
        let root = std::env::temp_dir().join(format!("mc-prices-dir-{}", std::process::id()));
        fs::create_dir_all(root.join("history")).unwrap();
        fs::write(root.join("prices.json"), PRICES).unwrap();
        fs::write(root.join("history/IRON_INGOT.json"), r#"{"HOURLY":[]}"#).unwrap();

        let fetcher = Fetcher::new(source_from(root.to_str().unwrap()).unwrap());
        assert_eq!(fetcher.prices().unwrap().len(), 1);
        assert!(fetcher.history("IRON_INGOT").unwrap().hourly.is_empty());
        assert!(fetcher.history("GOLD_INGOT").is_none());

        fs::remove_dir_all(&root).ok();
    }
}
