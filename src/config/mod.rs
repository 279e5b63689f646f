use crate::error::{Result, StoreError};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, Level};

pub const DEFAULT_BASE_URL: &str = "https://play.google.com";

/// Switches for the two record flavours the detail extractor can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Store logo and screenshots as opaque image identifiers instead of raw CDN URLs.
    pub normalize_images: bool,
    /// Run the publish date through the date parser instead of keeping the page text.
    pub parse_dates: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            normalize_images: true,
            parse_dates: true,
        }
    }
}

impl ExtractOptions {
    /// Raw URLs and raw date strings, exactly as printed on the page.
    pub fn raw() -> Self {
        Self {
            normalize_images: false,
            parse_dates: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    /// Interface language, sent as `hl`.
    pub language: String,
    /// Storefront country, sent as `gl`.
    pub country: String,
    pub timeout_secs: u64,
    /// Fixed user agent. When unset every request carries a fresh one.
    pub user_agent: Option<String>,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    pub extract: ExtractOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "en".to_string(),
            country: "us".to_string(),
            timeout_secs: 30,
            user_agent: None,
            log_level: "info".to_string(),
            extract: ExtractOptions::default(),
        }
    }
}

impl StoreConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: StoreConfig = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(StoreError::InvalidArgument(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<Level> {
        Level::from_str(&self.log_level)
            .map_err(|_| StoreError::InvalidArgument(format!("unknown log level {}", self.log_level)))
    }

    pub fn http_client(&self) -> Result<Client> {
        let mut builder = Client::builder().timeout(Duration::from_secs(self.timeout_secs));
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder.build()?;
        info!("Created HTTP client for {}", self.base_url);
        Ok(client)
    }

    /// Installs the fmt subscriber. A second call is a no-op.
    pub fn init_tracing(&self) -> Result<()> {
        let level = self.level()?;
        let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"country": "de", "extract": {{"normalize_images": false}}}}"#
        )
        .unwrap();

        let config = StoreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.country, "de");
        assert_eq!(config.language, "en");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.extract.normalize_images);
        assert!(config.extract.parse_dates);
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"log_level": "loud"}}"#).unwrap();

        let err = StoreConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_url": "ftp://mirror"}}"#).unwrap();

        assert!(StoreConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = StoreConfig::from_file("/nonexistent/store.json").unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
