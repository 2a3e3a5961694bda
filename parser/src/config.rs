use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::RequestShape;

pub const PARSE_PATH: &str = "api/parse";

/// Settings of the viewer. Every field has a default, so a config file
/// only needs the ones it changes.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Base address of the producer; `api/parse` is appended.
    pub endpoint: String,
    /// Upper bound on one request, after which it counts as failed.
    pub timeout_ms: u64,
    pub request_shape: RequestShape,
    pub stderr_log_level: u32,
    pub buffer_log_level: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8001/".to_string(),
            timeout_ms: 30_000,
            request_shape: RequestShape::Nested,
            stderr_log_level: 1,
            buffer_log_level: 0,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: ViewerConfig = serde_json::from_str(text).context("invalid viewer config")?;
        cfg.parse_url()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `<endpoint>/api/parse`, tolerating a missing trailing slash on the endpoint.
    pub fn parse_url(&self) -> Result<Url> {
        let mut base = Url::parse(&self.endpoint)
            .with_context(|| format!("invalid endpoint {:?}", self.endpoint))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(PARSE_PATH)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let cfg = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(cfg, ViewerConfig::default());
        assert_eq!(cfg.parse_url().unwrap().as_str(), "http://127.0.0.1:8001/api/parse");

        let cfg = ViewerConfig::from_json(
            r#"{"endpoint": "https://lr.example.org/tools", "timeout_ms": 500, "request_shape": "flat"}"#,
        )
        .unwrap();
        assert_eq!(cfg.parse_url().unwrap().as_str(), "https://lr.example.org/tools/api/parse");
        assert_eq!(cfg.timeout(), Duration::from_millis(500));
        assert_eq!(cfg.request_shape, RequestShape::Flat);

        assert!(ViewerConfig::from_json(r#"{"endpoint": "not a url"}"#).is_err());
    }
}
