use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::connection::ConnectionLimits;

/// Server configuration.
///
/// Loaded from the YAML file named by `RAWHTTP_CONFIG` when set, otherwise
/// defaults. `LISTEN` and `PUBLIC_DIR` override the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Root of the routed file tree.
    pub public_dir: PathBuf,
    /// File extensions that become routes.
    pub route_extensions: Vec<String>,
    pub read_timeout_ms: u64,
    pub max_request_bytes: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
            public_dir: PathBuf::from("public"),
            route_extensions: ["html", "js", "css", "ico"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            read_timeout_ms: 10_000,
            max_request_bytes: 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var("RAWHTTP_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.listen_addr = listen_addr;
        }
        if let Ok(public_dir) = std::env::var("PUBLIC_DIR") {
            cfg.public_dir = PathBuf::from(public_dir);
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn limits(&self) -> ConnectionLimits {
        ConnectionLimits {
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            max_request_bytes: self.max_request_bytes,
        }
    }
}
