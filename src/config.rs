use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on bytes read from a connection before parsing.
    pub read_budget: usize,
    /// Artificial delay before a file response is written.
    pub file_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            read_budget: 4096,
            file_delay_ms: 500,
        }
    }
}

impl ServerConfig {
    pub fn file_delay(&self) -> Duration {
        Duration::from_millis(self.file_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub root: PathBuf,
    pub allowed_extensions: Vec<String>,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            allowed_extensions: [".html", ".png", ".pdf", ".jpg"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("invalid config")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_yaml(&text)
    }

    /// Builds the effective config: optional YAML file first, then the
    /// served directory and port given on the command line or environment.
    pub fn load(
        config_file: Option<&Path>,
        root: PathBuf,
        port: Option<u16>,
    ) -> anyhow::Result<Self> {
        let mut cfg = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        cfg.static_files.root = root;
        if let Some(port) = port {
            cfg.server.port = port;
        }

        Ok(cfg)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
