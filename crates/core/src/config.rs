use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Host the WebSocket listener binds to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port the browser extension connects to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether to evict a process already holding the port before binding.
    #[serde(default = "default_evict")]
    pub evict_port: bool,
    /// Upper bound on waiting for the port to free up, in milliseconds.
    #[serde(default = "default_bind_max_wait_ms")]
    pub bind_max_wait_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9001
}

fn default_evict() -> bool {
    true
}

fn default_bind_max_wait_ms() -> u64 {
    10_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            evict_port: default_evict(),
            bind_max_wait_ms: default_bind_max_wait_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsConfig {
    /// Append an accessibility snapshot after mutating commands.
    #[serde(default = "default_snapshot")]
    pub snapshot: bool,
    /// Reply window for one command round-trip, in milliseconds.
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

fn default_snapshot() -> bool {
    true
}

fn default_send_timeout_ms() -> u64 {
    crate::message::DEFAULT_SEND_TIMEOUT_MS
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot(),
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".webbridge"))
            .unwrap_or_else(|| PathBuf::from(".webbridge"))
            .join("config.yaml")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Load from the given (or default) path, falling back to defaults when
    /// no config file exists.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
