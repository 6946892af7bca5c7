use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Root holding `<client>/index.json` and `<client>/<object-id>` files.
    pub data_root: PathBuf,
    /// Artificial latency before the sample object is returned.
    pub sample_delay_ms: u64,
    pub fetch_timeout_ms: Option<u64>,
    /// Chunks buffered between the store and the response body.
    pub stream_buffer: usize,
    /// Treat every bearer token as a client id. Development only.
    pub allow_any_token: bool,
    /// Bearer token to client id.
    pub tokens: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_root: PathBuf::from("./data"),
            sample_delay_ms: 3_000,
            fetch_timeout_ms: None,
            stream_buffer: 16,
            allow_any_token: false,
            tokens: HashMap::new(),
        }
    }
}

impl ServerConfig {
    /// Load a TOML config file. Missing keys take their default values.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn retrieval(&self) -> RetrievalConfig {
        RetrievalConfig {
            sample_delay: Duration::from_millis(self.sample_delay_ms),
            fetch_timeout: self.fetch_timeout_ms.map(Duration::from_millis),
            stream_buffer: self.stream_buffer,
        }
    }
}

/// Tunables of the retrieval flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetrievalConfig {
    pub sample_delay: Duration,
    pub fetch_timeout: Option<Duration>,
    pub stream_buffer: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        ServerConfig::default().retrieval()
    }
}

impl RetrievalConfig {
    /// No artificial latency and no deadline; for tests and embedding.
    pub fn immediate() -> Self {
        Self {
            sample_delay: Duration::ZERO,
            ..Default::default()
        }
    }
}
