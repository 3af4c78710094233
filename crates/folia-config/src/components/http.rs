//! HTTP transport configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_address: String,
    pub port: u16,
    pub enable_cors: bool,
    pub max_request_size_mb: usize,
    /// Root of the per-project image folders served under `/images`.
    pub images_dir: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            enable_cors: true,
            max_request_size_mb: 10,
            images_dir: PathBuf::from("./images"),
        }
    }
}

impl HttpConfig {
    pub fn max_request_bytes(&self) -> usize {
        self.max_request_size_mb * 1024 * 1024
    }
}
