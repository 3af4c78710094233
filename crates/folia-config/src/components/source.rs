//! Record source configuration
//!
//! The snapshot is rebuilt from a directory of JSON collection dumps,
//! one array file per collection.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory holding `works.json`, `relations.json` and friends.
    pub data_dir: PathBuf,
    /// Logical database name, reported in logs and `/health`.
    pub database: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            database: "FaithInterFolia".to_string(),
        }
    }
}
