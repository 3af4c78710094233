//! Rebuild scheduling

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RebuildConfig {
    /// Seconds between rebuilds. Zero rebuilds once at startup.
    pub interval_secs: u64,
}

impl RebuildConfig {
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }
}
