use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::kernel::time::{tick_duration, TICK_MS};

/// Tunables for the engagement loop.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    /// Silence allowed while engaged before dropping to disengaged capture.
    pub engaged_timeout_secs: u64,
    /// Silence allowed while disengaged before going idle.
    pub disengaged_timeout_secs: u64,
    /// Failed dispatches tolerated in engaged mode.
    pub engaged_gibberish_limit: u32,
    /// Fallback/failed utterances tolerated in disengaged mode.
    pub disengaged_gibberish_limit: u32,
    /// Intent name the recognizer uses for "no specific skill".
    pub fallback_intent: String,
    /// Name that must appear in the `id` slot while disengaged.
    pub wake_name: String,
    /// Form of address prefixed to the first delivered report.
    pub title: String,
    pub ringing_tick_ms: u64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            engaged_timeout_secs: 20,
            disengaged_timeout_secs: 60,
            engaged_gibberish_limit: 2,
            disengaged_gibberish_limit: 5,
            fallback_intent: "general".to_string(),
            wake_name: "alex".to_string(),
            title: "Sir".to_string(),
            ringing_tick_ms: TICK_MS,
        }
    }
}

impl EngagementConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn engaged_timeout(&self) -> Duration {
        Duration::from_secs(self.engaged_timeout_secs)
    }

    pub fn disengaged_timeout(&self) -> Duration {
        Duration::from_secs(self.disengaged_timeout_secs)
    }

    pub fn ringing_tick(&self) -> Duration {
        tick_duration(self.ringing_tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg = EngagementConfig::from_json_str(r#"{ "disengaged_gibberish_limit": 3 }"#).unwrap();
        assert_eq!(cfg.disengaged_gibberish_limit, 3);
        assert_eq!(cfg.engaged_gibberish_limit, 2);
        assert_eq!(cfg.engaged_timeout(), Duration::from_secs(20));
        assert_eq!(cfg.fallback_intent, "general");
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(matches!(
            EngagementConfig::from_json_str("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }
}
