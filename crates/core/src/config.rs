use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// Serializable observer settings, as read from a settings file or CLI flags.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ObserverSettings {
    /// Polling interval in milliseconds
    pub interval_ms: u64,
    pub watch_text: bool,
    pub watch_image: bool,
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            watch_text: true,
            watch_image: false, // Image comparison encodes a PNG every tick
        }
    }
}

impl ObserverSettings {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn interval(&self) -> Result<Duration, ConfigError> {
        validate_interval(Duration::from_millis(self.interval_ms))
    }
}

/// Rejects a zero polling interval instead of letting the timer spin, and
/// one too long to schedule a deadline for.
pub fn validate_interval(interval: Duration) -> Result<Duration, ConfigError> {
    if interval.is_zero() {
        return Err(ConfigError::NonPositiveInterval);
    }
    if Instant::now().checked_add(interval).is_none() {
        return Err(ConfigError::IntervalTooLarge(interval));
    }
    Ok(interval)
}
