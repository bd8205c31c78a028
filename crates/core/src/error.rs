use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("polling interval must be a positive number of milliseconds")]
    NonPositiveInterval,
    #[error("polling interval {0:?} is too long to schedule")]
    IntervalTooLarge(std::time::Duration),
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}
