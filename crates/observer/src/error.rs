use clipwatch_core::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("clipboard observer needs a tokio runtime")]
    NoRuntime,
}
