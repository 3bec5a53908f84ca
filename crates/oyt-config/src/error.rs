use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Google API key is not defined.")]
    MissingApiKey,

    #[error("Input selector is not defined.")]
    MissingInputSelector,

    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config format: {0}")]
    Parse(#[from] serde_json::Error),
}
