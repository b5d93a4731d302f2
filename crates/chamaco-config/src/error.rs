//! Configuration error types.

/// Errors that can occur when locating, loading, saving, or parsing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The platform has no per-user config directory and none was given.
    #[error("no config directory available; pass --config")]
    NoConfigDir,

    /// Failed to read `config.ron`.
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to write `config.ron`.
    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),

    /// `config.ron` is not valid RON for [`crate::Config`].
    #[error("failed to parse config: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// Failed to serialize the config to RON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),
}
