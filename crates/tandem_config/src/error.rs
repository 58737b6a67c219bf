//! Configuration errors.

/// Errors raised while loading or validating `tandem.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML could not be parsed into the expected shape.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A value parsed but is not usable.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
