//! Error types

/// Errors raised while building a select configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The placeholder is empty or only whitespace.
    #[error("Placeholder must not be empty")]
    EmptyPlaceholder,
}
