//! Error types for Emmet integration

use thiserror::Error;

/// Errors returned by an [`Expander`](crate::expander::Expander)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// The abbreviation does not parse under the engine's grammar
    #[error("Invalid abbreviation `{abbreviation}`: {message}")]
    InvalidAbbreviation { abbreviation: String, message: String },

    /// The engine failed for any other reason
    #[error("Expansion engine error: {0}")]
    Engine(String),
}

impl ExpandError {
    pub fn invalid(abbreviation: impl Into<String>, message: impl Into<String>) -> Self {
        ExpandError::InvalidAbbreviation {
            abbreviation: abbreviation.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while configuring or wiring the integration
#[derive(Debug, Error)]
pub enum EmmetError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The host editor (or one of its registries) was not supplied
    #[error("Host unavailable: {0}")]
    HostUnavailable(String),

    /// None of the tokenization probes matched a text model
    #[error("No tokenizer available for model {0}")]
    TokenizerUnavailable(u64),

    /// Language identifier without an Emmet syntax
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Expansion failure surfaced through an explicit API call
    #[error("Expansion error: {0}")]
    Expansion(#[from] ExpandError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EmmetError {
    pub fn config_error(message: impl Into<String>) -> Self {
        EmmetError::ConfigError(message.into())
    }

    pub fn host_unavailable(message: impl Into<String>) -> Self {
        EmmetError::HostUnavailable(message.into())
    }
}

/// Result type for Emmet operations
pub type EmmetResult<T> = Result<T, EmmetError>;
