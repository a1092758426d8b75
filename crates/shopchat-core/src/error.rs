use thiserror::Error;

/// Top-level error type for ShopChat.
///
/// Subsystem crates define their own error types and convert into this one
/// where they cross crate boundaries, so `?` works across the workspace.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShopchatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),
}

impl From<toml::de::Error> for ShopchatError {
    fn from(err: toml::de::Error) -> Self {
        ShopchatError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ShopchatError {
    fn from(err: toml::ser::Error) -> Self {
        ShopchatError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ShopchatError {
    fn from(err: serde_json::Error) -> Self {
        ShopchatError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for ShopChat operations.
pub type Result<T> = std::result::Result<T, ShopchatError>;
