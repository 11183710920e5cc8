use thiserror::Error;

/// Failures raised by the bridge itself. Collaborator (platform, object
/// store) failures travel as port error strings and surface through the
/// use-case boundary instead.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
