use thiserror::Error;

#[derive(Debug, Error)]
pub enum RcbarError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Unknown profile family: {0}")]
    UnknownProfileFamily(String),

    #[error("Unknown group name: {0}")]
    UnknownGroupName(String),

    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("Insert failed: {0}")]
    InsertFailed(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RcbarError {
    /// Shorthand for a missing or malformed named parameter.
    pub fn parameter(name: impl Into<String>) -> Self {
        Self::InvalidParameter(name.into())
    }

    pub fn degenerate(what: impl Into<String>) -> Self {
        Self::DegenerateGeometry(what.into())
    }
}

pub type Result<T> = std::result::Result<T, RcbarError>;
