use thiserror::Error;

/// subreport error types
#[derive(Error, Debug)]
pub enum SubreportError {
    /// Failed to parse or serialize JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Account key is not an integer user id
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    /// Account has transactions but no pubkey
    #[error("account {0:?} has transactions but no pubkey")]
    MissingPubkey(String),

    /// Command name not present in the command table
    #[error("Unknown command '{0}'.")]
    UnknownCommand(String),
}

/// Result type alias for subreport
pub type Result<T> = std::result::Result<T, SubreportError>;
