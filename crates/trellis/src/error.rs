use skin::SkinError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrellisError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Unknown control {0}")]
    UnknownControl(String),

    #[error("Skin error: {0}")]
    Skin(#[from] SkinError),

    #[error("The frame thread is no longer accepting invocations")]
    InvokeClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logger error: {0}")]
    Logger(String),
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, TrellisError>;
