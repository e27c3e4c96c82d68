use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Native engine error: {0}")]
    Engine(String),

    #[error("Native object already released: {0}")]
    Released(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
