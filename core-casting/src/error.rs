use thiserror::Error;

#[derive(Error, Debug)]
pub enum CastingError {
    #[error("No tokio runtime available to drive renderer discovery: {0}")]
    RuntimeUnavailable(String),

    #[error("Invalid discovery settings: {0}")]
    InvalidSettings(#[from] core_runtime::Error),
}

pub type Result<T> = std::result::Result<T, CastingError>;
