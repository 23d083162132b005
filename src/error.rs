use thiserror::Error;

pub type AxisResult<T> = Result<T, AxisError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AxisError {
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invert is undefined: {0}")]
    InvertUndefined(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
