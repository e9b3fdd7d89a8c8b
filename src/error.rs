use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid shape: {0}")]
    InvalidShape(String),
}

pub type Result<T> = std::result::Result<T, Error>;
