use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("invalid question mappings: {0}")]
    InvalidMappings(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
