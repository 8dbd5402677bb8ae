use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlipError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("malformed ingredient encoding: {0}")]
    MalformedEncoding(String),

    #[error("invalid recipe {unique_id}: {reason}")]
    InvalidRecipe { unique_id: u64, reason: String },

    #[error("item not found: {0}")]
    ItemNotFound(u32),

    #[error("bad configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FlipError>;
