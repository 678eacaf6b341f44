use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Listing source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid filter spec: {0}")]
    InvalidFilter(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
