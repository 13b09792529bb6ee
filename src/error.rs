use thiserror::Error;

/// Errors surfaced while loading, generating or rendering contribution data.
#[derive(Error, Debug)]
pub enum VizError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid contributions document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Plotting error: {0}")]
    Plot(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, VizError>;
