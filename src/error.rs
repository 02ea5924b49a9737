use std::io;

use thiserror::Error;

/// Everything that can go wrong in a single run. All of these are fatal:
/// the tool is single-shot and never retries.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("failed to parse stylesheet: {0}")]
    Parse(String),

    #[error("invalid content value {0:?}")]
    Value(String),

    #[error("unknown icon {0:?}")]
    Lookup(String),

    #[error("unknown color {0:?}")]
    Color(String),

    #[error("failed to load font: {0}")]
    Font(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, IconError>;
