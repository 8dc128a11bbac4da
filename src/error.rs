//! Error types shared by every icon operation.

use thiserror::Error;

/// Errors produced while reading, composing, or generating icons.
///
/// The first three variants form the domain taxonomy; the remaining ones wrap
/// failures from the underlying I/O, image, and JSON layers unchanged.
#[derive(Debug, Error)]
pub enum IconError {
    /// A manifest, layer asset, or source file does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A value could not be interpreted (color string, hex color, image dimensions).
    #[error("{0}")]
    Format(String),

    /// A source image failed a precondition (must be a square PNG).
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl IconError {
    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IconError>;
