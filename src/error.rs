//! Errors raised when wrapping a caller buffer in an [`ImageView`].
//!
//! Sampling itself never fails; every check happens once, up front.
//!
//! [`ImageView`]: crate::image_view::ImageView

use thiserror::Error;

/// Reasons a buffer cannot be viewed as an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    #[error("image must have at least one component per texel")]
    ZeroComponents,

    #[error("image dimensions {width}x{height}x{components} overflow addressable size")]
    TooLarge {
        width: usize,
        height: usize,
        components: usize,
    },

    #[error("buffer holds {actual} samples, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}
