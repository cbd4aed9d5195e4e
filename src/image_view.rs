//! Borrowed, row-major view over a caller-owned pixel buffer.
//!
//! The samplers never own or mutate pixel storage. An [`ImageView`] ties a
//! flat slice to its dimensions and channel count, validating the length once
//! so every later texel fetch is a plain slice index.

use crate::basics::Texel;
use crate::error::ImageError;

// ============================================================================
// ImageView
// ============================================================================

/// Immutable view of a tightly packed image: `width * height` texels of
/// `components` channels each, rows stored top to bottom.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    components: usize,
}

impl<'a, T: Texel> ImageView<'a, T> {
    /// Wrap `data` as a `width x height` image with `components` channels.
    ///
    /// Dimensions must be positive and fit in an `i32`, since texel
    /// coordinates are resolved in signed integer space.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        components: usize,
    ) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            log::debug!("rejecting {width}x{height} image view");
            return Err(ImageError::ZeroDimension { width, height });
        }
        if components == 0 {
            log::debug!("rejecting image view without components");
            return Err(ImageError::ZeroComponents);
        }
        let too_large = ImageError::TooLarge {
            width,
            height,
            components,
        };
        if width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(too_large);
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(components))
            .ok_or(too_large)?;
        if data.len() != expected {
            log::debug!(
                "rejecting image view: {} samples for {width}x{height}x{components}",
                data.len()
            );
            return Err(ImageError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            components,
        })
    }

    /// Wrap a four-channel (RGBA) buffer.
    pub fn new_rgba(data: &'a [T], width: usize, height: usize) -> Result<Self, ImageError> {
        Self::new(data, width, height, 4)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }

    /// The underlying samples.
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Channels of the texel at `(x, y)`.
    ///
    /// Panics if the coordinate lies outside the image; samplers only call
    /// this with indices produced by the boundary resolver.
    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> &'a [T] {
        debug_assert!(x < self.width && y < self.height);
        let off = (y * self.width + x) * self.components;
        &self.data[off..off + self.components]
    }

    /// First four channels of the texel at `(x, y)` converted to `f32`.
    ///
    /// Missing colour channels read as zero and a missing alpha as one, so
    /// one- and three-channel images behave as opaque.
    #[inline]
    pub fn texel_rgba_f32(&self, x: usize, y: usize) -> [f32; 4] {
        let t = self.texel(x, y);
        let mut out = [0.0, 0.0, 0.0, 1.0];
        for (o, s) in out.iter_mut().zip(t.iter()) {
            *o = s.to_f32();
        }
        out
    }
}

// ============================================================================
// Tests
// ============================================================================
