//! Nearest (point) sampling.
//!
//! Returns the texel at `floor(u), floor(v)`. This is "nearest" only if the
//! caller subtracts 0.5 from the coordinates first; without the offset the
//! fractional part is simply dropped, so texel `x` covers `[x, x + 1)`.
//!
//! The border/clamp/repeat entry points are thin wrappers over
//! [`nearest_wrapmode`] with fixed modes, letting the optimiser fold the
//! wrap dispatch away.

use crate::basics::{ifloor, Texel};
use crate::image_accessors::{ImageAccessor, WrapMode};
use crate::image_view::ImageView;

/// Point sample with independent wrap modes per axis.
///
/// `out` must hold exactly `image.components()` values; all of them are
/// overwritten. Border texels produce zeros.
#[inline]
pub fn nearest_wrapmode<T: Texel>(
    image: &ImageView<'_, T>,
    out: &mut [T],
    u: f32,
    v: f32,
    wrap_u: WrapMode,
    wrap_v: WrapMode,
) {
    debug_assert_eq!(out.len(), image.components());
    ImageAccessor::new(*image, wrap_u, wrap_v).copy_pixel(ifloor(u), ifloor(v), out);
}

/// Point sample; outside the image the result is transparent black.
#[inline]
pub fn nearest_border<T: Texel>(image: &ImageView<'_, T>, out: &mut [T], u: f32, v: f32) {
    nearest_wrapmode(image, out, u, v, WrapMode::Border, WrapMode::Border);
}

/// Point sample; outside the image the edge texels are repeated.
#[inline]
pub fn nearest_clamp<T: Texel>(image: &ImageView<'_, T>, out: &mut [T], u: f32, v: f32) {
    nearest_wrapmode(image, out, u, v, WrapMode::Extend, WrapMode::Extend);
}

/// Point sample of the image tiled infinitely in both directions.
#[inline]
pub fn nearest_repeat<T: Texel>(image: &ImageView<'_, T>, out: &mut [T], u: f32, v: f32) {
    nearest_wrapmode(image, out, u, v, WrapMode::Repeat, WrapMode::Repeat);
}

/// Point sample of a four-channel image, returned by value.
#[inline]
pub fn nearest_rgba<T: Texel>(
    image: &ImageView<'_, T>,
    u: f32,
    v: f32,
    wrap_u: WrapMode,
    wrap_v: WrapMode,
) -> [T; 4] {
    let mut out = [T::ZERO; 4];
    nearest_wrapmode(image, &mut out, u, v, wrap_u, wrap_v);
    out
}

// ============================================================================
// Tests
// ============================================================================
