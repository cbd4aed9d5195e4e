//! Foundation types and numeric helpers shared by every sampler.
//!
//! Holds the [`Texel`] abstraction over the two supported sample formats
//! (`u8` and `f32`) and the floor/modulo helpers that coordinate handling
//! is built on.

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Floor an `f32` to the nearest integer toward negative infinity.
///
/// Out-of-range values saturate to `i32::MIN`/`i32::MAX` and NaN maps to 0,
/// following the semantics of `as` casts.
#[inline]
pub fn ifloor(v: f32) -> i32 {
    v.floor() as i32
}

/// Floating-point modulo whose result has the sign of the divisor.
///
/// For a positive `b` the result lies in `[0, b)` for every finite `a`, which
/// makes repeated coordinates continuous across zero. Rounding can yield
/// exactly `b` for tiny negative `a`; index-level wrapping in
/// [`crate::image_accessors`] does not depend on this function for that reason.
#[inline]
pub fn floored_fmod(a: f32, b: f32) -> f32 {
    a - b * (a / b).floor()
}

// ============================================================================
// Texel — per-channel sample format
// ============================================================================

/// A single channel value of a pixel buffer.
///
/// Filters blend in `f32`; this trait converts stored values into the blend
/// domain and back. Conversion is raw: `u8` maps to `0.0..=255.0`, no
/// normalisation and no transfer function is applied.
pub trait Texel: Copy + Default + PartialEq + Send + Sync + 'static {
    /// The value written for void (border) samples.
    const ZERO: Self;

    /// Convert to the blend domain.
    fn to_f32(self) -> f32;

    /// Convert a blended value back to the storage format.
    ///
    /// Integer formats round to nearest and saturate, so negative lobes and
    /// overshoot of cubic kernels never wrap around.
    fn from_f32(v: f32) -> Self;
}

impl Texel for u8 {
    const ZERO: Self = 0;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        // NaN saturates to 0 through the cast.
        (v + 0.5).clamp(0.0, 255.0) as u8
    }
}

impl Texel for f32 {
    const ZERO: Self = 0.0;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }
}

// ============================================================================
// Tests
// ============================================================================
