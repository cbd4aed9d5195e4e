//! Bilinear sampling.
//!
//! Blends the 2x2 texels at `floor(u, v)` and `floor(u, v) + 1` by the
//! fractional parts of `u, v`. Each tap is wrapped independently, so a
//! repeated footprint straddling the right edge mixes the last and first
//! columns, and border taps contribute zero without cancelling the sample.
//!
//! Subtract 0.5 from `u, v` beforehand for texel-centred filtering.

use crate::basics::{ifloor, Texel};
use crate::image_accessors::{ImageAccessor, WrapMode};
use crate::image_filters::linear_weights;
use crate::image_view::ImageView;

/// Weights of the taps `(x0, y0)`, `(x1, y0)`, `(x0, y1)`, `(x1, y1)` for
/// fractional offsets `fx`, `fy`.
#[inline]
pub fn bilinear_weights(fx: f32, fy: f32) -> [f32; 4] {
    let [wx0, wx1] = linear_weights(fx);
    let [wy0, wy1] = linear_weights(fy);
    [wx0 * wy0, wx1 * wy0, wx0 * wy1, wx1 * wy1]
}

/// Bilinear sample with independent wrap modes per axis.
///
/// `out` must hold exactly `image.components()` values; all of them are
/// overwritten. Integer formats blend in `f32` and round to nearest.
pub fn bilinear_wrapmode<T: Texel>(
    image: &ImageView<'_, T>,
    out: &mut [T],
    u: f32,
    v: f32,
    wrap_u: WrapMode,
    wrap_v: WrapMode,
) {
    debug_assert_eq!(out.len(), image.components());
    let acc = ImageAccessor::new(*image, wrap_u, wrap_v);

    let x0 = ifloor(u);
    let y0 = ifloor(v);
    let weights = bilinear_weights(u - u.floor(), v - v.floor());

    let cols = [acc.column(x0), acc.column(x0.saturating_add(1))];
    let rows = [acc.row(y0), acc.row(y0.saturating_add(1))];

    // Border taps stay `None` and are skipped below.
    let mut taps: [Option<(&[T], f32)>; 4] = [None; 4];
    for (i, tap) in taps.iter_mut().enumerate() {
        if let (Some(cx), Some(cy)) = (cols[i & 1], rows[i >> 1]) {
            *tap = Some((image.texel(cx, cy), weights[i]));
        }
    }

    if taps.iter().all(Option::is_none) {
        out.fill(T::ZERO);
        return;
    }

    for (ch, o) in out.iter_mut().enumerate().take(image.components()) {
        let mut sum = 0.0f32;
        for (texel, w) in taps.iter().flatten() {
            sum += w * texel[ch].to_f32();
        }
        *o = T::from_f32(sum);
    }
}

/// Bilinear sample; texels outside the image are transparent black.
#[inline]
pub fn bilinear_border<T: Texel>(image: &ImageView<'_, T>, out: &mut [T], u: f32, v: f32) {
    bilinear_wrapmode(image, out, u, v, WrapMode::Border, WrapMode::Border);
}

/// Bilinear sample; texels outside the image repeat the edge.
#[inline]
pub fn bilinear_clamp<T: Texel>(image: &ImageView<'_, T>, out: &mut [T], u: f32, v: f32) {
    bilinear_wrapmode(image, out, u, v, WrapMode::Extend, WrapMode::Extend);
}

/// Bilinear sample of the image tiled in both directions.
#[inline]
pub fn bilinear_repeat<T: Texel>(image: &ImageView<'_, T>, out: &mut [T], u: f32, v: f32) {
    bilinear_wrapmode(image, out, u, v, WrapMode::Repeat, WrapMode::Repeat);
}

/// Bilinear sample of a four-channel image, returned by value.
#[inline]
pub fn bilinear_rgba<T: Texel>(
    image: &ImageView<'_, T>,
    u: f32,
    v: f32,
    wrap_u: WrapMode,
    wrap_v: WrapMode,
) -> [T; 4] {
    let mut out = [T::ZERO; 4];
    bilinear_wrapmode(image, &mut out, u, v, wrap_u, wrap_v);
    out
}

// ============================================================================
// Tests
// ============================================================================
