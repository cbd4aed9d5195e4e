//! Bicubic sampling with Mitchell-Netravali kernels.
//!
//! Reads the 4x4 texels spanning `floor(u, v) - 1 ..= floor(u, v) + 2` and
//! weights them with the outer product of two 1D cubic weight vectors.
//! The default entry points clamp to the image edge; [`cubic_wrapmode`]
//! accepts any per-axis wrap mode.
//!
//! Subtract 0.5 from `u, v` beforehand for texel-centred filtering.

use crate::basics::{ifloor, Texel};
use crate::image_accessors::{ImageAccessor, WrapMode};
use crate::image_filters::CubicFilter;
use crate::image_view::ImageView;

/// Bicubic sample with independent wrap modes per axis.
///
/// `out` must hold exactly `image.components()` values; all of them are
/// overwritten. Kernels with negative lobes may overshoot the input range;
/// integer formats saturate, float formats keep the overshoot.
pub fn cubic_wrapmode<T: Texel>(
    image: &ImageView<'_, T>,
    out: &mut [T],
    u: f32,
    v: f32,
    filter: &CubicFilter,
    wrap_u: WrapMode,
    wrap_v: WrapMode,
) {
    debug_assert_eq!(out.len(), image.components());
    let acc = ImageAccessor::new(*image, wrap_u, wrap_v);

    let x0 = ifloor(u);
    let y0 = ifloor(v);
    let wx = filter.weights(u - u.floor());
    let wy = filter.weights(v - v.floor());

    let mut cols = [None; 4];
    let mut rows = [None; 4];
    for k in 0..4 {
        let offset = k as i32 - 1;
        cols[k] = acc.column(x0.saturating_add(offset));
        rows[k] = acc.row(y0.saturating_add(offset));
    }

    let mut taps: [[Option<&[T]>; 4]; 4] = [[None; 4]; 4];
    let mut any = false;
    for (row_taps, row) in taps.iter_mut().zip(rows) {
        for (tap, col) in row_taps.iter_mut().zip(cols) {
            if let (Some(cx), Some(cy)) = (col, row) {
                *tap = Some(image.texel(cx, cy));
                any = true;
            }
        }
    }

    if !any {
        out.fill(T::ZERO);
        return;
    }

    for (ch, o) in out.iter_mut().enumerate().take(image.components()) {
        let mut sum = 0.0f32;
        for (row_taps, w_row) in taps.iter().zip(wy) {
            let mut row_sum = 0.0f32;
            for (tap, w_col) in row_taps.iter().zip(wx) {
                if let Some(texel) = tap {
                    row_sum += w_col * texel[ch].to_f32();
                }
            }
            sum += w_row * row_sum;
        }
        *o = T::from_f32(sum);
    }
}

/// Bicubic sample with an arbitrary kernel, clamped to the image edge.
#[inline]
pub fn cubic<T: Texel>(
    image: &ImageView<'_, T>,
    out: &mut [T],
    u: f32,
    v: f32,
    filter: &CubicFilter,
) {
    cubic_wrapmode(image, out, u, v, filter, WrapMode::Extend, WrapMode::Extend);
}

/// Cubic B-spline sample (B = 1, C = 0): smooth, no ringing.
#[inline]
pub fn cubic_bspline<T: Texel>(image: &ImageView<'_, T>, out: &mut [T], u: f32, v: f32) {
    cubic(image, out, u, v, &CubicFilter::BSPLINE);
}

/// Cubic Mitchell sample (B = C = 1/3): sharper, mild ringing.
#[inline]
pub fn cubic_mitchell<T: Texel>(image: &ImageView<'_, T>, out: &mut [T], u: f32, v: f32) {
    cubic(image, out, u, v, &CubicFilter::MITCHELL);
}

/// Cubic B-spline sample of a four-channel image, returned by value.
#[inline]
pub fn cubic_bspline_rgba<T: Texel>(image: &ImageView<'_, T>, u: f32, v: f32) -> [T; 4] {
    let mut out = [T::ZERO; 4];
    cubic_bspline(image, &mut out, u, v);
    out
}

/// Cubic Mitchell sample of a four-channel image, returned by value.
#[inline]
pub fn cubic_mitchell_rgba<T: Texel>(image: &ImageView<'_, T>, u: f32, v: f32) -> [T; 4] {
    let mut out = [T::ZERO; 4];
    cubic_mitchell(image, &mut out, u, v);
    out
}

// ============================================================================
// Tests
// ============================================================================
