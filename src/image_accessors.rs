//! Texel access with boundary handling.
//!
//! Maps integer texel coordinates that may fall outside the image onto valid
//! indices according to a per-axis [`WrapMode`]: extend (clamp to edge),
//! repeat (tiling) or border (transparent black).
//!
//! [`ImageSampler`] exposes the same wrapped reads to the EWA filter.

use crate::basics::Texel;
use crate::ewa_filter::PixelSource;
use crate::image_view::ImageView;

// ============================================================================
// WrapMode
// ============================================================================

/// Policy for coordinates outside `[0, extent)` along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// Image edges extend outward: coordinates clamp to the first/last texel.
    #[default]
    Extend,
    /// The image tiles: coordinates wrap with a floored modulo.
    Repeat,
    /// Everything outside the image is transparent black.
    Border,
}

impl WrapMode {
    /// Resolve integer coordinate `i` against an axis of length `extent`.
    ///
    /// Returns `None` only for [`WrapMode::Border`] when `i` is outside the
    /// axis; the caller then treats the texel as all-zero and must not read
    /// the buffer. `extent` must be positive and fit in an `i32`.
    #[inline]
    pub fn resolve(self, i: i32, extent: usize) -> Option<usize> {
        debug_assert!(extent > 0 && extent <= i32::MAX as usize);
        match self {
            WrapMode::Extend => Some(i.clamp(0, extent as i32 - 1) as usize),
            WrapMode::Repeat => Some(i.rem_euclid(extent as i32) as usize),
            WrapMode::Border => {
                if i >= 0 && (i as usize) < extent {
                    Some(i as usize)
                } else {
                    None
                }
            }
        }
    }
}

// ============================================================================
// ImageAccessor — wrapped texel fetches
// ============================================================================

/// Fetches texels from an [`ImageView`] with independent wrap modes per axis.
#[derive(Debug, Clone, Copy)]
pub struct ImageAccessor<'a, T> {
    view: ImageView<'a, T>,
    wrap_u: WrapMode,
    wrap_v: WrapMode,
}

impl<'a, T: Texel> ImageAccessor<'a, T> {
    #[inline]
    pub fn new(view: ImageView<'a, T>, wrap_u: WrapMode, wrap_v: WrapMode) -> Self {
        Self {
            view,
            wrap_u,
            wrap_v,
        }
    }

    #[inline]
    pub fn view(&self) -> &ImageView<'a, T> {
        &self.view
    }

    #[inline]
    pub fn wrap_u(&self) -> WrapMode {
        self.wrap_u
    }

    #[inline]
    pub fn wrap_v(&self) -> WrapMode {
        self.wrap_v
    }

    /// Resolve a column index, `None` if it lies in the border.
    #[inline]
    pub fn column(&self, x: i32) -> Option<usize> {
        self.wrap_u.resolve(x, self.view.width())
    }

    /// Resolve a row index, `None` if it lies in the border.
    #[inline]
    pub fn row(&self, y: i32) -> Option<usize> {
        self.wrap_v.resolve(y, self.view.height())
    }

    /// Texel at `(x, y)` after wrapping, `None` if it is transparent border.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<&'a [T]> {
        let cx = self.column(x)?;
        let cy = self.row(y)?;
        Some(self.view.texel(cx, cy))
    }

    /// Copy the texel at `(x, y)` into `out`, zero-filling border texels.
    #[inline]
    pub fn copy_pixel(&self, x: i32, y: i32, out: &mut [T]) {
        match self.pixel(x, y) {
            Some(src) => {
                for (o, s) in out.iter_mut().zip(src) {
                    *o = *s;
                }
            }
            None => out.fill(T::ZERO),
        }
    }
}

// ============================================================================
// ImageSampler — PixelSource over an ImageView
// ============================================================================

/// Feeds an [`ImageView`] to the EWA filter as a [`PixelSource`].
///
/// Texels are widened to RGBA `f32`: missing color channels read as 0 and a
/// missing alpha as 1. Border texels read as transparent black.
#[derive(Debug, Clone, Copy)]
pub struct ImageSampler<'a, T> {
    accessor: ImageAccessor<'a, T>,
}

impl<'a, T: Texel> ImageSampler<'a, T> {
    pub fn new(view: ImageView<'a, T>, wrap_u: WrapMode, wrap_v: WrapMode) -> Self {
        Self {
            accessor: ImageAccessor::new(view, wrap_u, wrap_v),
        }
    }

    #[inline]
    pub fn accessor(&self) -> &ImageAccessor<'a, T> {
        &self.accessor
    }
}

impl<T: Texel> PixelSource for ImageSampler<'_, T> {
    #[inline]
    fn read_pixel(&self, x: i32, y: i32) -> [f32; 4] {
        match (self.accessor.column(x), self.accessor.row(y)) {
            (Some(cx), Some(cy)) => self.accessor.view().texel_rgba_f32(cx, cy),
            _ => [0.0; 4],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
