//! Elliptical weighted average (EWA) filtering.
//!
//! Heckbert's anisotropic texture filter: the screen-space derivatives of
//! the texture coordinate, `du = (du/dx, dv/dx)` and `dv = (du/dy, dv/dy)`,
//! define an ellipse in texture space. Every texel inside the ellipse is
//! weighted by a Gaussian of its normalised distance from the centre and the
//! weighted sum is renormalised. Weights come from
//! [`EWA_WEIGHTS`](crate::image_filters::EWA_WEIGHTS).
//!
//! Coordinates here are continuous pixel coordinates: texel `x` covers
//! `[x, x + 1)` and its centre is `x + 0.5`. Texels are read through a
//! [`PixelSource`], so the filter works over any storage layout.
//!
//! The footprint is clamped before integration: the minor radius is raised
//! to just cover a texel, eccentricity is capped and the bounding box is
//! limited, keeping the cost of a single call bounded for any input.

use crate::basics::ifloor;
use crate::image_filters::{ewa_weight, EWA_MAX_INDEX};
use std::f32::consts::PI;

/// Default cap on the ratio of major to minor radius.
pub const EWA_DEFAULT_MAX_ANISOTROPY: f32 = 16.0;

/// Default cap, in texels, on the major radius and bounding box half-extent.
pub const EWA_DEFAULT_MAX_RADIUS: u32 = 128;

/// Minimum squared footprint radius (0.875 texels) for point sources.
const EWA_MIN_RADIUS2: f32 = 0.765625;

/// Minimum squared footprint radius (1.25 texels) for interpolating sources.
const EWA_MIN_RADIUS2_INTPOL: f32 = 1.5625;

/// `F` below this value is treated as a degenerate (zero-area) ellipse.
const DEGENERATE_F: f32 = 1e-5;

// ============================================================================
// PixelSource
// ============================================================================

/// Supplies texels to the EWA filter.
///
/// `x, y` may lie outside the image bounding box the filter was given;
/// implementations decide how to extend the image (see
/// [`ImageSampler`](crate::image_accessors::ImageSampler)).
pub trait PixelSource {
    /// Read the RGBA value of texel `(x, y)`.
    fn read_pixel(&self, x: i32, y: i32) -> [f32; 4];
}

impl<F> PixelSource for F
where
    F: Fn(i32, i32) -> [f32; 4],
{
    #[inline]
    fn read_pixel(&self, x: i32, y: i32) -> [f32; 4] {
        self(x, y)
    }
}

// ============================================================================
// Ellipse parameters
// ============================================================================

/// Geometric description of an EWA ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseShape {
    /// Semi-major axis length.
    pub major: f32,
    /// Semi-minor axis length; zero for degenerate ellipses.
    pub minor: f32,
    /// Orientation of the major axis in radians.
    pub angle: f32,
    /// `major / minor`, or `1e10` when the ellipse is degenerate.
    pub eccentricity: f32,
}

/// Convert the implicit conic `A u^2 + B u v + C v^2 = F` into radii,
/// orientation and eccentricity.
///
/// Degenerate inputs (`F` near zero or a non-positive eigenvalue) report a
/// zero minor radius and an eccentricity of `1e10` rather than dividing by
/// zero.
pub fn ewa_radii_angle(a: f32, b: f32, c: f32, f: f32) -> EllipseShape {
    let angle = 0.5 * (b.atan2(a - c) + PI);
    if f <= DEGENERATE_F {
        return EllipseShape {
            major: a.max(c).sqrt(),
            minor: 0.0,
            angle,
            eccentricity: 1e10,
        };
    }

    let amc = a - c;
    let apc = a + c;
    let f2 = f * 2.0;
    let r = (amc * amc + b * b).sqrt();

    let d = apc - r;
    let major = if d <= 0.0 {
        a.max(c).sqrt()
    } else {
        (f2 / d).sqrt()
    };

    let d = apc + r;
    let (minor, eccentricity) = if d <= 0.0 {
        (0.0, 1e10)
    } else {
        let minor = (f2 / d).sqrt();
        (minor, major / minor)
    };

    EllipseShape {
        major,
        minor,
        angle,
        eccentricity,
    }
}

/// Conic coefficients `(A, B, C, F)` of an ellipse with squared radii
/// `major2`, `minor2` and major-axis angle `angle`.
fn conic_from_radii(major2: f32, minor2: f32, angle: f32) -> [f32; 4] {
    let ct = angle.cos();
    let ct2 = ct * ct;
    let st2 = 1.0 - ct2;
    [
        major2 * st2 + minor2 * ct2,
        (minor2 - major2) * (2.0 * angle).sin(),
        major2 * ct2 + minor2 * st2,
        major2 * minor2,
    ]
}

/// Replace non-finite gradients with zero and shorten gradients longer than
/// `max_len`, keeping their direction.
fn sanitize_gradient(g: [f32; 2], max_len: f32) -> [f32; 2] {
    if !g[0].is_finite() || !g[1].is_finite() {
        return [0.0, 0.0];
    }
    // Normalise by the larger component first so the length cannot
    // overflow for components near `f32::MAX`.
    let scale = g[0].abs().max(g[1].abs());
    if scale == 0.0 {
        return g;
    }
    let unit = [g[0] / scale, g[1] / scale];
    let unit_len = unit[0].hypot(unit[1]);
    if unit_len > max_len / scale {
        let s = max_len / unit_len;
        [unit[0] * s, unit[1] * s]
    } else {
        g
    }
}

// ============================================================================
// EwaFilter
// ============================================================================

/// EWA filter configuration.
///
/// - `intpol`: the source interpolates between texels, so use a slightly
///   larger minimum footprint for a smoother result. Without it the minimum
///   footprint just anti-aliases point samples.
/// - `use_alpha`: filter the fourth channel like the others. Otherwise the
///   result alpha is forced to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EwaFilter {
    intpol: bool,
    use_alpha: bool,
    max_anisotropy: f32,
    max_radius: u32,
}

impl EwaFilter {
    pub fn new(intpol: bool, use_alpha: bool) -> Self {
        Self {
            intpol,
            use_alpha,
            max_anisotropy: EWA_DEFAULT_MAX_ANISOTROPY,
            max_radius: EWA_DEFAULT_MAX_RADIUS,
        }
    }

    pub fn intpol(&self) -> bool {
        self.intpol
    }

    pub fn set_intpol(&mut self, intpol: bool) {
        self.intpol = intpol;
    }

    pub fn use_alpha(&self) -> bool {
        self.use_alpha
    }

    pub fn set_use_alpha(&mut self, use_alpha: bool) {
        self.use_alpha = use_alpha;
    }

    pub fn max_anisotropy(&self) -> f32 {
        self.max_anisotropy
    }

    /// Cap the major/minor ratio; values below one (or NaN) mean one.
    pub fn set_max_anisotropy(&mut self, v: f32) {
        self.max_anisotropy = if v >= 1.0 { v } else { 1.0 };
    }

    pub fn max_radius(&self) -> u32 {
        self.max_radius
    }

    /// Cap the major radius and the bounding box half-extent, in texels.
    pub fn set_max_radius(&mut self, v: u32) {
        self.max_radius = v.max(1);
    }

    /// Smallest squared radius of the footprint, in texels squared.
    ///
    /// Both exceed 0.5, so any footprint strictly contains a texel centre.
    fn min_radius2(&self) -> f32 {
        if self.intpol {
            EWA_MIN_RADIUS2_INTPOL
        } else {
            EWA_MIN_RADIUS2
        }
    }

    /// Filter the texel footprint of `uv` over a `width x height` image.
    ///
    /// Returns all zeros when the footprint misses the image entirely or
    /// gathers no weight.
    pub fn sample<S: PixelSource + ?Sized>(
        &self,
        width: usize,
        height: usize,
        uv: [f32; 2],
        du: [f32; 2],
        dv: [f32; 2],
        source: &S,
    ) -> [f32; 4] {
        let max_r = self.max_radius as f32;
        let du = sanitize_gradient(du, max_r);
        let dv = sanitize_gradient(dv, max_r);

        let (ux, vx, uy, vy) = (du[0], du[1], dv[0], dv[1]);
        let mut a = vx * vx + vy * vy;
        let mut b = -2.0 * (ux * vx + uy * vy);
        let mut c = ux * ux + uy * uy;
        let mut f = a * c - b * b * 0.25;

        let shape = ewa_radii_angle(a, b, c, f);
        let rmin = self.min_radius2();
        let mut major2 = shape.major * shape.major;
        let mut minor2 = shape.minor * shape.minor;

        if major2 < rmin {
            // Circular minimum footprint.
            b = 0.0;
            a = rmin;
            c = rmin;
            f = a * c;
        } else {
            let mut clamped = false;
            if major2 > max_r * max_r {
                major2 = max_r * max_r;
                minor2 = minor2.min(major2);
                clamped = true;
            }
            let aniso2 = self.max_anisotropy * self.max_anisotropy;
            if minor2 * aniso2 < major2 {
                minor2 = major2 / aniso2;
                clamped = true;
            }
            if minor2 < rmin {
                minor2 = rmin;
                clamped = true;
            }
            if clamped {
                log::trace!(
                    "ewa footprint clamped: radii {}x{} -> {}x{}",
                    shape.major,
                    shape.minor,
                    major2.sqrt(),
                    minor2.sqrt()
                );
                [a, b, c, f] = conic_from_radii(major2, minor2, shape.angle);
            }
        }

        let ue = c.sqrt();
        let ve = a.sqrt();
        let d = (EWA_MAX_INDEX + 1) as f32 / f;
        a *= d;
        b *= d;
        c *= d;

        let mut u0 = uv[0];
        let mut v0 = uv[1];
        if !u0.is_finite() || !v0.is_finite() {
            return [0.0; 4];
        }
        let max_i = i32::try_from(self.max_radius).unwrap_or(i32::MAX);
        let (cu, cv) = (ifloor(u0), ifloor(v0));
        let u1 = ifloor(u0 - ue).max(cu.saturating_sub(max_i));
        let u2 = ((u0 + ue).ceil() as i32).min(cu.saturating_add(max_i));
        let v1 = ifloor(v0 - ve).max(cv.saturating_sub(max_i));
        let v2 = ((v0 + ve).ceil() as i32).min(cv.saturating_add(max_i));

        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        if u2 < 0 || u1 >= w || v2 < 0 || v1 >= h {
            return [0.0; 4];
        }

        // Texel centres sit at half-integer coordinates.
        u0 -= 0.5;
        v0 -= 0.5;
        let ddq = 2.0 * a;
        let u_start = u1 as f32 - u0;
        let ac1 = a * (2.0 * u_start + 1.0);
        let ac2 = a * u_start * u_start;
        let bu = b * u_start;

        let mut result = [0.0f32; 4];
        let mut weight_sum = 0.0f32;
        for v in v1..=v2 {
            let vv = v as f32 - v0;
            let mut dq = ac1 + b * vv;
            let mut q = (c * vv + bu) * vv + ac2;
            for u in u1..=u2 {
                if q < (EWA_MAX_INDEX + 1) as f32 {
                    let wt = ewa_weight(q);
                    let tc = source.read_pixel(u, v);
                    result[0] += tc[0] * wt;
                    result[1] += tc[1] * wt;
                    result[2] += tc[2] * wt;
                    if self.use_alpha {
                        result[3] += tc[3] * wt;
                    }
                    weight_sum += wt;
                }
                q += dq;
                dq += ddq;
            }
        }

        if weight_sum <= 0.0 || !weight_sum.is_finite() {
            return [0.0; 4];
        }
        let inv = 1.0 / weight_sum;
        [
            result[0] * inv,
            result[1] * inv,
            result[2] * inv,
            if self.use_alpha { result[3] * inv } else { 1.0 },
        ]
    }
}

impl Default for EwaFilter {
    fn default() -> Self {
        Self::new(false, true)
    }
}

/// Filter with default clamping limits; see [`EwaFilter::sample`].
#[allow(clippy::too_many_arguments)]
pub fn ewa_filter<S: PixelSource + ?Sized>(
    width: usize,
    height: usize,
    intpol: bool,
    use_alpha: bool,
    uv: [f32; 2],
    du: [f32; 2],
    dv: [f32; 2],
    source: &S,
) -> [f32; 4] {
    EwaFilter::new(intpol, use_alpha).sample(width, height, uv, du, dv, source)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// 4x4 source whose texel (x, y) is `[x, y, x * y, 1]`, zero outside.
    fn ramp(x: i32, y: i32) -> [f32; 4] {
        if (0..4).contains(&x) && (0..4).contains(&y) {
            [x as f32, y as f32, (x * y) as f32, 1.0]
        } else {
            [0.0; 4]
        }
    }

    fn assert_rgba_close(a: [f32; 4], b: [f32; 4], eps: f32) {
        for i in 0..4 {
            assert!((a[i] - b[i]).abs() < eps, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_radii_of_axis_aligned_ellipse() {
        // du = (4, 0), dv = (0, 1): A = 1, B = 0, C = 16, F = 16.
        let e = ewa_radii_angle(1.0, 0.0, 16.0, 16.0);
        assert!((e.major - 4.0).abs() < 1e-5);
        assert!((e.minor - 1.0).abs() < 1e-5);
        assert!((e.eccentricity - 4.0).abs() < 1e-4);
        // Major axis along u.
        assert!(e.angle.cos().abs() > 0.999);
    }

    #[test]
    fn test_radii_of_circle() {
        let e = ewa_radii_angle(4.0, 0.0, 4.0, 16.0);
        assert!((e.major - 2.0).abs() < 1e-5);
        assert!((e.minor - 2.0).abs() < 1e-5);
        assert!((e.eccentricity - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_radii_degenerate() {
        let e = ewa_radii_angle(0.0, 0.0, 9.0, 0.0);
        assert_eq!(e.minor, 0.0);
        assert_eq!(e.eccentricity, 1e10);
        assert!((e.major - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_conic_roundtrip_through_radii() {
        let angle = 0.6f32;
        let [a, b, c, f] = conic_from_radii(9.0, 1.0, angle);
        let e = ewa_radii_angle(a, b, c, f);
        assert!((e.major - 3.0).abs() < 1e-4);
        assert!((e.minor - 1.0).abs() < 1e-4);
        assert!(((2.0 * e.angle).sin() - (2.0 * angle).sin()).abs() < 1e-4);
    }

    #[test]
    fn test_zero_gradient_is_point_sample() {
        let r = ewa_filter(4, 4, false, true, [2.5, 1.5], [0.0; 2], [0.0; 2], &ramp);
        assert_rgba_close(r, [2.0, 1.0, 2.0, 1.0], 1e-6);
    }

    #[test]
    fn test_zero_gradient_between_centres_blends() {
        // Equidistant from four texel centres, all of which must be reached.
        let r = ewa_filter(4, 4, false, true, [2.0, 2.0], [0.0; 2], [0.0; 2], &ramp);
        assert_rgba_close(r, [1.5, 1.5, 2.25, 1.0], 1e-5);
    }

    #[test]
    fn test_intpol_reaches_direct_neighbours() {
        let reads = Cell::new(0usize);
        let counting = |x: i32, y: i32| {
            reads.set(reads.get() + 1);
            ramp(x, y)
        };
        let r = ewa_filter(4, 4, true, true, [2.5, 1.5], [0.0; 2], [0.0; 2], &counting);
        assert_eq!(reads.get(), 5);
        // The ramp is linear along each axis, so the cross averages out.
        assert_rgba_close(r, [2.0, 1.0, 2.0, 1.0], 1e-5);
    }

    #[test]
    fn test_non_finite_gradient_degrades_to_point_sample() {
        let r = ewa_filter(
            4,
            4,
            false,
            true,
            [1.5, 3.5],
            [f32::NAN, 1.0],
            [f32::INFINITY, 0.0],
            &ramp,
        );
        assert_rgba_close(r, [1.0, 3.0, 3.0, 1.0], 1e-6);
    }

    #[test]
    fn test_non_finite_center_is_zero() {
        let r = ewa_filter(4, 4, false, true, [f32::NAN, 1.0], [1.0, 0.0], [0.0, 1.0], &ramp);
        assert_eq!(r, [0.0; 4]);
    }

    #[test]
    fn test_outside_image_is_zero() {
        let r = ewa_filter(4, 4, false, true, [-50.0, 2.0], [1.0, 0.0], [0.0, 1.0], &ramp);
        assert_eq!(r, [0.0; 4]);
        let r = ewa_filter(4, 4, false, true, [2.0, 40.0], [0.0; 2], [0.0; 2], &ramp);
        assert_eq!(r, [0.0; 4]);
    }

    #[test]
    fn test_flat_field() {
        let flat = |_x: i32, _y: i32| [0.2f32, 0.4, 0.6, 0.8];
        let cases = [
            ([0.0f32, 0.0f32], [0.0f32, 0.0f32]),
            ([3.0, 0.0], [0.0, 0.5]),
            ([2.0, 2.0], [-1.5, 1.0]),
            ([40.0, 1.0], [0.0, 0.1]),
        ];
        for (du, dv) in cases {
            let r = ewa_filter(64, 64, true, true, [31.3, 17.8], du, dv, &flat);
            assert_rgba_close(r, [0.2, 0.4, 0.6, 0.8], 1e-5);
        }
    }

    #[test]
    fn test_alpha_forced_to_one_without_use_alpha() {
        let flat = |_x: i32, _y: i32| [0.2f32, 0.4, 0.6, 0.0];
        let r = ewa_filter(8, 8, false, false, [4.5, 4.5], [2.0, 0.0], [0.0, 2.0], &flat);
        assert_rgba_close(r, [0.2, 0.4, 0.6, 1.0], 1e-5);
    }

    #[test]
    fn test_anisotropic_blur_follows_gradient() {
        // Vertical stripes: value depends only on the column parity.
        let stripes = |x: i32, _y: i32| {
            let s = x.rem_euclid(2) as f32;
            [s, s, s, 1.0]
        };
        // Stretched along v: stays on one column.
        let r = ewa_filter(64, 64, false, true, [11.5, 20.5], [0.1, 0.0], [0.0, 4.0], &stripes);
        assert_rgba_close(r, [1.0, 1.0, 1.0, 1.0], 1e-5);
        // Stretched along u: averages across stripes.
        let r = ewa_filter(64, 64, false, true, [11.5, 20.5], [4.0, 0.0], [0.0, 0.1], &stripes);
        assert!((r[0] - 0.5).abs() < 0.2, "got {r:?}");
    }

    #[test]
    fn test_huge_finite_gradient_is_shortened() {
        let g = sanitize_gradient([f32::MAX, f32::MAX / 2.0], 8.0);
        assert!((g[0].hypot(g[1]) - 8.0).abs() < 1e-4, "{g:?}");
        assert!((g[0] / g[1] - 2.0).abs() < 1e-4);
        assert_eq!(sanitize_gradient([3.0, -4.0], 8.0), [3.0, -4.0]);
        assert_eq!(sanitize_gradient([0.0, 0.0], 8.0), [0.0, 0.0]);
        let g = sanitize_gradient([0.0, -f32::MAX], 8.0);
        assert!((g[1] + 8.0).abs() < 1e-5 && g[0] == 0.0, "{g:?}");
    }

    #[test]
    fn test_huge_gradient_still_blurs() {
        // Alternating columns average out once the footprint spans many.
        let stripes = |x: i32, _y: i32| {
            let s = x.rem_euclid(2) as f32;
            [s, s, s, 1.0]
        };
        let mut filter = EwaFilter::default();
        filter.set_max_radius(8);
        let r = filter.sample(64, 64, [31.5, 31.5], [f32::MAX, 0.0], [0.0, 0.0], &stripes);
        assert!((r[0] - 0.5).abs() < 0.2, "got {r:?}");
    }

    #[test]
    fn test_far_negative_center_is_zero() {
        let r = ewa_filter(4, 4, false, true, [-1e10, 1.5], [1.0, 0.0], [0.0, 1.0], &ramp);
        assert_eq!(r, [0.0; 4]);
        let r = ewa_filter(4, 4, false, true, [1.5, -3e38], [0.0; 2], [0.0; 2], &ramp);
        assert_eq!(r, [0.0; 4]);
    }

    #[test]
    fn test_footprint_is_bounded() {
        let reads = Cell::new(0usize);
        let counting = |_x: i32, _y: i32| {
            reads.set(reads.get() + 1);
            [1.0f32; 4]
        };
        let mut filter = EwaFilter::default();
        filter.set_max_radius(4);
        let r = filter.sample(
            1 << 20,
            1 << 20,
            [5000.5, 5000.5],
            [1e9, 3e8],
            [-2e8, 7e9],
            &counting,
        );
        assert_rgba_close(r, [1.0; 4], 1e-5);
        let side = 2 * 4 + 2;
        assert!(reads.get() > 0 && reads.get() <= side * side, "{} reads", reads.get());
    }

    #[test]
    fn test_anisotropy_cap_widens_minor_axis() {
        let reads = Cell::new(0usize);
        let counting = |_x: i32, _y: i32| {
            reads.set(reads.get() + 1);
            [0.5f32; 4]
        };
        let mut filter = EwaFilter::new(false, true);
        filter.set_max_anisotropy(1.0);
        filter.sample(256, 256, [100.5, 100.5], [20.0, 0.0], [0.0, 0.0], &counting);
        // A 20-texel circle covers far more than a 20x0.7 sliver would.
        assert!(reads.get() > 900, "{} reads", reads.get());
    }

    #[test]
    fn test_filter_settings() {
        let mut filter = EwaFilter::default();
        assert!(!filter.intpol());
        assert!(filter.use_alpha());
        assert_eq!(filter.max_anisotropy(), EWA_DEFAULT_MAX_ANISOTROPY);
        assert_eq!(filter.max_radius(), EWA_DEFAULT_MAX_RADIUS);
        filter.set_max_anisotropy(0.25);
        assert_eq!(filter.max_anisotropy(), 1.0);
        filter.set_max_radius(0);
        assert_eq!(filter.max_radius(), 1);
        filter.set_intpol(true);
        filter.set_use_alpha(false);
        assert!(filter.intpol() && !filter.use_alpha());
    }
}
