//! Reconstruction filter kernels and the EWA weight lookup table.
//!
//! Cubic sampling uses the two-parameter Mitchell-Netravali family, which
//! covers the cubic B-spline (B = 1, C = 0), the Mitchell filter
//! (B = C = 1/3) and Catmull-Rom (B = 0, C = 1/2). Every member of the family
//! sums to one over its four taps, so flat regions are reproduced exactly.

// ============================================================================
// CubicFilter — Mitchell-Netravali family
// ============================================================================

/// Mitchell-Netravali cubic kernel with parameters `b` and `c`, radius 2.
///
/// The polynomial coefficients are precomputed from `(b, c)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicFilter {
    b: f32,
    c: f32,
    p0: f32,
    p2: f32,
    p3: f32,
    q0: f32,
    q1: f32,
    q2: f32,
    q3: f32,
}

impl CubicFilter {
    /// Cubic B-spline: no ringing, noticeably soft.
    pub const BSPLINE: CubicFilter = CubicFilter::new(1.0, 0.0);
    /// Mitchell-Netravali recommended parameters, balancing blur and ringing.
    pub const MITCHELL: CubicFilter = CubicFilter::new(1.0 / 3.0, 1.0 / 3.0);
    /// Catmull-Rom spline: interpolating, sharpest of the three, rings.
    pub const CATMULL_ROM: CubicFilter = CubicFilter::new(0.0, 0.5);

    pub const fn new(b: f32, c: f32) -> Self {
        Self {
            b,
            c,
            p0: (6.0 - 2.0 * b) / 6.0,
            p2: (-18.0 + 12.0 * b + 6.0 * c) / 6.0,
            p3: (12.0 - 9.0 * b - 6.0 * c) / 6.0,
            q0: (8.0 * b + 24.0 * c) / 6.0,
            q1: (-12.0 * b - 48.0 * c) / 6.0,
            q2: (6.0 * b + 30.0 * c) / 6.0,
            q3: (-b - 6.0 * c) / 6.0,
        }
    }

    pub fn b(&self) -> f32 {
        self.b
    }

    pub fn c(&self) -> f32 {
        self.c
    }

    /// Weights of the four taps at `floor - 1 ..= floor + 2` for a sample
    /// whose fractional offset from `floor` is `f` (expected in `[0, 1)`).
    ///
    /// The third weight is derived from the other three so the set sums to
    /// one up to a single rounding step.
    #[inline]
    pub fn weights(&self, f: f32) -> [f32; 4] {
        let w0 = self.calc_weight(1.0 + f);
        let w1 = self.calc_weight(f);
        let w3 = self.calc_weight(2.0 - f);
        let w2 = 1.0 - w0 - w1 - w3;
        [w0, w1, w2, w3]
    }
}

impl Default for CubicFilter {
    fn default() -> Self {
        Self::MITCHELL
    }
}

impl CubicFilter {
    /// Weight at distance `x` from the kernel centre. `x` may be negative;
    /// the weight is zero at and beyond a distance of 2.
    #[inline]
    pub fn calc_weight(&self, x: f32) -> f32 {
        let x = x.abs();
        if x < 1.0 {
            return self.p0 + x * x * (self.p2 + x * self.p3);
        }
        if x < 2.0 {
            return self.q0 + x * (self.q1 + x * (self.q2 + x * self.q3));
        }
        0.0
    }
}

/// Bilinear tent weights `[1 - f, f]` for fractional offset `f`.
#[inline]
pub fn linear_weights(f: f32) -> [f32; 2] {
    [1.0 - f, f]
}

// ============================================================================
// EWA weight table
// ============================================================================

/// Largest valid index into [`EWA_WEIGHTS`].
pub const EWA_MAX_INDEX: usize = 255;

/// Radial weights for elliptical weighted averaging, indexed by the squared
/// normalised distance from the ellipse centre quantised to `0..=255`.
///
/// Entry `i` is `(exp(-2 r) - exp(-2)) / (1 - exp(-2))` with `r = i / 255`:
/// a Gaussian in distance shifted so that it reaches exactly zero on the
/// ellipse boundary, which avoids ring artifacts at high magnification.
pub static EWA_WEIGHTS: [f32; EWA_MAX_INDEX + 1] = [
    1.000000, 0.990965, 0.982000, 0.973105, 0.964280, 0.955524, 0.946836, 0.938216, 0.929664,
    0.921178, 0.912759, 0.904405, 0.896117, 0.887893, 0.879734, 0.871638, 0.863605, 0.855636,
    0.847728, 0.839883, 0.832098, 0.824375, 0.816712, 0.809108, 0.801564, 0.794079, 0.786653,
    0.779284, 0.771974, 0.764720, 0.757523, 0.750382, 0.743297, 0.736267, 0.729292, 0.722372,
    0.715505, 0.708693, 0.701933, 0.695227, 0.688572, 0.681970, 0.675420, 0.668920, 0.662471,
    0.656073, 0.649725, 0.643426, 0.637176, 0.630976, 0.624824, 0.618719, 0.612663, 0.606654,
    0.600691, 0.594776, 0.588906, 0.583083, 0.577305, 0.571572, 0.565883, 0.560240, 0.554640,
    0.549084, 0.543572, 0.538102, 0.532676, 0.527291, 0.521949, 0.516649, 0.511389, 0.506171,
    0.500994, 0.495857, 0.490761, 0.485704, 0.480687, 0.475709, 0.470769, 0.465869, 0.461006,
    0.456182, 0.451395, 0.446646, 0.441934, 0.437258, 0.432619, 0.428017, 0.423450, 0.418919,
    0.414424, 0.409963, 0.405538, 0.401147, 0.396790, 0.392467, 0.388178, 0.383923, 0.379701,
    0.375511, 0.371355, 0.367231, 0.363139, 0.359079, 0.355051, 0.351055, 0.347089, 0.343155,
    0.339251, 0.335378, 0.331535, 0.327722, 0.323939, 0.320186, 0.316461, 0.312766, 0.309100,
    0.305462, 0.301853, 0.298272, 0.294719, 0.291194, 0.287696, 0.284226, 0.280782, 0.277366,
    0.273976, 0.270613, 0.267276, 0.263965, 0.260680, 0.257421, 0.254187, 0.250979, 0.247795,
    0.244636, 0.241502, 0.238393, 0.235308, 0.232246, 0.229209, 0.226196, 0.223206, 0.220239,
    0.217296, 0.214375, 0.211478, 0.208603, 0.205750, 0.202920, 0.200112, 0.197326, 0.194562,
    0.191819, 0.189097, 0.186397, 0.183718, 0.181060, 0.178423, 0.175806, 0.173210, 0.170634,
    0.168078, 0.165542, 0.163026, 0.160530, 0.158053, 0.155595, 0.153157, 0.150738, 0.148337,
    0.145955, 0.143592, 0.141248, 0.138921, 0.136613, 0.134323, 0.132051, 0.129797, 0.127560,
    0.125341, 0.123139, 0.120954, 0.118786, 0.116635, 0.114501, 0.112384, 0.110283, 0.108199,
    0.106131, 0.104079, 0.102043, 0.100023, 0.098019, 0.096030, 0.094057, 0.092099, 0.090157,
    0.088230, 0.086318, 0.084421, 0.082538, 0.080671, 0.078818, 0.076979, 0.075155, 0.073345,
    0.071549, 0.069768, 0.068000, 0.066246, 0.064505, 0.062779, 0.061065, 0.059366, 0.057679,
    0.056006, 0.054345, 0.052698, 0.051063, 0.049442, 0.047833, 0.046236, 0.044652, 0.043080,
    0.041521, 0.039974, 0.038439, 0.036916, 0.035405, 0.033905, 0.032418, 0.030941, 0.029477,
    0.028024, 0.026582, 0.025152, 0.023732, 0.022324, 0.020927, 0.019541, 0.018165, 0.016801,
    0.015447, 0.014103, 0.012770, 0.011448, 0.010135, 0.008833, 0.007542, 0.006260, 0.004988,
    0.003726, 0.002475, 0.001232, 0.000000,
];

/// Weight for a squared normalised distance `q` in table units.
///
/// Negative values (rounding just inside the centre) use the first entry;
/// `q >= 256` and NaN lie outside the ellipse and weigh nothing.
#[inline]
pub fn ewa_weight(q: f32) -> f32 {
    if q < (EWA_MAX_INDEX + 1) as f32 {
        EWA_WEIGHTS[if q < 0.0 { 0 } else { q as usize }]
    } else {
        0.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    #[test]
    fn test_bspline_weights_at_zero() {
        let w = CubicFilter::BSPLINE.weights(0.0);
        assert_close(w[0], 1.0 / 6.0);
        assert_close(w[1], 2.0 / 3.0);
        assert_close(w[2], 1.0 / 6.0);
        assert_close(w[3], 0.0);
    }

    #[test]
    fn test_mitchell_weights_at_zero() {
        let w = CubicFilter::MITCHELL.weights(0.0);
        assert_close(w[0], 1.0 / 18.0);
        assert_close(w[1], 16.0 / 18.0);
        assert_close(w[2], 1.0 / 18.0);
        assert_close(w[3], 0.0);
    }

    #[test]
    fn test_catmull_rom_interpolates() {
        let w = CubicFilter::CATMULL_ROM.weights(0.0);
        assert_close(w[0], 0.0);
        assert_close(w[1], 1.0);
        assert_close(w[2], 0.0);
        assert_close(w[3], 0.0);
    }

    #[test]
    fn test_weights_are_symmetric_at_half() {
        for filter in [CubicFilter::BSPLINE, CubicFilter::MITCHELL] {
            let w = filter.weights(0.5);
            assert_close(w[0], w[3]);
            assert_close(w[1], w[2]);
        }
    }

    #[test]
    fn test_partition_of_unity() {
        for filter in [
            CubicFilter::BSPLINE,
            CubicFilter::MITCHELL,
            CubicFilter::CATMULL_ROM,
            CubicFilter::new(0.2, 0.7),
        ] {
            for i in 0..100 {
                let f = i as f32 / 100.0;
                let direct: f32 = (-1..=2)
                    .map(|k| filter.calc_weight(k as f32 - f))
                    .sum();
                assert!((direct - 1.0).abs() < 1e-5, "sum {direct} at {f}");
                let w = filter.weights(f);
                assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_mitchell_has_negative_lobe() {
        let f = CubicFilter::MITCHELL;
        assert!(f.calc_weight(1.5) < 0.0);
        assert_eq!(f.calc_weight(2.0), 0.0);
        assert_eq!(f.calc_weight(-3.0), 0.0);
        assert_eq!(f.calc_weight(-1.5), f.calc_weight(1.5));
    }

    #[test]
    fn test_linear_weights() {
        assert_eq!(linear_weights(0.25), [0.75, 0.25]);
    }

    #[test]
    fn test_ewa_table_shape() {
        assert_eq!(EWA_WEIGHTS[0], 1.0);
        assert_eq!(EWA_WEIGHTS[EWA_MAX_INDEX], 0.0);
        assert_close(EWA_WEIGHTS[1], 0.990965);
        for pair in EWA_WEIGHTS.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        for (i, w) in EWA_WEIGHTS.iter().enumerate() {
            let r = i as f64 / EWA_MAX_INDEX as f64;
            let a = (-2.0f64).exp();
            let expected = ((-2.0 * r).exp() - a) / (1.0 - a);
            assert!((*w as f64 - expected).abs() < 1e-6, "entry {i}");
        }
    }

    #[test]
    fn test_ewa_weight_lookup() {
        assert_eq!(ewa_weight(-0.5), 1.0);
        assert_eq!(ewa_weight(0.9), 1.0);
        assert_eq!(ewa_weight(1.0), EWA_WEIGHTS[1]);
        assert_eq!(ewa_weight(255.99), 0.0);
        assert_eq!(ewa_weight(256.0), 0.0);
        assert_eq!(ewa_weight(f32::NAN), 0.0);
    }
}
