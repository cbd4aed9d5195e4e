//! # texsample
//!
//! Texture sampling primitives for CPU image processing: point, bilinear,
//! bicubic and elliptical weighted average (EWA) filtering over borrowed
//! interleaved pixel buffers.
//!
//! ## Coordinates
//!
//! Sampling coordinates `u, v` are continuous pixel coordinates. Texel `x`
//! covers `[x, x + 1)`; nearest, bilinear and cubic sampling floor the
//! coordinate and do not add any half-texel offset. To filter around texel
//! centres, subtract 0.5 from `u, v` before calling them. The EWA filter
//! works on the same pixel coordinates but places texel centres at `x + 0.5`
//! itself.
//!
//! ## Boundaries
//!
//! Every sampler takes a [`WrapMode`] per axis, or fixes one in its name:
//!
//! - **Extend** (`*_clamp`): coordinates clamp to the edge texels
//! - **Repeat** (`*_repeat`): the image tiles with a floored modulo
//! - **Border** (`*_border`): texels outside the image are all-zero
//!
//! ## Formats
//!
//! Pixels are `u8` or `f32` ([`Texel`]) with any number of interleaved
//! channels. Byte results round to nearest and saturate; float results are
//! left unclamped.
//!
//! All sampling functions are pure reads of immutable data and may be called
//! concurrently from any number of threads on the same image.

// Foundation
pub mod basics;
pub mod error;
pub mod image_view;

// Boundary handling & kernels
pub mod image_accessors;
pub mod image_filters;

// Samplers
pub mod ewa_filter;
pub mod sampler_bilinear;
pub mod sampler_cubic;
pub mod sampler_nearest;

pub use basics::Texel;
pub use error::ImageError;
pub use ewa_filter::{ewa_filter, EwaFilter, PixelSource};
pub use image_accessors::{ImageAccessor, ImageSampler, WrapMode};
pub use image_filters::CubicFilter;
pub use image_view::ImageView;
