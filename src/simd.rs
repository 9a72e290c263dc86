//! Vector kernels with SIMD acceleration.
//!
//! When the `innr` feature is enabled (default), uses the `innr` crate for
//! SIMD-accelerated implementations. Otherwise falls back to portable code.
//! Every metric and the splitter go through these, so construction-time and
//! query-time arithmetic is the same for a given build.
//!
//! ```rust
//! use spinney::simd::{dot, norm, l2_distance_squared};
//!
//! let a = [3.0_f32, 4.0];
//! assert!((dot(&a, &a) - 25.0).abs() < 1e-6);
//! assert!((norm(&a) - 5.0).abs() < 1e-6);
//! assert!((l2_distance_squared(&a, &[0.0, 0.0]) - 25.0).abs() < 1e-6);
//! ```

/// Norms below this are treated as zero.
pub const NORM_EPSILON: f32 = 1e-9;

#[cfg(feature = "innr")]
pub use innr::{dot, l2_distance, l2_distance_squared, norm};

#[cfg(not(feature = "innr"))]
mod fallback {
    //! Portable implementations when innr is not available.

    /// Dot product of two vectors.
    #[inline]
    #[must_use]
    pub fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
    }

    /// L2 norm of a vector.
    #[inline]
    #[must_use]
    pub fn norm(v: &[f32]) -> f32 {
        dot(v, v).sqrt()
    }

    /// L2 distance squared (faster when only comparing distances).
    #[inline]
    #[must_use]
    pub fn l2_distance_squared(a: &[f32], b: &[f32]) -> f32 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum()
    }

    /// L2 (Euclidean) distance between two vectors.
    #[inline]
    #[must_use]
    pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
        l2_distance_squared(a, b).sqrt()
    }
}

#[cfg(not(feature = "innr"))]
pub use fallback::*;
