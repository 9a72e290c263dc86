//! Distance metrics and splitting hyperplanes for dense vectors.
//!
//! Both tree construction and query traversal decide a vector's side of a
//! split through [`DistanceMetric::margin`]; the final ranking goes through
//! [`DistanceMetric::distance`]. Keeping both here means the sign convention
//! lives in exactly one place.
//!
//! ## Important nuance
//!
//! [`DistanceMetric::Angular`] reports $\sqrt{2 - 2\cos(a,b)}$, i.e. the
//! Euclidean distance between the two L2-normalized vectors. Orthogonal
//! vectors are therefore at $\sqrt{2}$ and opposite vectors at $2$. This is
//! monotone in the angle, so rankings match plain cosine distance.

use std::fmt;
use std::str::FromStr;

use crate::simd;
use crate::RetrieveError;

/// Distance metric for dense vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DistanceMetric {
    /// Euclidean (L2) distance.
    Euclidean,
    /// Euclidean distance between normalized vectors, $\sqrt{2 - 2\cos(a,b)}$.
    Angular,
}

impl DistanceMetric {
    /// Compute distance between two vectors.
    ///
    /// If dimensions mismatch, this returns `f32::INFINITY` (so it is never selected as a
    /// nearest neighbor).
    #[inline]
    #[must_use]
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Euclidean => euclidean_distance(a, b),
            DistanceMetric::Angular => angular_distance(a, b),
        }
    }

    /// Signed distance of `v` from `plane`.
    ///
    /// Positive means the right child, zero or negative the left child; see
    /// [`Side::of`]. For [`DistanceMetric::Angular`] `v` is treated as if
    /// normalized, so the margin is the cosine between `v` and the plane normal.
    #[inline]
    #[must_use]
    pub fn margin(self, plane: &Hyperplane, v: &[f32]) -> f32 {
        match self {
            DistanceMetric::Euclidean => plane.offset + simd::dot(&plane.normal, v),
            DistanceMetric::Angular => {
                let n = simd::norm(v);
                if n < simd::NORM_EPSILON {
                    return 0.0;
                }
                simd::dot(&plane.normal, v) / n
            }
        }
    }

    /// Hyperplane equidistant between `p` and `q`, with `p` on the right side.
    ///
    /// Euclidean: the perpendicular bisector of the segment `pq`.
    /// Angular: the great-circle bisector of `p/|p|` and `q/|q|`, through the origin.
    ///
    /// Identical (or, for angular, parallel) pivots yield a zero normal, which
    /// puts every vector on the left.
    #[must_use]
    pub fn bisector(self, p: &[f32], q: &[f32]) -> Hyperplane {
        match self {
            DistanceMetric::Euclidean => {
                let normal = normalize(&sub(p, q));
                let offset = -p
                    .iter()
                    .zip(q)
                    .zip(&normal)
                    .map(|((a, b), n)| n * (a + b) * 0.5)
                    .sum::<f32>();
                Hyperplane { normal, offset }
            }
            DistanceMetric::Angular => {
                let normal = normalize(&sub(&normalize(p), &normalize(q)));
                Hyperplane {
                    normal,
                    offset: 0.0,
                }
            }
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Angular => "angular",
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = RetrieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "angular" => Ok(DistanceMetric::Angular),
            other => Err(RetrieveError::InvalidMetric(other.to_string())),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splitting hyperplane `{x : dot(normal, x) + offset = 0}`.
///
/// `normal` is unit length, or all zeros for a forced split.
#[derive(Debug, Clone, PartialEq)]
pub struct Hyperplane {
    pub normal: Vec<f32>,
    pub offset: f32,
}

impl Hyperplane {
    /// Plane with a zero normal: every margin is `0.0`.
    #[must_use]
    pub fn degenerate(dimension: usize) -> Self {
        Self {
            normal: vec![0.0; dimension],
            offset: 0.0,
        }
    }

    /// Whether this plane separates anything at all.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.offset == 0.0 && self.normal.iter().all(|&x| x == 0.0)
    }
}

/// Side of a hyperplane a margin falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// `margin > 0` is right, everything else (zero included) is left.
    #[inline]
    #[must_use]
    pub fn of(margin: f32) -> Self {
        if margin > 0.0 {
            Side::Right
        } else {
            Side::Left
        }
    }
}

/// L2 (Euclidean) distance.
#[inline]
#[must_use]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    simd::l2_distance(a, b)
}

/// Angular distance $\sqrt{2 - 2\cos(a,b)}$, in `[0, 2]`.
///
/// Computed on the normalized vectors directly so that a vector is at exactly
/// `0.0` from itself. A zero-magnitude input has no direction; it is placed at
/// $\sqrt{2}$ from everything.
#[inline]
#[must_use]
pub fn angular_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    let na = simd::norm(a);
    let nb = simd::norm(b);
    if na < simd::NORM_EPSILON || nb < simd::NORM_EPSILON {
        return std::f32::consts::SQRT_2;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x / na - y / nb;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

/// Normalize a vector to unit L2 norm.
#[inline]
#[must_use]
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let n = simd::norm(v);
    if n < simd::NORM_EPSILON {
        return vec![0.0; v.len()];
    }
    v.iter().map(|x| x / n).collect()
}

fn sub(a: &[f32], b: &[f32]) -> Vec<f32> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}
