//! Distance metrics and pairwise distance matrices over word vectors.
//!
//! Metric names follow the usual scientific-computing vocabulary, so a
//! request can say `"cosine"` or `"cityblock"` and get what it expects:
//!
//! | Name | Formula |
//! |------|---------|
//! | `cosine` | `1 − u·v / (‖u‖ ‖v‖)` |
//! | `correlation` | cosine distance of the mean-centred vectors |
//! | `euclidean` | `‖u − v‖₂` |
//! | `sqeuclidean` | `‖u − v‖₂²` |
//! | `cityblock` | `Σ |uᵢ − vᵢ|` (alias `manhattan`) |
//! | `chebyshev` | `max |uᵢ − vᵢ|` |
//!
//! All metrics are symmetric and non-negative. Cosine-type distances of a
//! zero vector are defined rather than NaN: 0 against another zero vector,
//! 1 against anything else.

use crate::error::{Error, Result};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Distance metric between two embedding vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DistanceMetric {
    /// One minus cosine similarity.
    #[default]
    Cosine,
    /// One minus Pearson correlation.
    Correlation,
    /// L2 distance.
    Euclidean,
    /// Squared L2 distance.
    SqEuclidean,
    /// L1 distance.
    Cityblock,
    /// L∞ distance.
    Chebyshev,
}

impl DistanceMetric {
    /// Canonical metric name.
    pub fn name(self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Correlation => "correlation",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::SqEuclidean => "sqeuclidean",
            DistanceMetric::Cityblock => "cityblock",
            DistanceMetric::Chebyshev => "chebyshev",
        }
    }

    /// Distance between two vectors of equal length.
    pub fn distance(self, a: &[f32], b: &[f32]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        match self {
            DistanceMetric::Cosine => cosine_distance(a, b, 0.0, 0.0),
            DistanceMetric::Correlation => cosine_distance(a, b, mean(a), mean(b)),
            DistanceMetric::Euclidean => squared_euclidean(a, b).sqrt(),
            DistanceMetric::SqEuclidean => squared_euclidean(a, b),
            DistanceMetric::Cityblock => a
                .iter()
                .zip(b)
                .map(|(&x, &y)| (f64::from(x) - f64::from(y)).abs())
                .sum(),
            DistanceMetric::Chebyshev => a
                .iter()
                .zip(b)
                .map(|(&x, &y)| (f64::from(x) - f64::from(y)).abs())
                .fold(0.0, f64::max),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(DistanceMetric::Cosine),
            "correlation" => Ok(DistanceMetric::Correlation),
            "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
            "sqeuclidean" => Ok(DistanceMetric::SqEuclidean),
            "cityblock" | "manhattan" | "l1" => Ok(DistanceMetric::Cityblock),
            "chebyshev" => Ok(DistanceMetric::Chebyshev),
            _ => Err(Error::UnknownMetric(s.to_string())),
        }
    }
}

impl TryFrom<String> for DistanceMetric {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<DistanceMetric> for String {
    fn from(metric: DistanceMetric) -> Self {
        metric.name().to_string()
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn mean(v: &[f32]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.iter().map(|&x| f64::from(x)).sum::<f64>() / v.len() as f64
}

fn squared_euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum()
}

fn cosine_distance(a: &[f32], b: &[f32], mean_a: f64, mean_b: f64) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let x = f64::from(x) - mean_a;
        let y = f64::from(y) - mean_b;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    match (norm_a > 0.0, norm_b > 0.0) {
        (false, false) => 0.0,
        (true, true) => {
            let sim = dot / (norm_a.sqrt() * norm_b.sqrt());
            // Rounding can push |sim| slightly past 1.
            (1.0 - sim.clamp(-1.0, 1.0)).max(0.0)
        }
        _ => 1.0,
    }
}

/// Square, symmetric distance matrix with a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Compute all pairwise distances between `vectors`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the vectors differ in length.
    pub fn compute(vectors: &[&[f32]], metric: DistanceMetric) -> Result<Self> {
        let n = vectors.len();
        if let Some(first) = vectors.first() {
            let dim = first.len();
            if let Some(v) = vectors.iter().find(|v| v.len() != dim) {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: v.len(),
                });
            }
        }

        let row = |i: usize| -> Vec<f64> {
            (0..n)
                .map(|j| {
                    if i == j {
                        0.0
                    } else {
                        metric.distance(vectors[i], vectors[j])
                    }
                })
                .collect()
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f64>> = (0..n).into_par_iter().map(row).collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f64>> = (0..n).map(row).collect();

        let mut values: Vec<f64> = rows.into_iter().flatten().collect();

        // Mirror the upper triangle so (i, j) and (j, i) are bit-identical.
        for i in 0..n {
            for j in (i + 1)..n {
                values[j * n + i] = values[i * n + j];
            }
        }

        Ok(Self { n, values })
    }

    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        self.n
    }

    /// True if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between items `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Row `i` of the matrix.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }
}
