//! Percentage size vectors and per-region pixel minimums.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::SplitError;

/// Tolerance for the "sizes sum to 100" invariant.
pub const EPSILON: f64 = 1e-3;

/// Ordered region sizes in percent, summing to 100.
///
/// Only the solver builds or rewrites a `SizeVector`, which keeps the sum
/// invariant in one place. Callers read it through slices or owned copies.
/// Deserializing goes through [`TryFrom<Vec<f64>>`], which rejects vectors
/// that break the invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct SizeVector(Vec<f64>);

impl SizeVector {
    /// `count` regions sharing the track equally.
    #[must_use]
    pub fn equal(count: usize) -> Self {
        if count == 0 {
            return Self(Vec::new());
        }
        let share = 100.0 / count as f64;
        Self(vec![share; count])
    }

    /// Wrap values already known to satisfy the invariant.
    pub(crate) fn from_normalized(sizes: Vec<f64>) -> Self {
        debug_assert!(
            sizes.is_empty() || (sizes.iter().sum::<f64>() - 100.0).abs() <= EPSILON,
            "size vector must sum to 100: {sizes:?}"
        );
        Self(sizes)
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Owned copy of the sizes.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.clone()
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Whether the sizes sum to 100 within [`EPSILON`].
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        (self.total() - 100.0).abs() <= EPSILON
    }

    /// Sizes converted to pixels on a track of `track_px`.
    #[must_use]
    pub fn pixel_sizes(&self, track_px: f64) -> Vec<f64> {
        self.0.iter().map(|size| percent_to_px(*size, track_px)).collect()
    }
}

impl TryFrom<Vec<f64>> for SizeVector {
    type Error = SplitError;

    fn try_from(sizes: Vec<f64>) -> Result<Self, SplitError> {
        if let Some((index, value)) = sizes
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(SplitError::InvalidSize { index, value });
        }
        let total: f64 = sizes.iter().sum();
        if !sizes.is_empty() && (total - 100.0).abs() > EPSILON {
            return Err(SplitError::NotNormalized { total });
        }
        Ok(Self(sizes))
    }
}

impl From<SizeVector> for Vec<f64> {
    fn from(sizes: SizeVector) -> Self {
        sizes.0
    }
}

impl Index<usize> for SizeVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Per-region minimum sizes in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinSizes(Vec<f64>);

impl MinSizes {
    /// The same minimum for every region.
    #[must_use]
    pub fn uniform(count: usize, min_px: f64) -> Self {
        Self(vec![min_px.max(0.0); count])
    }

    /// One minimum per region. Negative values are treated as 0.
    #[must_use]
    pub fn per_region(mins: impl IntoIterator<Item = f64>) -> Self {
        Self(mins.into_iter().map(|min| min.max(0.0)).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Minimum of region `index` in pixels, 0 when out of range.
    #[must_use]
    pub fn px(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    /// Minimum of region `index` as a percentage of `track_px`.
    #[must_use]
    pub fn percent(&self, index: usize, track_px: f64) -> f64 {
        px_to_percent(self.px(index), track_px)
    }

    /// All minimums as percentages of `track_px`.
    #[must_use]
    pub fn percentages(&self, track_px: f64) -> Vec<f64> {
        self.0.iter().map(|min| px_to_percent(*min, track_px)).collect()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// A non-positive or non-finite track measures nothing, so every pixel
/// length maps to 0%.
#[must_use]
pub fn px_to_percent(px: f64, track_px: f64) -> f64 {
    if track_px > 0.0 && track_px.is_finite() {
        px / track_px * 100.0
    } else {
        0.0
    }
}

#[must_use]
pub fn percent_to_px(percent: f64, track_px: f64) -> f64 {
    if track_px > 0.0 && track_px.is_finite() {
        percent / 100.0 * track_px
    } else {
        0.0
    }
}
