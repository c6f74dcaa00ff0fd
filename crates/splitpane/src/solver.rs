//! Pure sizing functions: normalization, pairwise redistribution, snapping
//! and collapse.
//!
//! Every function takes the current [`SizeVector`] by reference and returns a
//! new one, so drag updates can always be recomputed from a start snapshot.

use tracing::trace;

use crate::error::{Result, SplitError};
use crate::size::{EPSILON, MinSizes, SizeVector, percent_to_px, px_to_percent};

/// Build the size vector for `count` regions.
///
/// Without `raw`, the track is split equally. With `raw`, the values are
/// rescaled so they sum to 100. With `expand_to_min`, regions below their
/// minimum are raised to it and the deficit is taken from the other regions in
/// proportion to their slack above their own minimum.
pub fn normalize(
    raw: Option<&[f64]>,
    count: usize,
    min_sizes: &MinSizes,
    track_px: f64,
    expand_to_min: bool,
) -> Result<SizeVector> {
    if count == 0 {
        return Err(SplitError::NoRegions);
    }

    let mut sizes = match raw {
        None => SizeVector::equal(count).to_vec(),
        Some(raw) => rescale(raw, count)?,
    };

    if expand_to_min {
        expand_to_minimums(&mut sizes, &min_sizes.percentages(track_px))?;
    }

    absorb_drift(&mut sizes);
    Ok(SizeVector::from_normalized(sizes))
}

/// Normalize `raw` and expand to minimums, leaving entries that are exactly 0
/// collapsed.
///
/// This is the inverse of reading the sizes back: a vector that holds
/// collapsed regions normalizes to itself.
pub fn normalize_keeping_collapsed(
    raw: &[f64],
    count: usize,
    min_sizes: &MinSizes,
    track_px: f64,
) -> Result<SizeVector> {
    if count == 0 {
        return Err(SplitError::NoRegions);
    }
    let mut sizes = rescale(raw, count)?;
    let mins: Vec<f64> = min_sizes
        .percentages(track_px)
        .into_iter()
        .zip(raw)
        .map(|(min, size)| if *size == 0.0 { 0.0 } else { min })
        .collect();
    expand_to_minimums(&mut sizes, &mins)?;

    absorb_drift(&mut sizes);
    Ok(SizeVector::from_normalized(sizes))
}

fn rescale(raw: &[f64], count: usize) -> Result<Vec<f64>> {
    if raw.len() != count {
        return Err(SplitError::SizeCountMismatch {
            expected: count,
            actual: raw.len(),
        });
    }
    if let Some((index, value)) = raw
        .iter()
        .copied()
        .enumerate()
        .find(|(_, value)| !value.is_finite() || *value < 0.0)
    {
        return Err(SplitError::InvalidSize { index, value });
    }
    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return Err(SplitError::ZeroTotalSize);
    }
    Ok(raw.iter().map(|size| size / total * 100.0).collect())
}

fn expand_to_minimums(sizes: &mut [f64], mins: &[f64]) -> Result<()> {
    let required_percent: f64 = mins.iter().take(sizes.len()).sum();
    if required_percent > 100.0 + EPSILON {
        return Err(SplitError::MinimumsExceedTrack { required_percent });
    }

    let mut deficit = 0.0;
    let mut slack_total = 0.0;
    for (size, min) in sizes.iter_mut().zip(mins) {
        if *size < *min {
            deficit += *min - *size;
            *size = *min;
        } else {
            slack_total += *size - *min;
        }
    }
    if deficit <= 0.0 || slack_total <= 0.0 {
        return Ok(());
    }

    trace!(deficit, slack_total, "expanding regions to their minimums");
    for (size, min) in sizes.iter_mut().zip(mins) {
        let slack = *size - *min;
        if slack > 0.0 {
            *size -= deficit * slack / slack_total;
        }
    }
    Ok(())
}

/// Put floating-point residue on the largest region so the sum is 100.
fn absorb_drift(sizes: &mut [f64]) {
    let drift = 100.0 - sizes.iter().sum::<f64>();
    if drift == 0.0 {
        return;
    }
    if let Some(largest) = sizes
        .iter_mut()
        .max_by(|a, b| a.total_cmp(b))
    {
        *largest = (*largest + drift).max(0.0);
    }
}

fn valid_pair(len: usize, (first, second): (usize, usize)) -> bool {
    first.checked_add(1) == Some(second) && second < len
}

/// Quantize a pixel delta to the nearest multiple of `interval_px`.
#[must_use]
pub fn quantize(delta_px: f64, interval_px: f64) -> f64 {
    if !delta_px.is_finite() {
        return 0.0;
    }
    if interval_px > 0.0 && interval_px.is_finite() {
        (delta_px / interval_px).round() * interval_px
    } else {
        delta_px
    }
}

/// Move `delta_px` of the track from `pair.1` to `pair.0` (or back, when
/// negative).
///
/// The delta is truncated so neither side ends below its minimum. A side that
/// already sat below its minimum, such as a collapsed region, is never pushed
/// further down. The pair total is conserved and every other region is left
/// untouched. An invalid pair returns the sizes unchanged.
#[must_use]
pub fn redistribute(
    sizes: &SizeVector,
    pair: (usize, usize),
    delta_px: f64,
    track_px: f64,
    min_sizes: &MinSizes,
    drag_interval_px: f64,
) -> SizeVector {
    let mut next = sizes.clone();
    if !valid_pair(sizes.len(), pair) {
        return next;
    }
    let (first, second) = pair;

    let delta = px_to_percent(quantize(delta_px, drag_interval_px), track_px);
    let a = sizes[first];
    let b = sizes[second];
    let pair_total = a + b;

    let lower = min_sizes.percent(first, track_px).min(a);
    let upper = (pair_total - min_sizes.percent(second, track_px)).max(a);
    let proposed = a + delta;
    let new_a = proposed.clamp(lower, upper);
    if new_a != proposed {
        trace!(first, second, proposed, clamped = new_a, "drag delta truncated at minimum");
    }

    let slots = next.as_mut_slice();
    slots[first] = new_a;
    slots[second] = pair_total - new_a;
    next
}

/// Collapse a side of `pair` that sits within `snap_offset_px` of its
/// minimum, giving its share to the other side.
///
/// A side is near its minimum when `size_px - min_px < snap_offset_px`. With
/// a zero offset a side at or above its minimum never snaps, but a side still
/// below it (a collapsed region dragged partly open) snaps back to 0. When
/// both sides are near, only the one closer to its minimum collapses; ties go
/// to the first side. An unmeasured track never snaps.
#[must_use]
pub fn apply_snap(
    sizes: &SizeVector,
    pair: (usize, usize),
    snap_offset_px: f64,
    track_px: f64,
    min_sizes: &MinSizes,
) -> SizeVector {
    let mut next = sizes.clone();
    if !valid_pair(sizes.len(), pair) || track_px <= 0.0 || !track_px.is_finite() {
        return next;
    }
    let (first, second) = pair;

    let distance = |index: usize| percent_to_px(sizes[index], track_px) - min_sizes.px(index);
    let first_distance = distance(first);
    let second_distance = distance(second);
    let first_near = first_distance < snap_offset_px;
    let second_near = second_distance < snap_offset_px;

    let collapsed = match (first_near, second_near) {
        (false, false) => return next,
        (true, false) => first,
        (false, true) => second,
        (true, true) if first_distance <= second_distance => first,
        (true, true) => second,
    };
    let survivor = if collapsed == first { second } else { first };

    let pair_total = sizes[first] + sizes[second];
    if sizes[collapsed] != 0.0 {
        trace!(collapsed, survivor, "snapping region to zero");
    }
    let slots = next.as_mut_slice();
    slots[collapsed] = 0.0;
    slots[survivor] = pair_total;
    next
}

/// Set region `index` to 0 and give its share to the next region, or to the
/// previous one when `index` is the last region.
///
/// Returns `None` when `index` is out of range or there is a single region.
#[must_use]
pub fn collapse(sizes: &SizeVector, index: usize) -> Option<SizeVector> {
    let len = sizes.len();
    if len < 2 || index >= len {
        return None;
    }
    let neighbor = if index + 1 < len { index + 1 } else { index - 1 };

    let mut next = sizes.clone();
    let slots = next.as_mut_slice();
    slots[neighbor] += slots[index];
    slots[index] = 0.0;
    Some(next)
}
