//! Percentile selection over full series history
//!
//! **Problem**: P50/P90 of per-batch timings need one value out of N.
//! A full sort is O(N log N) per query.
//!
//! **Solution**: `select_nth_unstable_by` (introselect) places the requested
//! rank in O(N) on a scratch copy. Summaries that need several ranks sort once
//! and index.
//!
//! Ordering uses `f64::total_cmp`, so NaN observations sort after +inf and
//! never panic the comparator.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Rule mapping a percentile `p` in `[0, 100]` to an index into ascending data.
///
/// The method is fixed per [`Recorder`](super::Recorder) so every query of a
/// run is answered the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileMethod {
    /// Index `floor(p / 100 * (n - 1))`.
    #[default]
    Floor,
    /// 1-based rank `ceil(p / 100 * n)`; `p = 0` maps to the minimum.
    NearestRank,
}

/// Reject percentiles outside `[0, 100]` (NaN included).
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `p` is out of range.
pub fn check_percentile(p: f64) -> Result<()> {
    if (0.0..=100.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "percentile must be within [0, 100], got {p}"
        )))
    }
}

/// Index of percentile `p` in ascending data of length `n`.
///
/// `n` must be non-zero and `p` already validated.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile_index(n: usize, p: f64, method: PercentileMethod) -> usize {
    debug_assert!(n > 0);
    let last = n - 1;
    let index = match method {
        // Multiply before dividing: p * (n - 1) is exact for integral p.
        PercentileMethod::Floor => (p * last as f64 / 100.0).floor() as usize,
        PercentileMethod::NearestRank => {
            let rank = (p * n as f64 / 100.0).ceil() as usize;
            rank.saturating_sub(1)
        }
    };
    index.min(last)
}

/// Select the value at percentile `p`, reordering `values` in place.
///
/// `values` must be non-empty and `p` already validated.
#[must_use]
pub fn select_percentile(values: &mut [f64], p: f64, method: PercentileMethod) -> f64 {
    let index = percentile_index(values.len(), p, method);
    let (_, value, _) = values.select_nth_unstable_by(index, f64::total_cmp);
    *value
}

/// Look up percentile `p` in data already sorted ascending.
#[must_use]
pub fn sorted_percentile(sorted: &[f64], p: f64, method: PercentileMethod) -> f64 {
    sorted[percentile_index(sorted.len(), p, method)]
}
