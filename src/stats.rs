//! Summary statistics for tournament aggregation.
//!
//! Means and medians return NaN on empty input rather than erroring;
//! callers decide how to present undefined aggregates. Histograms are
//! plain counts-plus-edges data for downstream plotting.

/// Arithmetic mean. NaN on empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median with midpoint averaging for even counts. NaN on empty input.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// An equal-width histogram over `[min, max]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Histogram {
    /// Count per bin; the last bin is right-inclusive.
    pub counts: Vec<usize>,
    /// `counts.len() + 1` bin edges.
    pub edges: Vec<f64>,
}

impl Histogram {
    /// Total number of observations binned.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin `values` into `bins` equal-width bins spanning their range.
///
/// Empty input produces an empty histogram; a degenerate range (all
/// values equal) collapses to a single bin.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    if values.is_empty() || bins == 0 {
        return Histogram {
            counts: Vec::new(),
            edges: Vec::new(),
        };
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return Histogram {
            counts: vec![values.len()],
            edges: vec![min, max],
        };
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let bin = (((v - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    let edges = (0..=bins).map(|i| min + i as f64 * width).collect();

    Histogram { counts, edges }
}
