//! Fixed-width binning over `[min, max)` with an overflow counter,
//! reducible across parallel workers via a [`crate::process_pool::ProcessPool`].

use crate::error::{Error, Result};
use crate::process_pool::ProcessPool;

/// A fixed-width histogram over `[minimum, maximum)`.
pub struct Histogram {
    minimum: f64,
    maximum: f64,
    delta: f64,
    bins: Vec<u64>,
    n_added: u64,
    n_missed: u64,
}

impl Histogram {
    /// Build a histogram with bin width `delta` spanning
    /// `[minimum, maximum)`. The last partial bin, if `(maximum -
    /// minimum)` is not an exact multiple of `delta`, is dropped (its
    /// range falls into the overflow counter instead).
    #[must_use]
    pub fn initialise(minimum: f64, maximum: f64, delta: f64) -> Self {
        let n_bins = ((maximum - minimum) / delta).floor().max(0.0) as usize;
        Self {
            minimum,
            maximum,
            delta,
            bins: vec![0; n_bins],
            n_added: 0,
            n_missed: 0,
        }
    }

    /// Number of bins.
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.bins.len()
    }

    /// Bin width.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Midpoint of bin `index`.
    #[must_use]
    pub fn bin_centre(&self, index: usize) -> f64 {
        self.minimum + (index as f64 + 0.5) * self.delta
    }

    /// Raw bin counts.
    #[must_use]
    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    /// Count of samples that fell outside `[minimum, maximum)`.
    #[must_use]
    pub fn n_missed(&self) -> u64 {
        self.n_missed
    }

    /// Count of samples successfully binned.
    #[must_use]
    pub fn n_added(&self) -> u64 {
        self.n_added
    }

    /// Clear all counts, keeping the binning shape.
    pub fn reset(&mut self) {
        self.bins.iter_mut().for_each(|b| *b = 0);
        self.n_added = 0;
        self.n_missed = 0;
    }

    /// Increment the bin covering `x`, or the overflow counter if `x`
    /// falls outside `[minimum, maximum)`.
    pub fn add(&mut self, x: f64) {
        if x < self.minimum {
            self.n_missed += 1;
            return;
        }
        let bin = ((x - self.minimum) / self.delta) as usize;
        if bin < self.bins.len() {
            self.bins[bin] += 1;
            self.n_added += 1;
        } else {
            self.n_missed += 1;
        }
    }

    /// Bin counts divided by the number of samples successfully added.
    /// All zero if no samples were added.
    #[must_use]
    pub fn normalised(&self) -> Vec<f64> {
        if self.n_added == 0 {
            return vec![0.0; self.bins.len()];
        }
        let n = self.n_added as f64;
        self.bins.iter().map(|&c| c as f64 / n).collect()
    }

    /// Sum `factor * other`'s bin counts into this histogram, for
    /// reducing per-worker accumulations into a single total.
    ///
    /// # Errors
    /// Returns [`Error::ShapeError`] if `other`'s binning (bin count,
    /// range, or width) does not match this histogram's.
    pub fn accumulate(&mut self, other: &Histogram, factor: i64) -> Result<()> {
        if self.bins.len() != other.bins.len()
            || (self.minimum - other.minimum).abs() > 1.0e-9
            || (self.delta - other.delta).abs() > 1.0e-9
        {
            return Err(Error::ShapeError {
                component: "Histogram",
                operation: "accumulate",
                detail: format!(
                    "mismatched binning: {} bins from {} by {} vs {} bins from {} by {}",
                    self.bins.len(),
                    self.minimum,
                    self.delta,
                    other.bins.len(),
                    other.minimum,
                    other.delta
                ),
            });
        }

        for (mine, theirs) in self.bins.iter_mut().zip(other.bins.iter()) {
            *mine = (*mine as i64 + factor * *theirs as i64).max(0) as u64;
        }
        self.n_added = (self.n_added as i64 + factor * other.n_added as i64).max(0) as u64;
        self.n_missed = (self.n_missed as i64 + factor * other.n_missed as i64).max(0) as u64;
        Ok(())
    }

    /// Reduce this histogram's bin counts across every worker in
    /// `pool`, leaving the combined total on every rank.
    pub fn all_sum(&mut self, pool: &impl ProcessPool) {
        let counts: Vec<f64> = self.bins.iter().map(|&c| c as f64).collect();
        let totals = pool.all_sum(&counts);
        for (bin, total) in self.bins.iter_mut().zip(totals.into_iter()) {
            *bin = total.round() as u64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process_pool::NullPool;

    #[test]
    fn bins_and_counts_samples() {
        let mut h = Histogram::initialise(0.0, 1.0, 0.2);
        assert_eq!(h.n_bins(), 5);
        for x in [0.0, 0.1, 0.2, 0.99, 0.5] {
            h.add(x);
        }
        assert_eq!(h.n_added(), 5);
        assert_eq!(h.bins()[0], 2);
        assert_eq!(h.bins()[4], 1);
    }

    #[test]
    fn out_of_range_samples_are_counted_as_missed() {
        let mut h = Histogram::initialise(0.0, 1.0, 0.2);
        h.add(-0.5);
        h.add(1.5);
        assert_eq!(h.n_missed(), 2);
        assert_eq!(h.n_added(), 0);
    }

    #[test]
    fn normalised_sums_to_one() {
        let mut h = Histogram::initialise(0.0, 2.0, 0.5);
        for x in [0.1, 0.1, 0.6, 1.1, 1.6] {
            h.add(x);
        }
        let norm = h.normalised();
        let sum: f64 = norm.iter().sum();
        assert!((sum - 1.0).abs() < 1.0e-12);
    }

    #[test]
    fn accumulate_sums_matching_histograms() {
        let mut a = Histogram::initialise(0.0, 1.0, 0.5);
        let mut b = Histogram::initialise(0.0, 1.0, 0.5);
        a.add(0.1);
        b.add(0.1);
        b.add(0.6);
        a.accumulate(&b, 1).unwrap();
        assert_eq!(a.bins()[0], 2);
        assert_eq!(a.bins()[1], 1);
        assert_eq!(a.n_added(), 3);
    }

    #[test]
    fn accumulate_rejects_mismatched_shape() {
        let mut a = Histogram::initialise(0.0, 1.0, 0.5);
        let b = Histogram::initialise(0.0, 1.0, 0.25);
        assert!(matches!(a.accumulate(&b, 1), Err(Error::ShapeError { .. })));
    }

    #[test]
    fn all_sum_is_identity_under_null_pool() {
        let mut h = Histogram::initialise(0.0, 1.0, 0.5);
        h.add(0.1);
        h.all_sum(&NullPool);
        assert_eq!(h.bins()[0], 1);
    }
}
