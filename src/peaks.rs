//! Local-maximum detection and prominence scoring over an [`Xy`]
//! series (or any bare value/domain pair).

use crate::xy::Xy;

/// A detected peak: its height, the domain value it occurs at, and its
/// index into the source series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// Height of the peak.
    pub value: f64,
    /// Domain (x) value the peak occurs at.
    pub x: f64,
    /// Index into the source series.
    pub index: usize,
}

/// A peak together with its prominence: how far it stands above the
/// higher of the two valleys (or inflection points) bounding it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prominence {
    /// The peak this prominence was computed for.
    pub peak: Peak,
    /// How far the peak stands above the higher of its two bounding valleys.
    pub prominence: f64,
}

/// Peak finder over a fixed `(values, domain)` pair.
pub struct Peaks<'a> {
    values: &'a [f64],
    domain: &'a [f64],
    threshold: f64,
    isolation: f64,
}

fn is_local_maximum(p: [f64; 3]) -> bool {
    p[1] - p[0] > 0.0 && p[2] - p[1] <= 0.0
}

fn is_local_minimum(p: [f64; 3]) -> bool {
    is_local_maximum([-p[0], -p[1], -p[2]])
}

fn is_inflection_point(p: [f64; 3]) -> bool {
    ((p[1] - p[0] != 0.0) && p[2] - p[1] == 0.0) || ((p[2] - p[1] != 0.0) && p[1] - p[0] == 0.0)
}

impl<'a> Peaks<'a> {
    /// Build a peak finder over raw `values`/`domain` slices, with no
    /// threshold or isolation constraint.
    ///
    /// # Panics
    /// Panics if the two slices differ in length.
    #[must_use]
    pub fn new(values: &'a [f64], domain: &'a [f64]) -> Self {
        assert_eq!(values.len(), domain.len(), "Peaks::new: values and domain must have equal length");
        Self { values, domain, threshold: f64::NEG_INFINITY, isolation: 0.0 }
    }

    /// Build a peak finder over an [`Xy`] series's `y` values against
    /// its `x` abscissa.
    #[must_use]
    pub fn from_xy(source: &'a Xy) -> Self {
        Self::new(source.y(), source.x())
    }

    /// Only report peaks whose height exceeds `threshold`.
    pub fn set_threshold(&mut self, threshold: f64) -> &mut Self {
        self.threshold = threshold;
        self
    }

    /// Post-filter by keeping only peaks at least `radius` apart in
    /// `x` from any already-kept higher peak.
    pub fn set_isolation(&mut self, radius: f64) -> &mut Self {
        self.isolation = radius;
        self
    }

    /// Find local maxima meeting the threshold, then (if an isolation
    /// radius is set) greedily keep only the highest peaks that are at
    /// least `isolation` apart in `x` from one another, up to
    /// `floor(x_range / isolation)` of them. Returned in index order
    /// unless `height_order` is set, in which case they are returned
    /// highest-first.
    #[must_use]
    pub fn find(&self, height_order: bool) -> Vec<Peak> {
        let mut peaks = Vec::new();
        for i in 1..self.values.len().saturating_sub(1) {
            let window = [self.values[i - 1], self.values[i], self.values[i + 1]];
            if self.values[i] > self.threshold && is_local_maximum(window) {
                peaks.push(Peak { value: self.values[i], x: self.domain[i], index: i });
            }
        }

        if self.isolation > 0.0 && !self.domain.is_empty() {
            let x_range = self.domain.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
                - self.domain.iter().cloned().fold(f64::INFINITY, f64::min);
            let max_count = (x_range / self.isolation).floor().max(0.0) as usize;
            let mut isolated = top(max_count, self.isolation, peaks);
            if !height_order {
                isolated.sort_by(|a, b| a.index.cmp(&b.index));
            }
            return isolated;
        }

        if height_order {
            peaks.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
        }
        peaks
    }

    /// Compute the prominence of every peak found by [`Self::find`].
    #[must_use]
    pub fn prominences(&self, height_order: bool) -> Vec<Prominence> {
        let peaks = self.find(height_order);
        self.prominences_of(&peaks, height_order)
    }

    /// Compute the prominence of an already-determined set of `peaks`.
    /// A peak whose neighbourhood contains no local minimum or
    /// inflection point in either direction is silently dropped, as
    /// its prominence cannot be bounded.
    #[must_use]
    pub fn prominences_of(&self, peaks: &[Peak], height_order: bool) -> Vec<Prominence> {
        let mut result = Vec::with_capacity(peaks.len());

        for &peak in peaks {
            let mut height_left = None;
            let mut i = peak.index as isize - 1;
            while i > 0 {
                let idx = i as usize;
                let window = [self.values[idx + 1], self.values[idx], self.values[idx - 1]];
                if is_local_minimum(window) || is_inflection_point(window) {
                    height_left = Some(self.values[idx]);
                    break;
                }
                i -= 1;
            }

            let mut height_right = None;
            let mut j = peak.index + 1;
            while j < self.values.len() {
                let window = [self.values[j - 1], self.values[j], self.values.get(j + 1).copied().unwrap_or(self.values[j])];
                if is_local_minimum(window) || is_inflection_point(window) {
                    height_right = Some(self.values[j]);
                    break;
                }
                j += 1;
            }

            let prominence = match (height_left, height_right) {
                (None, None) => continue,
                (Some(l), None) => (l - peak.value).abs(),
                (None, Some(r)) => (r - peak.value).abs(),
                (Some(l), Some(r)) => (l - peak.value).abs().min((r - peak.value).abs()),
            };

            result.push(Prominence { peak, prominence });
        }

        if !height_order {
            result.sort_by(|a, b| a.peak.index.cmp(&b.peak.index));
        }
        result
    }
}

/// Greedily keep up to `n` highest peaks, skipping any peak whose `x`
/// falls within `isolation` of an already-kept higher peak's `x`.
fn top(n: usize, isolation: f64, mut peaks: Vec<Peak>) -> Vec<Peak> {
    peaks.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));

    let mut kept: Vec<Peak> = Vec::with_capacity(peaks.len());
    for peak in peaks {
        let too_close = kept.iter().any(|p| (p.x - peak.x).abs() < isolation);
        if !too_close {
            kept.push(peak);
        }
        if kept.len() == n {
            break;
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bumps() -> (Vec<f64>, Vec<f64>) {
        // Two clean bumps separated by a dip to zero.
        let domain: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let values = vec![0.0, 1.0, 2.0, 1.0, 0.0, 0.0, 0.0, 1.0, 3.0, 1.0, 0.0];
        (values, domain)
    }

    #[test]
    fn finds_both_local_maxima() {
        let (values, domain) = bumps();
        let finder = Peaks::new(&values, &domain);
        let found = finder.find(false);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].index, 2);
        assert_eq!(found[1].index, 8);
    }

    #[test]
    fn threshold_excludes_the_smaller_peak() {
        let (values, domain) = bumps();
        let mut finder = Peaks::new(&values, &domain);
        finder.set_threshold(2.5);
        let found = finder.find(false);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].index, 8);
    }

    #[test]
    fn height_order_sorts_tallest_first() {
        let (values, domain) = bumps();
        let finder = Peaks::new(&values, &domain);
        let found = finder.find(true);
        assert_eq!(found[0].index, 8);
        assert_eq!(found[1].index, 2);
    }

    #[test]
    fn prominence_reflects_the_shallower_adjacent_valley() {
        let (values, domain) = bumps();
        let finder = Peaks::new(&values, &domain);
        let proms = finder.prominences(false);
        assert_eq!(proms.len(), 2);
        assert_eq!(proms[0].prominence, 2.0);
        assert_eq!(proms[1].prominence, 3.0);
    }

    #[test]
    fn empty_series_has_no_peaks() {
        let values: Vec<f64> = Vec::new();
        let domain: Vec<f64> = Vec::new();
        let finder = Peaks::new(&values, &domain);
        assert!(finder.find(false).is_empty());
    }
}
