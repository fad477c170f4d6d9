//! Ordered pair-sequence container.
//!
//! [`Xy`] is the canonical carrier for g(r), S(Q), reference scattering
//! data, and correction functions. It is value-typed: cloning duplicates
//! the contents, and any mutation bumps an internal generation counter so
//! that an [`crate::interpolation::Interpolator`] built against a stale
//! generation can detect it, replacing a `-1` sentinel on the cached
//! interval with an explicit comparison.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

const DOMAIN_TOLERANCE: f64 = 1.0e-6;

/// An ordered sequence of `(x, y)` samples plus an optional scalar `z`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Xy {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Option<f64>,
    /// Human-readable tag, used only for diagnostics.
    name: Option<String>,
    /// Tag used for cross-module lookup (e.g. by a named-data registry).
    object_tag: Option<String>,
    #[serde(skip)]
    generation: u64,
}

impl Xy {
    /// Construct an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct from existing `x`/`y` vectors.
    ///
    /// # Panics
    /// Panics if `x.len() != y.len()`.
    #[must_use]
    pub fn from_xy(x: Vec<f64>, y: Vec<f64>) -> Self {
        assert_eq!(x.len(), y.len(), "Xy::from_xy: x and y must have equal length");
        Self {
            x,
            y,
            z: None,
            name: None,
            object_tag: None,
            generation: 0,
        }
    }

    /// Append a point. The caller is responsible for ensuring `x` is
    /// strictly greater than the previous abscissa when the series will
    /// be used by [`crate::interpolation::Interpolator`] or
    /// [`crate::transform`].
    pub fn add_point(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
        self.generation += 1;
    }

    /// Resize to `n` points, zero-filled, discarding any existing data.
    pub fn initialise(&mut self, n: usize) {
        self.x = vec![0.0; n];
        self.y = vec![0.0; n];
        self.generation += 1;
    }

    /// Empty the series (size becomes zero).
    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.generation += 1;
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the series holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Abscissa values.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Mutable abscissa values. Mutating invalidates any cached
    /// interpolation keyed on this series.
    pub fn x_mut(&mut self) -> &mut [f64] {
        self.generation += 1;
        &mut self.x
    }

    /// Ordinate values.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Mutable ordinate values. Mutating invalidates any cached
    /// interpolation keyed on this series.
    pub fn y_mut(&mut self) -> &mut [f64] {
        self.generation += 1;
        &mut self.y
    }

    /// Opaque generation counter, incremented on every mutation. Used by
    /// [`crate::interpolation::Interpolator`] to detect staleness.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Optional scalar payload carried alongside the series.
    #[must_use]
    pub fn z(&self) -> Option<f64> {
        self.z
    }

    /// Set the scalar payload.
    pub fn set_z(&mut self, z: f64) {
        self.z = Some(z);
    }

    /// Human-readable diagnostic tag.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the human-readable diagnostic tag.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Cross-module lookup tag.
    #[must_use]
    pub fn object_tag(&self) -> Option<&str> {
        self.object_tag.as_deref()
    }

    /// Set the cross-module lookup tag.
    pub fn set_object_tag(&mut self, tag: impl Into<String>) {
        self.object_tag = Some(tag.into());
    }

    /// First `(x, y)` pair, if any.
    #[must_use]
    pub fn first(&self) -> Option<(f64, f64)> {
        Some((*self.x.first()?, *self.y.first()?))
    }

    /// Last `(x, y)` pair, if any.
    #[must_use]
    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.x.last()?, *self.y.last()?))
    }

    /// Minimum abscissa.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.x.first().copied().unwrap_or(0.0)
    }

    /// Maximum abscissa.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.x.last().copied().unwrap_or(0.0)
    }

    /// Minimum ordinate value.
    #[must_use]
    pub fn y_min(&self) -> f64 {
        self.y.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Maximum ordinate value.
    #[must_use]
    pub fn y_max(&self) -> f64 {
        self.y.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    fn check_domain(&self, other: &Self, operation: &'static str) -> Result<()> {
        if self.x.len() != other.x.len() {
            return Err(Error::DomainMismatch {
                component: "Xy",
                operation,
                detail: format!("lengths differ ({} vs {})", self.x.len(), other.x.len()),
            });
        }
        for (i, (a, b)) in self.x.iter().zip(other.x.iter()).enumerate() {
            if (a - b).abs() > DOMAIN_TOLERANCE {
                return Err(Error::DomainMismatch {
                    component: "Xy",
                    operation,
                    detail: format!("x[{i}] differs ({a} vs {b})"),
                });
            }
        }
        Ok(())
    }

    /// `self += other`, pointwise. Fails with [`Error::DomainMismatch`]
    /// when the abscissae are incompatible.
    pub fn add_assign_xy(&mut self, other: &Self) -> Result<()> {
        self.check_domain(other, "add_assign")?;
        for (a, b) in self.y.iter_mut().zip(other.y.iter()) {
            *a += b;
        }
        self.generation += 1;
        Ok(())
    }

    /// `self -= other`, pointwise.
    pub fn sub_assign_xy(&mut self, other: &Self) -> Result<()> {
        self.check_domain(other, "sub_assign")?;
        for (a, b) in self.y.iter_mut().zip(other.y.iter()) {
            *a -= b;
        }
        self.generation += 1;
        Ok(())
    }

    /// `self *= other`, pointwise.
    pub fn mul_assign_xy(&mut self, other: &Self) -> Result<()> {
        self.check_domain(other, "mul_assign")?;
        for (a, b) in self.y.iter_mut().zip(other.y.iter()) {
            *a *= b;
        }
        self.generation += 1;
        Ok(())
    }

    /// `self /= other`, pointwise.
    pub fn div_assign_xy(&mut self, other: &Self) -> Result<()> {
        self.check_domain(other, "div_assign")?;
        for (a, b) in self.y.iter_mut().zip(other.y.iter()) {
            *a /= b;
        }
        self.generation += 1;
        Ok(())
    }

    /// `self += scalar`.
    pub fn add_assign_scalar(&mut self, value: f64) {
        for a in &mut self.y {
            *a += value;
        }
        self.generation += 1;
    }

    /// `self *= scalar`.
    pub fn mul_assign_scalar(&mut self, factor: f64) {
        for a in &mut self.y {
            *a *= factor;
        }
        self.generation += 1;
    }

    /// `self /= scalar`.
    pub fn div_assign_scalar(&mut self, divisor: f64) {
        for a in &mut self.y {
            *a /= divisor;
        }
        self.generation += 1;
    }

    /// Trapezium-rule integral of y over x.
    #[must_use]
    pub fn integral(&self) -> f64 {
        self.x
            .windows(2)
            .zip(self.y.windows(2))
            .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) * 0.5)
            .sum()
    }

    /// Trapezium-rule integral of `|y|` over x.
    #[must_use]
    pub fn abs_integral(&self) -> f64 {
        self.x
            .windows(2)
            .zip(self.y.windows(2))
            .map(|(xs, ys)| ((xs[1] - xs[0]) * (ys[0] + ys[1]) * 0.5).abs())
            .sum()
    }

    /// Keep only points with `xmin <= x <= xmax`.
    pub fn trim(&mut self, xmin: f64, xmax: f64) {
        let mut new_x = Vec::new();
        let mut new_y = Vec::new();
        for (&x, &y) in self.x.iter().zip(self.y.iter()) {
            if x < xmin {
                continue;
            }
            if x > xmax {
                break;
            }
            new_x.push(x);
            new_y.push(y);
        }
        self.x = new_x;
        self.y = new_y;
        self.generation += 1;
    }

    /// Rebin onto a uniform grid of spacing `delta_x`, linearly
    /// interpolating the original data. A negative `delta_x` means "use
    /// half the average original spacing".
    pub fn rebin(&mut self, delta_x: f64) {
        if self.x.len() < 2 {
            return;
        }
        let delta_x = if delta_x < 0.0 {
            let mut total = 0.0;
            for w in self.x.windows(2) {
                total += w[1] - w[0];
            }
            0.5 * total / (self.x.len() - 1) as f64
        } else {
            delta_x
        };

        let interp = crate::interpolation::Interpolator::new(self, crate::interpolation::Scheme::Linear);
        let x_max = self.max();
        let mut new_x = Vec::new();
        let mut new_y = Vec::new();
        let mut x = self.min();
        while x < x_max {
            new_x.push(x);
            new_y.push(interp.y(x));
            x += delta_x;
        }
        self.x = new_x;
        self.y = new_y;
        self.generation += 1;
    }

    /// Centred moving-average smoothing. `width` is forced odd; the ends
    /// use shrinking kernels so no phase shift is introduced.
    pub fn smooth_moving_average(&mut self, width: usize) {
        let width = if width % 2 == 0 { width.saturating_sub(1).max(1) } else { width };
        let n = self.y.len();
        if n == 0 {
            return;
        }
        let half = width / 2;
        let mut smoothed = vec![0.0; n];

        for (i, slot) in smoothed.iter_mut().enumerate() {
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(n - 1);
            let window = &self.y[lo..=hi];
            *slot = window.iter().sum::<f64>() / window.len() as f64;
        }

        self.y = smoothed;
        self.generation += 1;
    }

    /// Median filter of the given odd window `length`, selecting (per
    /// point) the windowed value closest to the mean of the window with
    /// its minimum and maximum excluded. Boundary points within
    /// `length / 2` of either end are left unchanged.
    pub fn median_filter(&mut self, length: usize) {
        let n = self.y.len();
        if length < 3 || n < length {
            return;
        }
        let half = length / 2;
        let mut filtered = self.y.clone();

        for centre in half..n - half {
            let window = &self.y[centre - half..=centre + half];
            let min_idx = window
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .unwrap()
                .0;
            let max_idx = window
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .unwrap()
                .0;

            let trimmed: Vec<f64> = window
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != min_idx && *i != max_idx)
                .map(|(_, &v)| v)
                .collect();
            if trimmed.is_empty() {
                continue;
            }
            let avg = trimmed.iter().sum::<f64>() / trimmed.len() as f64;
            filtered[centre] = *trimmed
                .iter()
                .min_by(|a, b| (*a - avg).abs().partial_cmp(&(*b - avg).abs()).unwrap())
                .unwrap();
        }

        self.y = filtered;
        self.generation += 1;
    }

    /// Kolmogorov-Zurbenko filter: `k` repeated moving averages of width
    /// `m`.
    pub fn kolmogorov_zurbenko(&mut self, k: usize, m: usize) {
        for _ in 0..k {
            self.smooth_moving_average(m);
        }
    }

    /// Write as whitespace-separated text: `x y` per line (or `x y
    /// y_err` if `y_err` is supplied), using `%16.10e` formatting.
    ///
    /// # Errors
    /// Propagates any I/O error from `writer`.
    pub fn save(&self, mut writer: impl Write) -> std::io::Result<()> {
        for (x, y) in self.x.iter().zip(self.y.iter()) {
            writeln!(writer, "{x:16.10e} {y:16.10e}")?;
        }
        Ok(())
    }

    /// Load from whitespace-separated text with columns `x y [y_err]`.
    /// Lines starting with `#`, and blank lines, are skipped.
    ///
    /// # Errors
    /// Returns [`Error::ParseError`] on a malformed non-blank,
    /// non-comment line.
    pub fn load(reader: impl BufRead) -> Result<Self> {
        let mut data = Self::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::ParseError {
                component: "Xy",
                operation: "load",
                line: line_no + 1,
                detail: e.to_string(),
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut tokens = trimmed.split_whitespace();
            let x: f64 = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| Error::ParseError {
                    component: "Xy",
                    operation: "load",
                    line: line_no + 1,
                    detail: format!("missing/invalid x column in '{line}'"),
                })?;
            let y: f64 = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| Error::ParseError {
                    component: "Xy",
                    operation: "load",
                    line: line_no + 1,
                    detail: format!("missing/invalid y column in '{line}'"),
                })?;
            data.add_point(x, y);
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn arithmetic_on_aligned_data() {
        let mut a = Xy::from_xy(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0, 4.0]);
        let b = a.clone();

        a.add_assign_xy(&b).unwrap();
        assert_eq!(a.y(), &[2.0, 4.0, 6.0, 8.0]);

        a.mul_assign_scalar(0.5);
        assert_eq!(a.y(), &[1.0, 2.0, 3.0, 4.0]);

        let mismatched = Xy::from_xy(vec![0.0, 1.0, 2.0, 3.001], vec![1.0, 2.0, 3.0, 4.0]);
        assert!(matches!(
            a.add_assign_xy(&mismatched),
            Err(Error::DomainMismatch { .. })
        ));
    }

    #[test]
    fn integral_of_linear_ramp() {
        let data = Xy::from_xy(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]);
        assert_approx_eq!(f64, data.integral(), 2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn trim_keeps_only_requested_range() {
        let mut data = Xy::from_xy(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        data.trim(1.0, 3.0);
        assert_eq!(data.x(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn save_load_round_trips() {
        let data = Xy::from_xy(vec![0.0, 1.5, 3.0], vec![1.0, -2.5, 4.25]);
        let mut buffer = Vec::new();
        data.save(&mut buffer).unwrap();

        let reloaded = Xy::load(std::io::BufReader::new(buffer.as_slice())).unwrap();
        for (a, b) in data.x().iter().zip(reloaded.x().iter()) {
            assert_approx_eq!(f64, *a, *b, epsilon = 1.0e-10);
        }
        for (a, b) in data.y().iter().zip(reloaded.y().iter()) {
            assert_approx_eq!(f64, *a, *b, epsilon = 1.0e-10);
        }
    }

    #[test]
    fn median_filter_removes_single_spike() {
        let mut data = Xy::from_xy(
            (0..9).map(|i| i as f64).collect(),
            vec![1.0, 1.0, 1.0, 1.0, 50.0, 1.0, 1.0, 1.0, 1.0],
        );
        data.median_filter(3);
        assert_approx_eq!(f64, data.y()[4], 1.0, epsilon = 1.0e-9);
    }
}
