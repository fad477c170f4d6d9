//! Interpolation of an [`Xy`](crate::xy::Xy) series.
//!
//! An [`Interpolator`] eagerly builds coefficients for one of four
//! schemes (natural cubic spline, linear, three-point Lagrange blend, or
//! "none", which falls back to spline) and then answers `y(x)` queries
//! in O(1) for sequential access (a sticky last-interval cache) or
//! O(log n) for random access (binary search).

use crate::error::{Error, Result};
use crate::xy::Xy;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Interpolation scheme.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum Scheme {
    /// No scheme requested explicitly; falls back to [`Scheme::Spline`].
    None,
    /// Natural cubic spline (zero curvature at both endpoints).
    Spline,
    /// Piecewise linear.
    Linear,
    /// Lagrange quadratic blended between two overlapping three-point fits.
    ThreePoint,
}

/// Precomputed interpolation coefficients over an [`Xy`] series.
#[derive(Clone, Debug)]
pub struct Interpolator {
    x: Vec<f64>,
    y: Vec<f64>,
    scheme: Scheme,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
    h: Vec<f64>,
    last_interval: Cell<i64>,
    source_generation: u64,
}

impl Interpolator {
    /// Build an interpolator over `source` using `scheme`, eagerly
    /// computing coefficients. The interpolator copies `source`'s data;
    /// mutating `source` afterwards obliges the caller to rebuild.
    #[must_use]
    pub fn new(source: &Xy, scheme: Scheme) -> Self {
        let mut interp = Self {
            x: source.x().to_vec(),
            y: source.y().to_vec(),
            scheme,
            a: Vec::new(),
            b: Vec::new(),
            c: Vec::new(),
            d: Vec::new(),
            h: Vec::new(),
            last_interval: Cell::new(-1),
            source_generation: source.generation(),
        };
        interp.build();
        interp
    }

    /// Generation of the source [`Xy`] this interpolator was built
    /// against. Compare against `source.generation()` to detect
    /// staleness after a mutation.
    #[must_use]
    pub fn source_generation(&self) -> u64 {
        self.source_generation
    }

    fn build(&mut self) {
        let n = self.x.len();
        if n < 2 {
            return;
        }
        self.h = self.x.windows(2).map(|w| w[1] - w[0]).collect();

        match self.scheme {
            Scheme::None | Scheme::Spline => self.build_spline(),
            Scheme::Linear => self.build_linear(),
            Scheme::ThreePoint => { /* no precomputation required */ }
        }
        self.last_interval.set(-1);
    }

    // Natural cubic spline: solve the tridiagonal system for the second
    // derivatives `m` by Thomas elimination, then derive a/b/c/d.
    fn build_spline(&mut self) {
        let n = self.x.len();
        let h = &self.h;

        let mut r_prime = vec![0.0; n];
        let mut s_prime = vec![0.0; n];
        for i in 1..n - 1 {
            let p = h[i - 1];
            let q = 2.0 * (h[i - 1] + h[i]);
            let r = h[i];
            let s = 6.0 * ((self.y[i + 1] - self.y[i]) / h[i] - (self.y[i] - self.y[i - 1]) / h[i - 1]);
            let denom = q - r_prime[i - 1] * p;
            r_prime[i] = r / denom;
            s_prime[i] = (s - s_prime[i - 1] * p) / denom;
        }

        let mut m = vec![0.0; n];
        m[n - 1] = 0.0;
        for i in (0..n - 1).rev() {
            m[i] = s_prime[i] - r_prime[i] * m[i + 1];
        }

        self.a = vec![0.0; n - 1];
        self.b = vec![0.0; n - 1];
        self.c = vec![0.0; n - 1];
        self.d = vec![0.0; n - 1];
        for i in 0..n - 1 {
            self.a[i] = self.y[i];
            self.b[i] = (self.y[i + 1] - self.y[i]) / h[i] - h[i] * m[i] / 2.0 - h[i] * (m[i + 1] - m[i]) / 6.0;
            self.c[i] = m[i] / 2.0;
            self.d[i] = (m[i + 1] - m[i]) / (6.0 * h[i]);
        }
    }

    fn build_linear(&mut self) {
        let n = self.x.len();
        self.a = vec![0.0; n - 1];
        for i in 0..n - 1 {
            self.a[i] = self.y[i + 1] - self.y[i];
        }
    }

    fn locate_interval(&self, x: f64) -> usize {
        let n = self.x.len();
        let cached = self.last_interval.get();

        if cached >= 0 {
            let cached = cached as usize;
            if cached + 1 < n && x >= self.x[cached] && x < self.x[cached + 1] {
                return cached;
            }
        }

        // Binary chop over interval indices [0, n-2].
        let mut lo = 0usize;
        let mut hi = n.saturating_sub(2);
        while hi > lo {
            let mid = lo + (hi - lo + 1) / 2;
            if self.x[mid] > x {
                hi = mid - 1;
            } else {
                lo = mid;
            }
        }
        self.last_interval.set(lo as i64);
        lo
    }

    /// Evaluate the interpolant at `x`. `x <= x_first` returns `y_first`;
    /// `x >= x_last` returns `y_last`; there is no extrapolation.
    #[must_use]
    pub fn y(&self, x: f64) -> f64 {
        let n = self.x.len();
        if n == 0 {
            return 0.0;
        }
        if n == 1 || x <= self.x[0] {
            return self.y[0];
        }
        if x >= self.x[n - 1] {
            return self.y[n - 1];
        }

        let i = self.locate_interval(x);

        match self.scheme {
            Scheme::None | Scheme::Spline => {
                let hh = x - self.x[i];
                self.a[i] + self.b[i] * hh + self.c[i] * hh * hh + self.d[i] * hh * hh * hh
            }
            Scheme::Linear => {
                let t = (x - self.x[i]) / self.h[i];
                self.y[i] + t * self.a[i]
            }
            Scheme::ThreePoint => {
                // The last usable triple starts at n - 3; beyond that,
                // clamp to the final value.
                if i >= n - 2 {
                    return self.y[n - 1];
                }
                let t = (x - self.x[i]) / self.h[i];
                let v0 = self.y[i];
                let v1 = self.y[i + 1];
                let v2 = self.y[i + 2];
                let t1 = v0 + (v1 - v0) * t;
                let t2 = v1 + (v2 - v1) * (t - 1.0);
                t1 + (t2 - t1) * t * 0.5
            }
        }
    }
}

/// Three-point interpolation of `data` at `x`, without building any
/// persistent coefficients. Useful for one-off lookups.
#[must_use]
pub fn approximate(data: &Xy, x: f64) -> f64 {
    let xs = data.x();
    let ys = data.y();
    let n = xs.len();
    if n == 0 {
        return 0.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }

    let mut lo = 0usize;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if xs[mid] > x {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    if lo >= n - 2 {
        return ys[n - 1];
    }

    let h = xs[lo + 1] - xs[lo];
    let t = (x - xs[lo]) / h;
    let v0 = ys[lo];
    let v1 = ys[lo + 1];
    let v2 = ys[lo + 2];
    let t1 = v0 + (v1 - v0) * t;
    let t2 = v1 + (v2 - v1) * (t - 1.0);
    t1 + (t2 - t1) * t * 0.5
}

/// Add `factor * interp(src, dst.x[i])` to each `dst.y[i]`.
///
/// # Errors
/// Returns [`Error::ShapeError`] if `dst` holds no points.
pub fn add_interpolated(src: &Interpolator, dst: &mut Xy, factor: f64) -> Result<()> {
    if dst.is_empty() {
        return Err(Error::ShapeError {
            component: "Interpolator",
            operation: "add_interpolated",
            detail: "destination series has no points".to_string(),
        });
    }
    let xs = dst.x().to_vec();
    for (x, y) in xs.iter().zip(dst.y_mut().iter_mut()) {
        *y += factor * src.y(*x);
    }
    Ok(())
}
