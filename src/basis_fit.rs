//! Empirical potential generation by basis-function fitting: represent
//! a difference function as a weighted sum of localised basis
//! functions (Gaussian or Poisson) and fit the weights against a
//! reference, either by direct Monte-Carlo descent over every
//! coefficient or by sweeping overlapping windows of coefficients.

use crate::error::{Error, Result};
use crate::minimiser::MonteCarloMinimiser;
use crate::xy::Xy;
use enum_dispatch::enum_dispatch;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Which space a basis function (or a fit) is evaluated/performed in.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum FunctionSpace {
    /// Real space (r).
    RealSpace,
    /// Reciprocal space (Q).
    ReciprocalSpace,
}

/// Shared interface over the interchangeable basis-function families.
#[enum_dispatch]
pub trait BasisFit {
    /// Fix the basis layout (function centres spaced over `[0, r_max]`)
    /// and initial coefficients, and pre-compute auxiliary terms.
    fn set(&mut self, space: FunctionSpace, r_max: f64, coefficients: Vec<f64>, sigma_q: f64, sigma_r: f64) -> Result<()>;

    /// Evaluate `factor * sum_k C_k * phi_k(x)` on a fresh uniform grid
    /// `[x_min, x_max]` stepping by `x_step`. `fwhm_factor` rescales
    /// basis widths for visualisation only (Gaussian families); it is
    /// ignored by families with no width parameter to rescale.
    fn approximation(&self, space: FunctionSpace, factor: f64, x_min: f64, x_step: f64, x_max: f64, fwhm_factor: f64) -> Xy;

    /// Fit every non-excluded coefficient simultaneously by Monte-Carlo
    /// descent against the reciprocal-space reference, optionally
    /// smoothing the coefficient vector every `smoothing` iterations.
    /// Coefficients whose nominal `r` is below `r_min` are excluded and
    /// held at zero. Returns the terminal percent error.
    fn construct_reciprocal(
        &mut self,
        r_min: f64,
        r_max: f64,
        sigma_q: f64,
        sigma_r: f64,
        n_iterations: usize,
        initial_step_size: f64,
        smoothing: Option<usize>,
    ) -> Result<f64>;

    /// Block-sweep refinement over overlapping windows of
    /// `sample_size` coefficients, `n_loops` full passes with a
    /// rotating start index. Returns the terminal percent error.
    fn sweep_fit_c(&mut self, space: FunctionSpace, x_min: f64, sample_size: usize, overlap: usize, n_loops: usize) -> f64;

    /// Pin C₀ at zero when `true` (the basis's DC term is unphysical
    /// for the difference being fitted).
    fn set_ignore_zeroth_term(&mut self, ignore: bool);

    /// Whether C₀ is pinned at zero.
    fn ignore_zeroth_term(&self) -> bool;

    /// Current coefficients.
    fn coefficients(&self) -> &[f64];

    /// The most recently generated approximation.
    fn approximate_data(&self) -> &Xy;
}

/// Dispatch enum over the two basis families.
#[enum_dispatch(BasisFit)]
pub enum BasisFitEnum {
    /// Gaussian basis.
    Gaussian(GaussianFit),
    /// Poisson basis.
    Poisson(PoissonFit),
}

const EXP_MAX: f64 = 25.0;

fn gaussian_value(x: f64, x_centre: f64, a: f64, sigma: f64) -> f64 {
    a * (-(x - x_centre).powi(2) / (2.0 * sigma * sigma)).exp()
}

fn gaussian_ft_value(q: f64, x_centre: f64, a: f64, sigma: f64) -> f64 {
    let qx = q * x_centre;
    let envelope = a * (-0.5 * q * q * sigma * sigma).exp();
    if qx.abs() < 1.0e-12 {
        envelope
    } else {
        envelope * qx.sin() / qx
    }
}

fn poisson_value(r: f64, n: i64, sigma_r: f64, ln_n_plus_two_factorial: f64) -> f64 {
    let ln_factor = (4.0 * PI * sigma_r.powi(3)).ln() + ln_n_plus_two_factorial;
    if r <= 0.0 {
        return if n == 0 { (-ln_factor).exp() } else { 0.0 };
    }
    let exponent = -(r / sigma_r) - ln_factor + n as f64 * (r / sigma_r).ln();
    if exponent > -EXP_MAX {
        exponent.exp()
    } else {
        0.0
    }
}

fn poisson_ft_value(
    q: f64,
    n: i64,
    sigma_q: f64,
    sqrt_one_plus_qsq_sigmasq: f64,
    one_minus_qsq_sigmasq: f64,
    arctan_q_sigma: f64,
) -> f64 {
    let n = n as f64;
    let na = n * arctan_q_sigma;
    let factor = 1.0 / ((n + 2.0) * sqrt_one_plus_qsq_sigmasq.powf(n + 4.0));
    let value = 2.0 * na.cos()
        + if q.abs() > 1.0e-12 {
            (one_minus_qsq_sigmasq / (q * sigma_q)) * na.sin()
        } else {
            0.0
        };
    factor * value
}

fn percent_error(reference: &Xy, approximate: &Xy) -> f64 {
    let ref_sum: f64 = reference.y().iter().map(|v| v.abs()).sum();
    let diff_sum: f64 = reference
        .y()
        .iter()
        .zip(approximate.y().iter())
        .map(|(r, a)| (r - a).abs())
        .sum();
    if ref_sum < 1.0e-12 {
        0.0
    } else {
        100.0 * diff_sum / ref_sum
    }
}

fn uniform_grid(x_min: f64, x_step: f64, x_max: f64) -> Vec<f64> {
    let mut xs = Vec::new();
    let mut x = x_min;
    while x <= x_max {
        xs.push(x);
        x += x_step;
    }
    xs
}

// Shared block-sweep driver: fit `values[window]` against `reference`
// where the cost is sum-of-squares of `reference - (rest_of_approx +
// sum of the window's own contributions)`. `phi` evaluates basis
// function `k` at reference point `m`.
fn sweep_fit_c_generic(
    reference: &Xy,
    c: &mut [f64],
    phi: impl Fn(usize, usize) -> f64,
    ignore_zeroth_term: bool,
    nominal_r: impl Fn(usize) -> f64,
    x_min: f64,
    sample_size: usize,
    overlap: usize,
    n_loops: usize,
) -> Xy {
    let n_points = reference.len();
    let n_functions = c.len();
    let mut rng = Pcg64Mcg::seed_from_u64(0xBA51_5F17);

    let full_sum = |c: &[f64]| -> Vec<f64> {
        let mut out = vec![0.0; n_points];
        for (k, &ck) in c.iter().enumerate() {
            if ck == 0.0 {
                continue;
            }
            for m in 0..n_points {
                out[m] += ck * phi(k, m);
            }
        }
        out
    };

    for loop_idx in 0..n_loops.max(1) {
        let mut p = if n_loops == 0 { 0 } else { loop_idx * (sample_size / n_loops.max(1)) };
        if p == 0 && ignore_zeroth_term {
            p = 1;
        }

        while p < n_functions {
            let mut approximate = full_sum(c);
            let window_start = p;
            let mut window: Vec<usize> = Vec::new();
            let mut count = 0;
            let mut idx = p;
            while count < sample_size && idx < n_functions {
                if nominal_r(idx) >= x_min {
                    window.push(idx);
                    for m in 0..n_points {
                        approximate[m] -= c[idx] * phi(idx, m);
                    }
                }
                idx += 1;
                count += 1;
            }
            p = idx;

            if !window.is_empty() {
                let fixed_background = approximate;
                let mut window_values: Vec<f64> = window.iter().map(|&k| c[k]).collect();
                let mut minimiser = MonteCarloMinimiser::new(|trial: &[f64]| {
                    let mut sose = 0.0;
                    for m in 0..n_points {
                        let mut y = fixed_background[m];
                        for (slot, &k) in window.iter().enumerate() {
                            y += trial[slot] * phi(k, m);
                        }
                        let dy = reference.y()[m] - y;
                        sose += dy * dy;
                    }
                    sose
                });
                minimiser.set_step_size(0.01).set_max_iterations(200);
                minimiser.minimise(&mut window_values, &mut rng, None);
                for (slot, &k) in window.iter().enumerate() {
                    c[k] = window_values[slot];
                }
            }

            if p < n_functions {
                p = p.saturating_sub(overlap).max(window_start + 1);
            }
        }
    }

    let final_sum = full_sum(c);
    Xy::from_xy(reference.x().to_vec(), final_sum)
}

/// Gaussian basis: `g(r; x_c, A, sigma) = A * exp(-(r-x_c)^2 / (2 sigma^2))`,
/// with analytic Fourier transform `G(Q) = A * exp(-0.5 Q^2 sigma^2) * sinc(Q x_c)`.
pub struct GaussianFit {
    reference: Xy,
    approximate: Xy,
    c: Vec<f64>,
    x_centres: Vec<f64>,
    sigma: f64,
    ignore_zeroth_term: bool,
}

impl GaussianFit {
    /// Build a fit against `reference`, with no functions defined yet.
    #[must_use]
    pub fn new(reference: Xy) -> Self {
        Self {
            approximate: reference.clone(),
            reference,
            c: Vec::new(),
            x_centres: Vec::new(),
            sigma: 1.0,
            ignore_zeroth_term: true,
        }
    }

    fn phi(&self, space: FunctionSpace, k: usize, x: f64, fwhm_factor: f64) -> f64 {
        let sigma = self.sigma * fwhm_factor;
        match space {
            FunctionSpace::RealSpace => gaussian_value(x, self.x_centres[k], 1.0, sigma),
            FunctionSpace::ReciprocalSpace => gaussian_ft_value(x, self.x_centres[k], 1.0, sigma),
        }
    }
}

impl BasisFit for GaussianFit {
    fn set(&mut self, _space: FunctionSpace, r_max: f64, coefficients: Vec<f64>, _sigma_q: f64, sigma_r: f64) -> Result<()> {
        let n = coefficients.len();
        if n == 0 {
            return Err(Error::ShapeError {
                component: "GaussianFit",
                operation: "set",
                detail: "at least one coefficient is required".to_string(),
            });
        }
        let r_step = r_max / n as f64;
        self.x_centres = (0..n).map(|k| (k as f64 + 1.0) * r_step).collect();
        self.sigma = sigma_r;
        self.c = coefficients;
        self.approximate = Xy::from_xy(self.reference.x().to_vec(), vec![0.0; self.reference.len()]);
        Ok(())
    }

    fn approximation(&self, space: FunctionSpace, factor: f64, x_min: f64, x_step: f64, x_max: f64, fwhm_factor: f64) -> Xy {
        let xs = uniform_grid(x_min, x_step, x_max);
        let ys: Vec<f64> = xs
            .iter()
            .map(|&x| {
                factor
                    * self
                        .c
                        .iter()
                        .enumerate()
                        .map(|(k, &ck)| ck * self.phi(space, k, x, fwhm_factor))
                        .sum::<f64>()
            })
            .collect();
        Xy::from_xy(xs, ys)
    }

    fn construct_reciprocal(
        &mut self,
        r_min: f64,
        r_max: f64,
        sigma_q: f64,
        sigma_r: f64,
        n_iterations: usize,
        initial_step_size: f64,
        smoothing: Option<usize>,
    ) -> Result<f64> {
        if self.reference.len() < 2 {
            return Err(Error::ShapeError {
                component: "GaussianFit",
                operation: "construct_reciprocal",
                detail: "reference needs at least two points".to_string(),
            });
        }
        self.set(FunctionSpace::ReciprocalSpace, r_max, self.c.clone(), sigma_q, sigma_r)?;
        let n = self.c.len();
        let start = if self.ignore_zeroth_term { 1 } else { 0 };
        let active: Vec<usize> = (start..n).filter(|&k| self.x_centres[k] >= r_min).collect();

        let mut rng = Pcg64Mcg::seed_from_u64(0x6A55_1A_17);
        let q = self.reference.x().to_vec();
        let y_ref = self.reference.y().to_vec();
        let x_centres = self.x_centres.clone();
        let sigma = self.sigma;

        let mut values: Vec<f64> = active.iter().map(|&k| self.c[k]).collect();
        let mut minimiser = MonteCarloMinimiser::new(|trial: &[f64]| {
            let mut sose = 0.0;
            for (m, &qm) in q.iter().enumerate() {
                let mut y = 0.0;
                for (slot, &k) in active.iter().enumerate() {
                    let qx = qm * x_centres[k];
                    let envelope = trial[slot] * (-0.5 * qm * qm * sigma * sigma).exp();
                    y += if qx.abs() < 1.0e-12 { envelope } else { envelope * qx.sin() / qx };
                }
                let dy = y_ref[m] - y;
                sose += dy * dy;
            }
            sose
        });
        minimiser.set_max_iterations(n_iterations).set_step_size(initial_step_size);
        if let Some(freq) = smoothing {
            minimiser.set_sampling_frequency(freq);
        }

        let mut smoother = smoothing.map(|width| {
            move |vals: &mut [f64]| {
                let copy = vals.to_vec();
                let half = width / 2;
                for (i, v) in vals.iter_mut().enumerate() {
                    let lo = i.saturating_sub(half);
                    let hi = (i + half).min(copy.len() - 1);
                    *v = copy[lo..=hi].iter().sum::<f64>() / (hi - lo + 1) as f64;
                }
            }
        });
        let sampling: Option<&mut dyn FnMut(&mut [f64])> =
            smoother.as_mut().map(|s| s as &mut dyn FnMut(&mut [f64]));
        minimiser.minimise(&mut values, &mut rng, sampling);

        for (slot, &k) in active.iter().enumerate() {
            self.c[k] = values[slot];
        }

        self.approximate = self.approximation(FunctionSpace::ReciprocalSpace, 1.0, q[0], q[1] - q[0], *q.last().unwrap(), 1.0);
        Ok(percent_error(&self.reference, &self.approximate))
    }

    fn sweep_fit_c(&mut self, space: FunctionSpace, x_min: f64, sample_size: usize, overlap: usize, n_loops: usize) -> f64 {
        let reference = self.reference.clone();
        let x_centres = self.x_centres.clone();
        let sigma = self.sigma;
        let ignore_zeroth_term = self.ignore_zeroth_term;
        self.approximate = sweep_fit_c_generic(
            &reference,
            &mut self.c,
            |k, m| match space {
                FunctionSpace::RealSpace => gaussian_value(reference.x()[m], x_centres[k], 1.0, sigma),
                FunctionSpace::ReciprocalSpace => gaussian_ft_value(reference.x()[m], x_centres[k], 1.0, sigma),
            },
            ignore_zeroth_term,
            |k| x_centres[k],
            x_min,
            sample_size,
            overlap,
            n_loops,
        );
        percent_error(&self.reference, &self.approximate)
    }

    fn set_ignore_zeroth_term(&mut self, ignore: bool) {
        self.ignore_zeroth_term = ignore;
    }

    fn ignore_zeroth_term(&self) -> bool {
        self.ignore_zeroth_term
    }

    fn coefficients(&self) -> &[f64] {
        &self.c
    }

    fn approximate_data(&self) -> &Xy {
        &self.approximate
    }
}

/// Poisson basis: `p_n(r; sigma_r) ~ (r/sigma_r)^n * exp(-r/sigma_r)`,
/// per Phys. Rev. B 72, 104204 (2005) Eq. 7/9.
pub struct PoissonFit {
    reference: Xy,
    approximate: Xy,
    c: Vec<f64>,
    sigma_r: f64,
    sigma_q: f64,
    n: Vec<i64>,
    ln_n_plus_two_factorial: Vec<f64>,
    sqrt_one_plus_qsq_sigmasq: Vec<f64>,
    one_minus_qsq_sigmasq: Vec<f64>,
    arctan_q_sigma: Vec<f64>,
    ignore_zeroth_term: bool,
}

fn ln_factorial(n: i64) -> f64 {
    (1..=n.max(0)).map(|i| (i as f64).ln()).sum()
}

impl PoissonFit {
    /// Build a fit against `reference`, with no functions defined yet.
    #[must_use]
    pub fn new(reference: Xy) -> Self {
        Self {
            approximate: reference.clone(),
            reference,
            c: Vec::new(),
            sigma_r: 1.0,
            sigma_q: 1.0,
            n: Vec::new(),
            ln_n_plus_two_factorial: Vec::new(),
            sqrt_one_plus_qsq_sigmasq: Vec::new(),
            one_minus_qsq_sigmasq: Vec::new(),
            arctan_q_sigma: Vec::new(),
            ignore_zeroth_term: true,
        }
    }

    /// Nominal peak position of function `k` (used to decide whether it
    /// lies below a fit's `r_min`/`x_min` exclusion boundary).
    #[must_use]
    pub fn nominal_r(&self, k: usize) -> f64 {
        (self.n[k] as f64 + 2.0) * self.sigma_r
    }

    fn precalculate(&mut self, r_max: f64) {
        let n_poissons = self.c.len();
        let r_step = r_max / n_poissons as f64;
        let delta_n = (r_step / self.sigma_r + 0.5).floor() as i64;

        self.n = (0..n_poissons)
            .map(|i| {
                let r = (i as f64 + 1.0) * r_step;
                let n_val = (i as i64 + 1) * delta_n - 1;
                if self.sigma_r > 0.0 && self.sigma_r <= r {
                    n_val
                } else {
                    0
                }
            })
            .collect();
        self.ln_n_plus_two_factorial = self.n.iter().map(|&n| ln_factorial(n + 2)).collect();

        let q = self.reference.x();
        self.sqrt_one_plus_qsq_sigmasq = q.iter().map(|&qv| (1.0 + qv * qv * self.sigma_q * self.sigma_q).sqrt()).collect();
        self.one_minus_qsq_sigmasq = q.iter().map(|&qv| 1.0 - qv * qv * self.sigma_q * self.sigma_q).collect();
        self.arctan_q_sigma = q.iter().map(|&qv| (qv * self.sigma_q).atan()).collect();
    }

    fn poisson(&self, r: f64, k: usize) -> f64 {
        poisson_value(r, self.n[k], self.sigma_r, self.ln_n_plus_two_factorial[k])
    }

    fn poisson_ft(&self, q_index: usize, k: usize) -> f64 {
        let q = self.reference.x()[q_index];
        poisson_ft_value(
            q,
            self.n[k],
            self.sigma_q,
            self.sqrt_one_plus_qsq_sigmasq[q_index],
            self.one_minus_qsq_sigmasq[q_index],
            self.arctan_q_sigma[q_index],
        )
    }
}

impl BasisFit for PoissonFit {
    fn set(&mut self, _space: FunctionSpace, r_max: f64, coefficients: Vec<f64>, sigma_q: f64, sigma_r: f64) -> Result<()> {
        if coefficients.is_empty() {
            return Err(Error::ShapeError {
                component: "PoissonFit",
                operation: "set",
                detail: "at least one coefficient is required".to_string(),
            });
        }
        self.c = coefficients;
        self.sigma_q = sigma_q;
        self.sigma_r = sigma_r;
        self.precalculate(r_max);
        self.approximate = Xy::from_xy(self.reference.x().to_vec(), vec![0.0; self.reference.len()]);
        Ok(())
    }

    fn approximation(&self, space: FunctionSpace, factor: f64, x_min: f64, x_step: f64, x_max: f64, _fwhm_factor: f64) -> Xy {
        match space {
            FunctionSpace::RealSpace => {
                let xs = uniform_grid(x_min, x_step, x_max);
                let ys: Vec<f64> = xs
                    .iter()
                    .map(|&x| factor * self.c.iter().enumerate().map(|(k, &ck)| ck * self.poisson(x, k)).sum::<f64>())
                    .collect();
                Xy::from_xy(xs, ys)
            }
            FunctionSpace::ReciprocalSpace => {
                let ys: Vec<f64> = (0..self.reference.len())
                    .map(|m| factor * self.c.iter().enumerate().map(|(k, &ck)| ck * self.poisson_ft(m, k)).sum::<f64>())
                    .collect();
                Xy::from_xy(self.reference.x().to_vec(), ys)
            }
        }
    }

    fn construct_reciprocal(
        &mut self,
        r_min: f64,
        r_max: f64,
        sigma_q: f64,
        sigma_r: f64,
        n_iterations: usize,
        initial_step_size: f64,
        smoothing: Option<usize>,
    ) -> Result<f64> {
        if self.reference.len() < 2 {
            return Err(Error::ShapeError {
                component: "PoissonFit",
                operation: "construct_reciprocal",
                detail: "reference needs at least two points".to_string(),
            });
        }
        self.set(FunctionSpace::ReciprocalSpace, r_max, self.c.clone(), sigma_q, sigma_r)?;
        let n = self.c.len();
        let start = if self.ignore_zeroth_term { 1 } else { 0 };
        let active: Vec<usize> = (start..n).filter(|&k| self.nominal_r(k) >= r_min).collect();

        let mut rng = Pcg64Mcg::seed_from_u64(0x9057_7310);
        let y_ref = self.reference.y().to_vec();
        let n_points = self.reference.len();

        // Precompute each active function's reciprocal-space values once.
        let basis: Vec<Vec<f64>> = active.iter().map(|&k| (0..n_points).map(|m| self.poisson_ft(m, k)).collect()).collect();

        let mut values: Vec<f64> = active.iter().map(|&k| self.c[k]).collect();
        let mut minimiser = MonteCarloMinimiser::new(|trial: &[f64]| {
            let mut sose = 0.0;
            for m in 0..n_points {
                let mut y = 0.0;
                for (slot, phi) in basis.iter().enumerate() {
                    y += trial[slot] * phi[m];
                }
                let dy = y_ref[m] - y;
                sose += dy * dy;
            }
            sose
        });
        minimiser.set_max_iterations(n_iterations).set_step_size(initial_step_size);
        if let Some(freq) = smoothing {
            minimiser.set_sampling_frequency(freq);
        }

        let mut smoother = smoothing.map(|width| {
            move |vals: &mut [f64]| {
                let copy = vals.to_vec();
                let half = width / 2;
                for (i, v) in vals.iter_mut().enumerate() {
                    let lo = i.saturating_sub(half);
                    let hi = (i + half).min(copy.len() - 1);
                    *v = copy[lo..=hi].iter().sum::<f64>() / (hi - lo + 1) as f64;
                }
            }
        });
        let sampling: Option<&mut dyn FnMut(&mut [f64])> =
            smoother.as_mut().map(|s| s as &mut dyn FnMut(&mut [f64]));
        minimiser.minimise(&mut values, &mut rng, sampling);

        for (slot, &k) in active.iter().enumerate() {
            self.c[k] = values[slot];
        }

        let q = self.reference.x();
        self.approximate = self.approximation(FunctionSpace::ReciprocalSpace, 1.0, q[0], 1.0, *q.last().unwrap(), 1.0);
        Ok(percent_error(&self.reference, &self.approximate))
    }

    fn sweep_fit_c(&mut self, space: FunctionSpace, x_min: f64, sample_size: usize, overlap: usize, n_loops: usize) -> f64 {
        let reference = self.reference.clone();
        let n = self.n.clone();
        let ln_n_plus_two_factorial = self.ln_n_plus_two_factorial.clone();
        let sqrt_one_plus_qsq_sigmasq = self.sqrt_one_plus_qsq_sigmasq.clone();
        let one_minus_qsq_sigmasq = self.one_minus_qsq_sigmasq.clone();
        let arctan_q_sigma = self.arctan_q_sigma.clone();
        let sigma_r = self.sigma_r;
        let sigma_q = self.sigma_q;
        let ignore_zeroth_term = self.ignore_zeroth_term;
        let nominal_r: Vec<f64> = (0..self.c.len()).map(|k| self.nominal_r(k)).collect();
        self.approximate = sweep_fit_c_generic(
            &reference,
            &mut self.c,
            |k, m| match space {
                FunctionSpace::RealSpace => poisson_value(reference.x()[m], n[k], sigma_r, ln_n_plus_two_factorial[k]),
                FunctionSpace::ReciprocalSpace => poisson_ft_value(
                    reference.x()[m],
                    n[k],
                    sigma_q,
                    sqrt_one_plus_qsq_sigmasq[m],
                    one_minus_qsq_sigmasq[m],
                    arctan_q_sigma[m],
                ),
            },
            ignore_zeroth_term,
            |k| nominal_r[k],
            x_min,
            sample_size,
            overlap,
            n_loops,
        );
        percent_error(&self.reference, &self.approximate)
    }

    fn set_ignore_zeroth_term(&mut self, ignore: bool) {
        self.ignore_zeroth_term = ignore;
    }

    fn ignore_zeroth_term(&self) -> bool {
        self.ignore_zeroth_term
    }

    fn coefficients(&self) -> &[f64] {
        &self.c
    }

    fn approximate_data(&self) -> &Xy {
        &self.approximate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn gaussian_set_rejects_empty_coefficients() {
        let reference = Xy::from_xy(vec![0.0, 1.0, 2.0], vec![0.0, 0.0, 0.0]);
        let mut fit = GaussianFit::new(reference);
        assert!(matches!(
            fit.set(FunctionSpace::RealSpace, 10.0, Vec::new(), 0.1, 0.3),
            Err(Error::ShapeError { .. })
        ));
    }

    #[test]
    fn gaussian_single_function_peaks_at_its_centre() {
        let q: Vec<f64> = (0..20).map(|i| i as f64 * 0.2).collect();
        let reference = Xy::from_xy(q, vec![0.0; 20]);
        let mut fit = GaussianFit::new(reference);
        fit.set(FunctionSpace::RealSpace, 10.0, vec![1.0], 0.1, 0.5).unwrap();
        let approx = fit.approximation(FunctionSpace::RealSpace, 1.0, 0.0, 0.1, 10.0, 1.0);
        let peak_idx = approx.y().iter().enumerate().max_by(|a, b| a.1.partial_cmp(b.1).unwrap()).unwrap().0;
        assert_approx_eq!(f64, approx.x()[peak_idx], fit.x_centres[0], epsilon = 0.2);
    }

    #[test]
    fn poisson_function_vanishes_at_origin_for_nonzero_index() {
        let q: Vec<f64> = (0..20).map(|i| i as f64 * 0.2).collect();
        let reference = Xy::from_xy(q, vec![0.0; 20]);
        let mut fit = PoissonFit::new(reference);
        fit.set(FunctionSpace::RealSpace, 10.0, vec![1.0, 1.0, 1.0], 0.1, 0.3).unwrap();
        assert_approx_eq!(f64, fit.poisson(0.0, 1), 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn construct_reciprocal_reduces_error_on_a_single_poisson_target() {
        let q: Vec<f64> = (1..40).map(|i| i as f64 * 0.1).collect();
        let sigma_r = 0.3;
        let n_funcs = 6;

        let mut truth = PoissonFit::new(Xy::from_xy(q.clone(), vec![0.0; q.len()]));
        truth.set(FunctionSpace::ReciprocalSpace, 3.0, vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0], 0.15, sigma_r).unwrap();
        let target = truth.approximation(FunctionSpace::ReciprocalSpace, 1.0, q[0], 1.0, *q.last().unwrap(), 1.0);

        let mut fit = PoissonFit::new(target.clone());
        fit.set(FunctionSpace::ReciprocalSpace, 3.0, vec![0.0; n_funcs], 0.15, sigma_r).unwrap();
        fit.set_ignore_zeroth_term(false);
        let error = fit.construct_reciprocal(0.0, 3.0, 0.15, sigma_r, 3000, 0.2, None).unwrap();

        assert!(error < 50.0, "fit error {error} too large");
    }
}
