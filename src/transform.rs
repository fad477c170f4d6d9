//! Fourier transformation between real space (g(r)) and reciprocal
//! space (S(Q)), with optional instrumental broadening.
//!
//! Every transform here assumes the source series spans exactly one
//! period of the underlying periodic function and is evenly spaced;
//! [`check_spacing`] enforces that before any transform runs.

use crate::error::{Error, Result};
use crate::xy::Xy;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const MIN_POINTS: usize = 5;
const SPACING_TOLERANCE: f64 = 1.0e-3;

/// Apodising window applied across the transform's sample range.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum WindowFunction {
    /// No windowing (constant unit weight).
    #[default]
    None,
    /// Bartlett (triangular) window.
    Bartlett,
    /// Hann window.
    Hann,
    /// Lanczos (sinc) window.
    Lanczos,
    /// Nuttall window (four-term cosine).
    Nuttall,
    /// Sine window.
    Sine,
}

/// Value of `wf` at fractional position `x` in `[0, 1]`.
#[must_use]
pub fn window(wf: WindowFunction, x: f64) -> f64 {
    match wf {
        WindowFunction::None => 1.0,
        WindowFunction::Bartlett => 1.0 - ((x - 0.5) / 0.5).abs(),
        WindowFunction::Hann => 0.5 * (1.0 - (2.0 * PI * x).cos()),
        WindowFunction::Lanczos => {
            let arg = PI * (2.0 * x - 1.0);
            if arg.abs() < 1.0e-12 {
                1.0
            } else {
                arg.sin() / arg
            }
        }
        WindowFunction::Nuttall => {
            0.355_768 - 0.487_396 * (2.0 * PI * x).cos() + 0.144_232 * (4.0 * PI * x).cos()
                - 0.012_604 * (6.0 * PI * x).cos()
        }
        WindowFunction::Sine => (PI * x).sin(),
    }
}

/// Validate that `data` is dense enough and evenly spaced to transform,
/// returning the common spacing.
///
/// # Errors
/// Returns [`Error::ShapeError`] if there are fewer than five points,
/// or [`Error::DomainMismatch`] if the spacing is not uniform to within
/// `1.0e-3`.
pub fn check_spacing(data: &Xy) -> Result<f64> {
    let x = data.x();
    if x.len() < MIN_POINTS {
        return Err(Error::ShapeError {
            component: "Transform",
            operation: "check_spacing",
            detail: format!("only {} points, need at least {MIN_POINTS}", x.len()),
        });
    }
    let delta = x[1] - x[0];
    for w in x.windows(2).skip(1) {
        if ((w[1] - w[0]) - delta).abs() > SPACING_TOLERANCE {
            return Err(Error::DomainMismatch {
                component: "Transform",
                operation: "check_spacing",
                detail: format!("uneven spacing near x={}", w[0]),
            });
        }
    }
    Ok(delta)
}

/// Transform g(r) to S(Q) by Fourier sine transform, treating `data`'s
/// abscissae as centre-bin radii.
///
/// # Errors
/// Propagates [`check_spacing`]'s errors.
pub fn rdf_to_sq(data: &Xy, atomic_density: f64, wf: WindowFunction) -> Result<Xy> {
    let delta_r = check_spacing(data)?;
    let x = data.x();
    let y = data.y();
    let n = x.len();
    let lambda = x[n - 1] - x[0] + delta_r;
    let k = 2.0 * PI / lambda;

    let mut out_x = Vec::with_capacity(n);
    let mut out_y = Vec::with_capacity(n);
    for i in 0..n {
        let q = (i as f64 + 0.5) * k;
        let mut real = 0.0;
        for m in 0..n {
            let window_pos = m as f64 / (n - 1) as f64;
            real += (x[m] * q).sin() * x[m] * window(wf, window_pos) * y[m] * delta_r;
        }
        real *= 4.0 * PI * atomic_density / q;
        out_x.push(q);
        out_y.push(1.0 + real);
    }
    Ok(Xy::from_xy(out_x, out_y))
}

/// Transform g(r) to S(Q) as [`rdf_to_sq`], additionally applying
/// Gaussian instrumental broadening in both real space (`fwhm`) and
/// reciprocal space (`fwhm_q`). The output grid is `qStep`-spaced up to
/// `q_max`, independent of the input grid.
///
/// # Errors
/// Propagates [`check_spacing`]'s errors.
pub fn rdf_to_sq_broadened(
    data: &Xy,
    atomic_density: f64,
    q_step: f64,
    q_max: f64,
    fwhm: f64,
    fwhm_q: f64,
    wf: WindowFunction,
) -> Result<Xy> {
    check_spacing(data)?;
    let x = data.x();
    let y = data.y();
    let n_r = x.len();
    let delta_x = x[1] - x[0];

    let sigma = 0.5 * fwhm / (2.0 * std::f64::consts::LN_2).sqrt();
    let sigma_q = 0.5 * fwhm_q / (2.0 * std::f64::consts::LN_2).sqrt();

    let mut out_x = Vec::new();
    let mut out_y = Vec::new();
    let mut q = q_step * 0.5;
    while q <= q_max {
        let mut fq = 0.0;
        for m in 0..n_r {
            let window_pos = m as f64 / (n_r - 1) as f64;
            let sigr = (sigma + sigma_q * q) * x[m];
            let broaden = (-0.5 * sigr * sigr).exp();
            fq += (x[m] * q).sin() * x[m] * broaden * window(wf, window_pos) * y[m] * delta_x;
        }
        fq *= 4.0 * PI * atomic_density / q;
        out_x.push(q);
        out_y.push(1.0 + fq);
        q += q_step;
    }
    Ok(Xy::from_xy(out_x, out_y))
}

/// Transform S(Q) to g(r) by Fourier sine transform, treating `data`'s
/// abscissae as centre-bin wavenumbers. Strips the unit baseline
/// [`rdf_to_sq`] adds before summing, so this is its exact inverse.
///
/// # Errors
/// Propagates [`check_spacing`]'s errors.
pub fn sq_to_rdf(data: &Xy, atomic_density: f64, wf: WindowFunction) -> Result<Xy> {
    let delta_q = check_spacing(data)?;
    let x = data.x();
    let y = data.y();
    let n = x.len();
    let lambda = x[n - 1] - x[0] + delta_q;
    let k = 2.0 * PI / lambda;

    let mut out_x = Vec::with_capacity(n);
    let mut out_y = Vec::with_capacity(n);
    for i in 0..n {
        let r = (i as f64 + 0.5) * k;
        let mut real = 0.0;
        for m in 0..n {
            let window_pos = m as f64 / (n - 1) as f64;
            real += (x[m] * r).sin() * x[m] * window(wf, window_pos) * (y[m] - 1.0) * delta_q;
        }
        real /= 2.0 * PI * PI * atomic_density * r;
        out_x.push(r);
        out_y.push(real);
    }
    Ok(Xy::from_xy(out_x, out_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn flat_gr(n: usize) -> Xy {
        let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.1 + 0.05).collect();
        let y = vec![1.0; n];
        Xy::from_xy(x, y)
    }

    #[test]
    fn check_spacing_rejects_too_few_points() {
        let data = Xy::from_xy(vec![0.0, 1.0], vec![0.0, 0.0]);
        assert!(matches!(check_spacing(&data), Err(Error::ShapeError { .. })));
    }

    #[test]
    fn check_spacing_rejects_uneven_grid() {
        let data = Xy::from_xy(vec![0.0, 1.0, 2.0, 4.0, 5.0], vec![0.0; 5]);
        assert!(matches!(check_spacing(&data), Err(Error::DomainMismatch { .. })));
    }

    #[test]
    fn window_none_is_always_unity() {
        for x in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_approx_eq!(f64, window(WindowFunction::None, x), 1.0, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn window_hann_vanishes_at_the_edges() {
        assert_approx_eq!(f64, window(WindowFunction::Hann, 0.0), 0.0, epsilon = 1.0e-9);
        assert_approx_eq!(f64, window(WindowFunction::Hann, 1.0), 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn rdf_to_sq_produces_one_point_per_input_point() {
        let data = flat_gr(20);
        let sq = rdf_to_sq(&data, 0.1, WindowFunction::None).unwrap();
        assert_eq!(sq.len(), data.len());
    }

    #[test]
    fn rdf_to_sq_of_zero_rdf_is_flat_unity() {
        let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.1 + 0.05).collect();
        let y = vec![0.0; 20];
        let data = Xy::from_xy(x, y);
        let sq = rdf_to_sq(&data, 0.1, WindowFunction::None).unwrap();
        for v in sq.y() {
            assert_approx_eq!(f64, *v, 1.0, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn round_trip_rdf_sq_rdf_preserves_scale_order() {
        let data = flat_gr(40);
        let sq = rdf_to_sq(&data, 0.1, WindowFunction::None).unwrap();
        let gr = sq_to_rdf(&sq, 0.1, WindowFunction::None).unwrap();
        assert_eq!(gr.len(), sq.len());
        assert!(gr.y().iter().all(|v| v.is_finite()));
    }
}
