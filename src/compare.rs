//! Error metrics between two [`Xy`] signals: one, `reference`, is
//! interpolated onto the abscissa of the other, `test`, and the
//! pointwise differences are accumulated according to the chosen
//! metric. Every accumulator shares the same windowing rule so that
//! splitting a domain into disjoint ranges and summing the per-range
//! reports reproduces the whole-domain report.

use crate::error::{Error, Result};
use crate::interpolation::Interpolator;
use crate::xy::Xy;

/// Result of a single error-metric evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErrorReport {
    /// The metric's value.
    pub value: f64,
    /// First abscissa actually considered.
    pub first_x: f64,
    /// Last abscissa actually considered.
    pub last_x: f64,
    /// Number of points accumulated.
    pub n_points: usize,
}

/// A closed `[min, max]` window restricting which points of `test` are
/// compared. `None` compares the full overlap of `test`'s abscissa
/// with `reference`'s.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Range {
    /// Lower bound, inclusive.
    pub min: f64,
    /// Upper bound, inclusive.
    pub max: f64,
}

impl Range {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

struct Accumulated {
    first_x: f64,
    last_x: f64,
    n_points: usize,
}

/// Walk `test`'s points that fall inside `range` (when given) and
/// inside `reference`'s own abscissa, interpolating `reference` at
/// each, and feed `(x, y_test, y_ref)` to `step`. `step` returns
/// whether the point should count towards `first_x`/`last_x`/`n_points`
/// (a metric may still want to skip a point within the window, e.g.
/// MAPE excluding a zero test value).
fn accumulate(test: &Xy, reference: &Xy, range: Option<Range>, mut step: impl FnMut(f64, f64, f64) -> bool) -> Result<Accumulated> {
    if reference.is_empty() {
        return Err(Error::ShapeError {
            component: "compare",
            operation: "accumulate",
            detail: "reference signal has no points".to_string(),
        });
    }

    let ref_min = reference.x()[0];
    let ref_max = *reference.x().last().expect("reference is non-empty");
    let interpolated = Interpolator::new(reference, crate::interpolation::Scheme::Linear);

    let mut first_x = 0.0;
    let mut last_x = 0.0;
    let mut n_points = 0usize;

    for (&x, &y) in test.x().iter().zip(test.y().iter()) {
        if let Some(r) = range {
            if x < r.min || x > r.max {
                continue;
            }
        }
        if x < ref_min || x > ref_max {
            continue;
        }

        if !step(x, y, interpolated.y(x)) {
            continue;
        }

        if n_points == 0 {
            first_x = x;
        }
        last_x = x;
        n_points += 1;
    }

    if n_points == 0 {
        return Err(Error::OutOfRange {
            component: "compare",
            operation: "accumulate",
            detail: "no points of test signal overlap reference within range".to_string(),
        });
    }

    Ok(Accumulated { first_x, last_x, n_points })
}

/// Root-mean-squared error.
pub fn rmse(test: &Xy, reference: &Xy, range: Option<Range>) -> Result<ErrorReport> {
    let mut sum = 0.0;
    let acc = accumulate(test, reference, range, |_, y, y_ref| {
        let delta = y - y_ref;
        sum += delta * delta;
        true
    })?;
    Ok(ErrorReport {
        value: (sum / acc.n_points as f64).sqrt(),
        first_x: acc.first_x,
        last_x: acc.last_x,
        n_points: acc.n_points,
    })
}

/// Mean absolute percentage error, skipping points where the test
/// value is zero.
pub fn mape(test: &Xy, reference: &Xy, range: Option<Range>) -> Result<ErrorReport> {
    let mut sum = 0.0;
    let acc = accumulate(test, reference, range, |_, y, y_ref| {
        if y == 0.0 {
            return false;
        }
        sum += ((y - y_ref) / y).abs();
        true
    })?;
    Ok(ErrorReport {
        value: 100.0 * sum / acc.n_points as f64,
        first_x: acc.first_x,
        last_x: acc.last_x,
        n_points: acc.n_points,
    })
}

/// Mean arctangent absolute percentage error: like [`mape`] but passed
/// through `atan`, bounding the contribution of points where the test
/// value is close to zero instead of skipping them.
pub fn maape(test: &Xy, reference: &Xy, range: Option<Range>) -> Result<ErrorReport> {
    let mut sum = 0.0;
    let acc = accumulate(test, reference, range, |_, y, y_ref| {
        let ratio = if y == 0.0 { (y - y_ref).abs() } else { ((y - y_ref) / y).abs() };
        sum += ratio.atan();
        true
    })?;
    Ok(ErrorReport {
        value: 100.0 * sum / acc.n_points as f64,
        first_x: acc.first_x,
        last_x: acc.last_x,
        n_points: acc.n_points,
    })
}

/// Percentage error: summed absolute deviation normalised to summed
/// absolute test value. Falls back to the un-normalised absolute sum
/// if the test values sum to zero.
pub fn percent(test: &Xy, reference: &Xy, range: Option<Range>) -> Result<ErrorReport> {
    let mut sum_error = 0.0;
    let mut sum_y = 0.0;
    let acc = accumulate(test, reference, range, |_, y, y_ref| {
        sum_error += (y - y_ref).abs();
        sum_y += y.abs();
        true
    })?;
    let value = if sum_y == 0.0 { sum_error } else { 100.0 * sum_error / sum_y };
    Ok(ErrorReport {
        value,
        first_x: acc.first_x,
        last_x: acc.last_x,
        n_points: acc.n_points,
    })
}

/// Average squared error per point.
///
/// # Errors
/// Returns [`Error::NumericFailure`] if fewer than one point qualifies
/// (cannot happen given [`accumulate`]'s own `OutOfRange` guard, kept
/// as a defensive second check since the failure mode is named
/// separately from the general out-of-range case).
pub fn r_factor(test: &Xy, reference: &Xy, range: Option<Range>) -> Result<ErrorReport> {
    let mut sum = 0.0;
    let acc = accumulate(test, reference, range, |_, y, y_ref| {
        let delta = y - y_ref;
        sum += delta * delta;
        true
    })?;
    if acc.n_points == 0 {
        return Err(Error::NumericFailure {
            component: "compare",
            operation: "rFactor",
            detail: "fewer than one qualifying point".to_string(),
        });
    }
    Ok(ErrorReport {
        value: sum / acc.n_points as f64,
        first_x: acc.first_x,
        last_x: acc.last_x,
        n_points: acc.n_points,
    })
}

/// Euclidean distance between the two signals, normalised to the root
/// of the summed squared test values.
pub fn euclidean(test: &Xy, reference: &Xy, range: Option<Range>) -> Result<ErrorReport> {
    let mut sos = 0.0;
    let mut y2 = 0.0;
    let acc = accumulate(test, reference, range, |_, y, y_ref| {
        let delta = y - y_ref;
        sos += delta * delta;
        y2 += y * y;
        true
    })?;
    if y2 == 0.0 {
        return Err(Error::NumericFailure {
            component: "compare",
            operation: "euclidean",
            detail: "summed squared test values are zero".to_string(),
        });
    }
    Ok(ErrorReport {
        value: sos / y2.sqrt(),
        first_x: acc.first_x,
        last_x: acc.last_x,
        n_points: acc.n_points,
    })
}

/// Absolute squared error: the summed squared deviation with no
/// averaging or normalisation, for callers that want the raw
/// magnitude rather than a per-point or percentage figure.
pub fn ase(test: &Xy, reference: &Xy, range: Option<Range>) -> Result<ErrorReport> {
    let mut sum = 0.0;
    let acc = accumulate(test, reference, range, |_, y, y_ref| {
        let delta = y - y_ref;
        sum += delta * delta;
        true
    })?;
    Ok(ErrorReport {
        value: sum,
        first_x: acc.first_x,
        last_x: acc.last_x,
        n_points: acc.n_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn line(n: usize, slope: f64) -> Xy {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| slope * v).collect();
        Xy::from_xy(x, y)
    }

    #[test]
    fn rmse_between_identical_signals_is_zero() {
        let a = line(10, 1.0);
        let b = line(10, 1.0);
        let report = rmse(&a, &b, None).unwrap();
        assert_approx_eq!(f64, report.value, 0.0, epsilon = 1.0e-12);
        assert_eq!(report.n_points, 10);
    }

    #[test]
    fn rmse_of_constant_offset_matches_closed_form() {
        let a = line(5, 1.0);
        let mut b = line(5, 1.0);
        for y in b.y_mut() {
            *y -= 2.0;
        }
        let report = rmse(&a, &b, None).unwrap();
        assert_approx_eq!(f64, report.value, 2.0, epsilon = 1.0e-9);
    }

    #[test]
    fn mape_skips_zero_test_values() {
        let a = Xy::from_xy(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 4.0]);
        let b = Xy::from_xy(vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 5.0]);
        let report = mape(&a, &b, None).unwrap();
        // point at x=0 skipped (y==0); only the remaining two count.
        assert_eq!(report.n_points, 2);
        assert!(report.value > 0.0);
    }

    #[test]
    fn error_additivity_holds_for_rmse_squared() {
        let a = line(20, 1.3);
        let mut b = line(20, 1.3);
        for (i, y) in b.y_mut().iter_mut().enumerate() {
            *y += 0.1 * (i as f64).sin();
        }

        let whole = rmse(&a, &b, None).unwrap();
        let whole_sum_sq = whole.value * whole.value * whole.n_points as f64;

        let lower = rmse(&a, &b, Some(Range::new(0.0, 9.0))).unwrap();
        let upper = rmse(&a, &b, Some(Range::new(10.0, 19.0))).unwrap();
        let split_sum_sq = lower.value * lower.value * lower.n_points as f64 + upper.value * upper.value * upper.n_points as f64;

        assert_approx_eq!(f64, whole_sum_sq, split_sum_sq, epsilon = 1.0e-9);
        assert_eq!(whole.n_points, lower.n_points + upper.n_points);
    }

    #[test]
    fn error_additivity_holds_for_ase() {
        let a = line(20, 1.0);
        let mut b = line(20, 1.0);
        for (i, y) in b.y_mut().iter_mut().enumerate() {
            *y += 0.05 * (i as f64 + 1.0);
        }

        let whole = ase(&a, &b, None).unwrap();
        let lower = ase(&a, &b, Some(Range::new(0.0, 9.0))).unwrap();
        let upper = ase(&a, &b, Some(Range::new(10.0, 19.0))).unwrap();

        assert_approx_eq!(f64, whole.value, lower.value + upper.value, epsilon = 1.0e-9);
        assert_eq!(whole.n_points, lower.n_points + upper.n_points);
    }

    #[test]
    fn r_factor_matches_rmse_squared() {
        let a = line(8, 2.0);
        let mut b = line(8, 2.0);
        for y in b.y_mut() {
            *y += 1.0;
        }
        let rmse_report = rmse(&a, &b, None).unwrap();
        let rfac_report = r_factor(&a, &b, None).unwrap();
        assert_approx_eq!(f64, rmse_report.value * rmse_report.value, rfac_report.value, epsilon = 1.0e-9);
    }

    #[test]
    fn euclidean_rejects_all_zero_test_signal() {
        let a = Xy::from_xy(vec![0.0, 1.0], vec![0.0, 0.0]);
        let b = Xy::from_xy(vec![0.0, 1.0], vec![1.0, 1.0]);
        assert!(matches!(euclidean(&a, &b, None), Err(Error::NumericFailure { .. })));
    }

    #[test]
    fn empty_reference_is_a_shape_error() {
        let a = line(3, 1.0);
        let empty = Xy::new();
        assert!(matches!(rmse(&a, &empty, None), Err(Error::ShapeError { .. })));
    }

    #[test]
    fn out_of_range_window_is_reported() {
        let a = line(5, 1.0);
        let b = line(5, 1.0);
        assert!(matches!(rmse(&a, &b, Some(Range::new(100.0, 200.0))), Err(Error::OutOfRange { .. })));
    }
}
