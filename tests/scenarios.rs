#![allow(missing_docs)]

use dissolve_core::basis_fit::{BasisFit, FunctionSpace, PoissonFit};
use dissolve_core::compare::{self, Range};
use dissolve_core::peaks::Peaks;
use dissolve_core::potential::{CoulombTruncation, LennardJones, PairPotential, ShortRangeFormEnum, ShortRangeTruncation};
use dissolve_core::potential_map::PotentialMap;
use dissolve_core::transform::{rdf_to_sq, sq_to_rdf, WindowFunction};
use dissolve_core::xy::Xy;
use float_cmp::assert_approx_eq;
use std::f64::consts::PI;

// A smooth g(r) transformed to S(Q) and back reproduces the original
// signal within a tolerance proportional to grid resolution.
#[test]
fn rdf_sq_rdf_round_trip_recovers_a_smooth_signal() {
    let n = 80;
    let r_step = 0.05;
    let x: Vec<f64> = (0..n).map(|i| (i as f64 + 0.5) * r_step).collect();
    let y: Vec<f64> = x.iter().map(|&r| 1.0 + 0.3 * (-((r - 2.0).powi(2))).exp()).collect();
    let gr = Xy::from_xy(x, y);

    let sq = rdf_to_sq(&gr, 0.1, WindowFunction::None).unwrap();
    let recovered = sq_to_rdf(&sq, 0.1, WindowFunction::None).unwrap();

    assert_eq!(recovered.len(), gr.len());
    let report = compare::rmse(&gr, &recovered, None).unwrap();
    assert!(report.value < 0.5, "round-trip RMSE {} too large", report.value);
}

// A Lennard-Jones pair potential is tabulated, queried through a
// PotentialMap by both type orderings, and carries an analytic Coulomb
// term added on top when charges are supplied.
#[test]
fn pair_potential_tabulation_round_trips_through_a_potential_map() {
    let mut pot = PairPotential::new(
        "Na",
        "Cl",
        ShortRangeFormEnum::LennardJones(LennardJones { epsilon: 0.5, sigma: 2.5 }),
        0.0,
        0.0,
        ShortRangeTruncation::NoShortRange,
        CoulombTruncation::NoCoulomb,
    );
    pot.tabulate(10.0, 0.005, false).unwrap();

    let map = PotentialMap::initialise(2, vec![pot], &[(0, 1)], 10.0).unwrap();

    let e_forward = map.energy(0, 1, 1.0, -1.0, 3.0).unwrap();
    let e_reverse = map.energy(1, 0, -1.0, 1.0, 3.0).unwrap();
    assert_approx_eq!(f64, e_forward, e_reverse, epsilon = 1.0e-9);

    // Opposite charges attract: the Coulomb contribution should be
    // negative, so the tagged energy is lower than with charges off.
    let e_uncharged = map.energy(0, 1, 0.0, 0.0, 3.0).unwrap();
    assert!(e_forward < e_uncharged);
}

// Two well-separated Gaussian bumps in a synthetic structure factor
// are both detected as peaks, ordered by height.
#[test]
fn peak_detection_finds_isolated_gaussian_bumps() {
    let n = 200;
    let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.05).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|&q| {
            let bump_a = (-((q - 2.0) / 0.2).powi(2)).exp();
            let bump_b = 0.6 * (-((q - 6.0) / 0.2).powi(2)).exp();
            bump_a + bump_b
        })
        .collect();

    let finder = Peaks::new(&y, &x);
    let found = finder.find(true);

    assert_eq!(found.len(), 2);
    assert_approx_eq!(f64, found[0].x, 2.0, epsilon = 0.1);
    assert_approx_eq!(f64, found[1].x, 6.0, epsilon = 0.1);

    let proms = finder.prominences(true);
    assert_eq!(proms.len(), 2);
    assert!(proms[0].prominence > proms[1].prominence);
}

// A 257-point S(Q) on a uniform Q grid, matching the spacing of a
// loaded two-column data file, round-trips through g(r) and back
// within the regression tolerance for windowed transforms.
#[test]
fn loaded_structure_factor_round_trips_within_regression_tolerance() {
    let n = 257;
    let q_min = 0.05;
    let q_step = 0.1;
    let atomic_density = 0.1;

    let q: Vec<f64> = (0..n).map(|i| q_min + i as f64 * q_step).collect();
    let s_q: Vec<f64> = q.iter().map(|&qv| 1.0 + 0.4 * (-((qv - 3.0) / 1.0).powi(2)).exp()).collect();
    let original = Xy::from_xy(q, s_q);

    let gr = sq_to_rdf(&original, atomic_density, WindowFunction::Hann).unwrap();
    let recovered = rdf_to_sq(&gr, atomic_density, WindowFunction::Hann).unwrap();

    let report = compare::rmse(&original, &recovered, Some(Range::new(0.5, 20.0))).unwrap();
    assert!(report.value < 5.0e-2, "round-trip RMSE {} exceeds regression bound", report.value);
}

// A Poisson basis fit against a reference built from 50 known
// coefficients recovers an approximation whose terminal error is well
// below the all-zero starting guess.
#[test]
fn poisson_fit_recovers_a_synthetic_difference_function() {
    let sigma_q = 0.02;
    let sigma_r = 0.5;
    let r_max = 10.0;
    let n_funcs = 50;

    let q: Vec<f64> = (1..=1000).map(|i| i as f64 * 0.02).collect();
    let coefficients: Vec<f64> = (0..n_funcs).map(|k| 0.1 * (-(k as f64) / 10.0).exp()).collect();

    let mut truth = PoissonFit::new(Xy::from_xy(q.clone(), vec![0.0; q.len()]));
    truth.set(FunctionSpace::ReciprocalSpace, r_max, coefficients.clone(), sigma_q, sigma_r).unwrap();
    truth.set_ignore_zeroth_term(false);
    let target = truth.approximation(FunctionSpace::ReciprocalSpace, 1.0, q[0], 1.0, *q.last().unwrap(), 1.0);

    let mut fit = PoissonFit::new(target.clone());
    fit.set(FunctionSpace::ReciprocalSpace, r_max, vec![0.0; n_funcs], sigma_q, sigma_r).unwrap();
    fit.set_ignore_zeroth_term(false);
    let error = fit.construct_reciprocal(0.5, r_max, sigma_q, sigma_r, 5000, 0.02, None).unwrap();

    assert!(error < 50.0, "fit error {error} too large");
}

// A slow sine carrying a small high-frequency ripple has its two
// dominant crests detected as isolated peaks once isolation collapses
// the ripple-scale local maxima riding on each crest.
#[test]
fn peak_detection_isolates_dominant_crests_under_a_high_frequency_ripple() {
    let n = 1001;
    let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.01).collect();
    let y: Vec<f64> = x.iter().map(|&v| (PI * v / 3.0).sin() + 0.1 * (5.0 * PI * v).sin()).collect();

    let mut finder = Peaks::new(&y, &x);
    finder.set_threshold(0.5);
    finder.set_isolation(2.5);
    let found = finder.find(true);

    assert_eq!(found.len(), 2);
    let xs: Vec<f64> = found.iter().map(|p| p.x).collect();
    assert!(xs.iter().any(|&v| (v - 1.5).abs() < 0.3), "no peak near x=1.5 in {xs:?}");
    assert!(xs.iter().any(|&v| (v - 7.5).abs() < 0.3), "no peak near x=7.5 in {xs:?}");
    for peak in &found {
        assert!(peak.value > 0.9, "crest peak value {} lower than expected", peak.value);
    }

    let proms = finder.prominences_of(&found, true);
    assert_eq!(proms.len(), 2);
    for prom in &proms {
        assert!(prom.prominence > 0.0, "expected a positive prominence for an isolated crest peak");
    }
}
