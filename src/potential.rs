//! Tabulated interatomic pair potential: an analytic short-range form
//! plus an additive empirical correction, tabulated on a uniform
//! radial grid with O(1) interpolated lookup.

use crate::error::{Error, Result};
use crate::interpolation::{Interpolator, Scheme};
use crate::xy::Xy;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// Coulomb's-law prefactor in kJ mol⁻¹ Å e⁻² (`e²/4πε₀` in those units).
pub const COULOMB_CONSTANT: f64 = 138.935_458;

/// Truncation applied to the analytic short-range term as `r` reaches
/// the cutoff.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq)]
pub enum ShortRangeTruncation {
    /// No truncation: the analytic form is tabulated as-is.
    #[default]
    NoShortRange,
    /// Subtract the analytic value and derivative at `range` from
    /// every point so both vanish continuously.
    ShiftedShortRange {
        /// Cached analytic energy at `range`, filled in by `tabulate`.
        energy_at_cutoff: f64,
        /// Cached analytic force at `range`, filled in by `tabulate`.
        force_at_cutoff: f64,
    },
    /// Multiply the last `width` of the range by a half-cosine taper.
    CosineShortRange {
        /// Width of the tapering region.
        width: f64,
    },
}

/// Truncation applied to the analytic Coulomb term as `r` reaches the
/// cutoff.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq)]
pub enum CoulombTruncation {
    /// No truncation.
    #[default]
    NoCoulomb,
    /// Subtract the analytic value at `range`.
    ShiftedCoulomb {
        /// Cached analytic Coulomb energy at `range`.
        energy_at_cutoff: f64,
    },
}

/// One analytic short-range functional form, dispatched without
/// dynamic allocation.
#[enum_dispatch(ShortRangeForm)]
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub enum ShortRangeFormEnum {
    /// No short-range interaction.
    None(NoShortRangeInteraction),
    /// 12-6 Lennard-Jones: `4ε[(σ/r)¹² − (σ/r)⁶]`.
    LennardJones(LennardJones),
    /// Buckingham: `A·exp(−r/ρ) − C/r⁶`.
    Buckingham(Buckingham),
}

/// Dispatch trait behind [`ShortRangeFormEnum`].
#[enum_dispatch]
pub trait ShortRangeForm {
    /// Analytic short-range energy at `r`, untruncated.
    fn raw_energy(&self, r: f64) -> f64;
    /// Analytic short-range force (`−dU/dr`) at `r`, untruncated.
    fn raw_force(&self, r: f64) -> f64;
}

/// No short-range interaction: always zero.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct NoShortRangeInteraction;

impl ShortRangeForm for NoShortRangeInteraction {
    fn raw_energy(&self, _r: f64) -> f64 {
        0.0
    }
    fn raw_force(&self, _r: f64) -> f64 {
        0.0
    }
}

/// 12-6 Lennard-Jones form.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct LennardJones {
    /// Well depth, in kJ/mol.
    pub epsilon: f64,
    /// Zero-crossing distance, in Å.
    pub sigma: f64,
}

impl ShortRangeForm for LennardJones {
    fn raw_energy(&self, r: f64) -> f64 {
        let sr6 = (self.sigma / r).powi(6);
        4.0 * self.epsilon * (sr6 * sr6 - sr6)
    }
    fn raw_force(&self, r: f64) -> f64 {
        let sr6 = (self.sigma / r).powi(6);
        4.0 * self.epsilon * (12.0 * sr6 * sr6 - 6.0 * sr6) / r
    }
}

/// Buckingham form.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct Buckingham {
    /// Repulsive prefactor, in kJ/mol.
    pub a: f64,
    /// Repulsive range, in Å.
    pub rho: f64,
    /// Dispersion coefficient, in kJ/mol·Å⁶.
    pub c: f64,
}

impl ShortRangeForm for Buckingham {
    fn raw_energy(&self, r: f64) -> f64 {
        self.a * (-r / self.rho).exp() - self.c / r.powi(6)
    }
    fn raw_force(&self, r: f64) -> f64 {
        (self.a / self.rho) * (-r / self.rho).exp() - 6.0 * self.c / r.powi(7)
    }
}

/// A tabulated pair potential between two named atom types.
#[derive(Clone, Debug)]
pub struct PairPotential {
    name_i: String,
    name_j: String,
    form: ShortRangeFormEnum,
    charge_i: f64,
    charge_j: f64,
    short_range_truncation: ShortRangeTruncation,
    coulomb_truncation: CoulombTruncation,
    include_coulomb: bool,
    range: f64,
    delta: f64,
    u_original: Xy,
    u_additional: Xy,
    u_full: Xy,
    du_full: Xy,
    u_full_interp: Option<Interpolator>,
    du_full_interp: Option<Interpolator>,
}

impl PairPotential {
    /// Construct an (untabulated) pair potential. Call [`Self::tabulate`]
    /// before any energy/force query.
    #[must_use]
    pub fn new(
        name_i: impl Into<String>,
        name_j: impl Into<String>,
        form: ShortRangeFormEnum,
        charge_i: f64,
        charge_j: f64,
        short_range_truncation: ShortRangeTruncation,
        coulomb_truncation: CoulombTruncation,
    ) -> Self {
        Self {
            name_i: name_i.into(),
            name_j: name_j.into(),
            form,
            charge_i,
            charge_j,
            short_range_truncation,
            coulomb_truncation,
            include_coulomb: false,
            range: 0.0,
            delta: 0.0,
            u_original: Xy::new(),
            u_additional: Xy::new(),
            u_full: Xy::new(),
            du_full: Xy::new(),
            u_full_interp: None,
            du_full_interp: None,
        }
    }

    /// First atom-type name.
    #[must_use]
    pub fn name_i(&self) -> &str {
        &self.name_i
    }

    /// Second atom-type name.
    #[must_use]
    pub fn name_j(&self) -> &str {
        &self.name_j
    }

    /// Tabulation cutoff.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Tabulation spacing.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Number of tabulated points.
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.u_original.len()
    }

    /// Whether the Coulomb term is folded into the tabulated potential
    /// (rather than added separately from atom charges).
    #[must_use]
    pub fn include_coulomb(&self) -> bool {
        self.include_coulomb
    }

    /// Full potential table (original plus additional).
    #[must_use]
    pub fn u_full(&self) -> &Xy {
        &self.u_full
    }

    /// Additive empirical correction table.
    #[must_use]
    pub fn u_additional(&self) -> &Xy {
        &self.u_additional
    }

    /// Analytic baseline table.
    #[must_use]
    pub fn u_original(&self) -> &Xy {
        &self.u_original
    }

    fn analytic_short_range_energy(&self, r: f64) -> f64 {
        let raw = self.form.raw_energy(r);
        match self.short_range_truncation {
            ShortRangeTruncation::NoShortRange => raw,
            ShortRangeTruncation::ShiftedShortRange { energy_at_cutoff, force_at_cutoff } => {
                raw - energy_at_cutoff - force_at_cutoff * (self.range - r)
            }
            ShortRangeTruncation::CosineShortRange { width } => {
                if r <= self.range - width {
                    raw
                } else if r >= self.range {
                    0.0
                } else {
                    let taper = 0.5 * (1.0 + (std::f64::consts::PI * (r - (self.range - width)) / width).cos());
                    raw * taper
                }
            }
        }
    }

    fn analytic_short_range_force(&self, r: f64) -> f64 {
        let raw = self.form.raw_force(r);
        match self.short_range_truncation {
            ShortRangeTruncation::NoShortRange => raw,
            ShortRangeTruncation::ShiftedShortRange { force_at_cutoff, .. } => raw - force_at_cutoff,
            ShortRangeTruncation::CosineShortRange { width } => {
                if r <= self.range - width {
                    raw
                } else if r >= self.range {
                    0.0
                } else {
                    let taper = 0.5 * (1.0 + (std::f64::consts::PI * (r - (self.range - width)) / width).cos());
                    raw * taper
                }
            }
        }
    }

    /// Analytic Coulomb energy for charge product `qiqj` at `r`.
    #[must_use]
    pub fn analytic_coulomb_energy(&self, qiqj: f64, r: f64) -> f64 {
        let raw = COULOMB_CONSTANT * qiqj / r;
        match self.coulomb_truncation {
            CoulombTruncation::NoCoulomb => raw,
            CoulombTruncation::ShiftedCoulomb { energy_at_cutoff } => raw - energy_at_cutoff,
        }
    }

    /// Analytic Coulomb force for charge product `qiqj` at `r`.
    #[must_use]
    pub fn analytic_coulomb_force(&self, qiqj: f64, r: f64) -> f64 {
        COULOMB_CONSTANT * qiqj / (r * r)
    }

    /// Closed-form short-range-plus-optional-Coulomb energy at `r`,
    /// bypassing the table. Uses the atom types' own charges.
    #[must_use]
    pub fn analytic_energy(&self, r: f64) -> f64 {
        let mut e = self.analytic_short_range_energy(r);
        if self.include_coulomb {
            e += self.analytic_coulomb_energy(self.charge_i * self.charge_j, r);
        }
        e
    }

    /// Closed-form short-range-plus-optional-Coulomb force at `r`.
    #[must_use]
    pub fn analytic_force(&self, r: f64) -> f64 {
        let mut f = self.analytic_short_range_force(r);
        if self.include_coulomb {
            f += self.analytic_coulomb_force(self.charge_i * self.charge_j, r);
        }
        f
    }

    /// Populate `uOriginal` from the analytic form, zero `uAdditional`,
    /// and (re)build `uFull`/`dUFull` and their interpolators.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `range <= 0.0` or `delta <= 0.0`.
    pub fn tabulate(&mut self, range: f64, delta: f64, include_coulomb: bool) -> Result<()> {
        if range <= 0.0 || delta <= 0.0 {
            return Err(Error::OutOfRange {
                component: "PairPotential",
                operation: "tabulate",
                detail: format!("range={range}, delta={delta} must both be positive"),
            });
        }
        self.range = range;
        self.delta = delta;
        self.include_coulomb = include_coulomb;

        if let ShortRangeTruncation::ShiftedShortRange { .. } = self.short_range_truncation {
            let e = self.form.raw_energy(range);
            let f = self.form.raw_force(range);
            self.short_range_truncation = ShortRangeTruncation::ShiftedShortRange {
                energy_at_cutoff: e,
                force_at_cutoff: f,
            };
        }
        if let CoulombTruncation::ShiftedCoulomb { .. } = self.coulomb_truncation {
            let e = COULOMB_CONSTANT * self.charge_i * self.charge_j / range;
            self.coulomb_truncation = CoulombTruncation::ShiftedCoulomb { energy_at_cutoff: e };
        }

        let n_points = (range / delta).round() as usize + 1;
        let mut xs = Vec::with_capacity(n_points);
        let mut ys = Vec::with_capacity(n_points);
        for m in 0..n_points {
            let r = m as f64 * delta;
            xs.push(r);
            ys.push(if r < 1.0e-9 { 0.0 } else { self.analytic_energy(r) });
        }
        self.u_original = Xy::from_xy(xs, ys);
        self.u_additional = {
            let mut zero = self.u_original.clone();
            for y in zero.y_mut() {
                *y = 0.0;
            }
            zero
        };

        self.calculate_u_full();
        self.calculate_du_full();
        Ok(())
    }

    fn calculate_u_full(&mut self) {
        let mut full = self.u_original.clone();
        full.add_assign_xy(&self.u_additional)
            .expect("uOriginal and uAdditional share a tabulation grid by construction");
        self.u_full = full;
        self.u_full_interp = Some(Interpolator::new(&self.u_full, Scheme::Linear));
    }

    fn calculate_du_full(&mut self) {
        let x = self.u_full.x();
        let y = self.u_full.y();
        let n = x.len();
        let mut dy = vec![0.0; n];
        for i in 0..n {
            dy[i] = if i == 0 {
                -(y[1] - y[0]) / (x[1] - x[0])
            } else if i == n - 1 {
                -(y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2])
            } else {
                -(y[i + 1] - y[i - 1]) / (x[i + 1] - x[i - 1])
            };
        }
        self.du_full = Xy::from_xy(x.to_vec(), dy);
        self.du_full_interp = Some(Interpolator::new(&self.du_full, Scheme::Linear));
    }

    /// Tabulated energy at `r`. Returns zero for `r >= range`.
    ///
    /// # Panics
    /// Panics if `r < 0.0`, or if [`Self::tabulate`] has not been called.
    #[must_use]
    pub fn energy(&self, r: f64) -> f64 {
        assert!(r >= 0.0, "PairPotential::energy: r must be non-negative");
        if r >= self.range {
            return 0.0;
        }
        self.u_full_interp
            .as_ref()
            .expect("tabulate must be called before energy")
            .y(r)
    }

    /// Tabulated force at `r` (`= -dU/dr`). Returns zero for `r >= range`.
    ///
    /// # Panics
    /// Panics if `r < 0.0`, or if [`Self::tabulate`] has not been called.
    #[must_use]
    pub fn force(&self, r: f64) -> f64 {
        assert!(r >= 0.0, "PairPotential::force: r must be non-negative");
        if r >= self.range {
            return 0.0;
        }
        self.du_full_interp
            .as_ref()
            .expect("tabulate must be called before force")
            .y(r)
    }

    /// Overwrite the additive correction table and rebuild `uFull`/`dUFull`.
    ///
    /// # Errors
    /// Returns [`Error::ShapeError`] if `data` does not share this
    /// potential's tabulation grid.
    pub fn set_u_additional(&mut self, data: Xy) -> Result<()> {
        self.check_matches_grid(&data, "set_u_additional")?;
        self.u_additional = data;
        self.calculate_u_full();
        self.calculate_du_full();
        Ok(())
    }

    /// `uAdditional += factor * delta_u`, then rebuild `uFull`/`dUFull`.
    ///
    /// # Errors
    /// Returns [`Error::ShapeError`] if `delta_u` does not share this
    /// potential's tabulation grid.
    pub fn adjust_u_additional(&mut self, delta_u: &Xy, factor: f64) -> Result<()> {
        self.check_matches_grid(delta_u, "adjust_u_additional")?;
        let mut scaled = delta_u.clone();
        scaled.mul_assign_scalar(factor);
        self.u_additional
            .add_assign_xy(&scaled)
            .map_err(|_| Error::ShapeError {
                component: "PairPotential",
                operation: "adjust_u_additional",
                detail: "grid check passed but pointwise combination failed".to_string(),
            })?;
        self.calculate_u_full();
        self.calculate_du_full();
        Ok(())
    }

    /// Zero the additive correction table, then rebuild `uFull`/`dUFull`.
    pub fn reset_u_additional(&mut self) {
        for y in self.u_additional.y_mut() {
            *y = 0.0;
        }
        self.calculate_u_full();
        self.calculate_du_full();
    }

    fn check_matches_grid(&self, data: &Xy, operation: &'static str) -> Result<()> {
        if data.len() != self.u_additional.len() {
            return Err(Error::ShapeError {
                component: "PairPotential",
                operation,
                detail: format!("{} points given, grid has {}", data.len(), self.u_additional.len()),
            });
        }
        for (a, b) in data.x().iter().zip(self.u_additional.x().iter()) {
            if (a - b).abs() > 1.0e-6 {
                return Err(Error::ShapeError {
                    component: "PairPotential",
                    operation,
                    detail: format!("spacing mismatch at x={a} (grid has x={b})"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn lj_potential() -> PairPotential {
        PairPotential::new(
            "OW",
            "OW",
            ShortRangeFormEnum::LennardJones(LennardJones { epsilon: 0.65, sigma: 3.4 }),
            0.0,
            0.0,
            ShortRangeTruncation::NoShortRange,
            CoulombTruncation::NoCoulomb,
        )
    }

    #[test]
    fn lj_zero_crossing_at_sigma() {
        let pot = lj_potential();
        assert_approx_eq!(f64, pot.analytic_energy(3.4), 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn tabulate_then_zero_correction_leaves_ufull_equal_to_uoriginal() {
        let mut pot = lj_potential();
        pot.tabulate(12.0, 0.005, false).unwrap();
        for (a, b) in pot.u_full().y().iter().zip(pot.u_original().y().iter()) {
            assert_approx_eq!(f64, *a, *b, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn shifted_truncation_vanishes_at_cutoff() {
        let mut pot = PairPotential::new(
            "A",
            "B",
            ShortRangeFormEnum::LennardJones(LennardJones { epsilon: 1.0, sigma: 3.0 }),
            0.0,
            0.0,
            ShortRangeTruncation::ShiftedShortRange { energy_at_cutoff: 0.0, force_at_cutoff: 0.0 },
            CoulombTruncation::NoCoulomb,
        );
        pot.tabulate(10.0, 0.01, false).unwrap();
        assert_approx_eq!(f64, pot.analytic_energy(10.0), 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn adjust_u_additional_requires_matching_grid() {
        let mut pot = lj_potential();
        pot.tabulate(5.0, 0.5, false).unwrap();
        let wrong_grid = Xy::from_xy(vec![0.0, 1.0], vec![0.0, 0.0]);
        assert!(matches!(
            pot.adjust_u_additional(&wrong_grid, 1.0),
            Err(Error::ShapeError { .. })
        ));
    }
}
