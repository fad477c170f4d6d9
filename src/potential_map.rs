//! Dense symmetric matrix mapping `(typeI, typeJ)` to a [`PairPotential`],
//! used to dispatch energy/force queries from simulation-side atom
//! pairs without the caller needing to know the pair ordering.

use crate::error::{Error, Result};
use crate::potential::PairPotential;

/// `(typeI, typeJ) -> PairPotential` dispatch matrix.
pub struct PotentialMap {
    n_types: usize,
    potentials: Vec<PairPotential>,
    matrix: Vec<Option<usize>>,
    range: f64,
}

impl PotentialMap {
    /// Build the symmetric index matrix from `n_types` master atom
    /// types and the supplied `potentials`, each already tagged with
    /// the two type indices it applies to via `type_indices`.
    ///
    /// # Errors
    /// Returns [`Error::Unresolved`] if a potential names a type index
    /// `>= n_types`, or [`Error::ShapeError`] if a potential's `range`
    /// does not equal `range`.
    pub fn initialise(
        n_types: usize,
        potentials: Vec<PairPotential>,
        type_indices: &[(usize, usize)],
        range: f64,
    ) -> Result<Self> {
        if type_indices.len() != potentials.len() {
            return Err(Error::ShapeError {
                component: "PotentialMap",
                operation: "initialise",
                detail: format!(
                    "{} potentials but {} type-index pairs",
                    potentials.len(),
                    type_indices.len()
                ),
            });
        }

        let mut matrix = vec![None; n_types * n_types];
        for (slot, &(i, j)) in type_indices.iter().enumerate() {
            if i >= n_types || j >= n_types {
                return Err(Error::Unresolved {
                    component: "PotentialMap",
                    operation: "initialise",
                    name: format!("type index ({i}, {j})"),
                });
            }
            if (potentials[slot].range() - range).abs() > 1.0e-9 {
                return Err(Error::ShapeError {
                    component: "PotentialMap",
                    operation: "initialise",
                    detail: format!(
                        "potential {}-{} has range {}, map expects {range}",
                        potentials[slot].name_i(),
                        potentials[slot].name_j(),
                        potentials[slot].range()
                    ),
                });
            }
            matrix[i * n_types + j] = Some(slot);
            matrix[j * n_types + i] = Some(slot);
        }

        Ok(Self { n_types, potentials, matrix, range })
    }

    /// The common cutoff shared by every stored potential.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.range
    }

    fn lookup(&self, type_i: usize, type_j: usize) -> Result<&PairPotential> {
        self.matrix
            .get(type_i * self.n_types + type_j)
            .copied()
            .flatten()
            .map(|idx| &self.potentials[idx])
            .ok_or(Error::Unresolved {
                component: "PotentialMap",
                operation: "lookup",
                name: format!("type pair ({type_i}, {type_j})"),
            })
    }

    /// Energy between two atoms of the given master type indices,
    /// separated by `r`. Adds the analytic Coulomb term on top of the
    /// tabulated value when charges are carried on the atoms rather
    /// than folded into the potential.
    ///
    /// # Errors
    /// Returns [`Error::Unresolved`] if no potential covers the pair.
    pub fn energy(&self, type_i: usize, type_j: usize, charge_i: f64, charge_j: f64, r: f64) -> Result<f64> {
        assert!(r >= 0.0, "PotentialMap::energy: r must be non-negative");
        let pot = self.lookup(type_i, type_j)?;
        let mut e = pot.energy(r);
        if !pot.include_coulomb() {
            e += pot.analytic_coulomb_energy(charge_i * charge_j, r);
        }
        Ok(e)
    }

    /// Force between two atoms of the given master type indices,
    /// separated by `r`, with the same Coulomb dispatch rule as
    /// [`Self::energy`].
    ///
    /// # Errors
    /// Returns [`Error::Unresolved`] if no potential covers the pair.
    pub fn force(&self, type_i: usize, type_j: usize, charge_i: f64, charge_j: f64, r: f64) -> Result<f64> {
        assert!(r >= 0.0, "PotentialMap::force: r must be non-negative");
        let pot = self.lookup(type_i, type_j)?;
        let mut f = pot.force(r);
        if !pot.include_coulomb() {
            f += pot.analytic_coulomb_force(charge_i * charge_j, r);
        }
        Ok(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::{CoulombTruncation, LennardJones, ShortRangeFormEnum, ShortRangeTruncation};
    use float_cmp::assert_approx_eq;

    fn argon_potential() -> PairPotential {
        let mut pot = PairPotential::new(
            "Ar",
            "Ar",
            ShortRangeFormEnum::LennardJones(LennardJones { epsilon: 0.998, sigma: 3.4 }),
            0.0,
            0.0,
            ShortRangeTruncation::NoShortRange,
            CoulombTruncation::NoCoulomb,
        );
        pot.tabulate(12.0, 0.005, false).unwrap();
        pot
    }

    #[test]
    fn self_interaction_is_queryable_from_both_orderings() {
        let map = PotentialMap::initialise(1, vec![argon_potential()], &[(0, 0)], 12.0).unwrap();
        let e = map.energy(0, 0, 0.0, 0.0, 4.0).unwrap();
        assert_approx_eq!(f64, e, argon_potential().energy(4.0), epsilon = 1.0e-9);
    }

    #[test]
    fn unresolved_pair_is_reported() {
        let map = PotentialMap::initialise(2, vec![argon_potential()], &[(0, 0)], 12.0).unwrap();
        assert!(matches!(map.energy(0, 1, 0.0, 0.0, 4.0), Err(Error::Unresolved { .. })));
    }

    #[test]
    fn mismatched_range_is_rejected() {
        let result = PotentialMap::initialise(1, vec![argon_potential()], &[(0, 0)], 8.0);
        assert!(matches!(result, Err(Error::ShapeError { .. })));
    }
}
