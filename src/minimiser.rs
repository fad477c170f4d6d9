//! Cooperative Monte-Carlo minimiser: a pure hill-descent search (no
//! Metropolis rejection) with a step size that adapts towards a target
//! acceptance ratio.

use rand::Rng;

/// Default ratio of accepted to attempted trial steps the step size
/// adapts towards.
pub const DEFAULT_TARGET_ACCEPTANCE_RATIO: f64 = 0.33;

/// Monte-Carlo minimiser over a cost function `C: FnMut(&[f64]) -> f64`.
///
/// Unlike the minimiser's ancestor, which pokes trial values into
/// pointers supplied up front, this minimiser operates directly on the
/// caller's parameter slice: `minimise` takes `&mut [f64]` and leaves
/// the best values found in place.
pub struct MonteCarloMinimiser<C>
where
    C: FnMut(&[f64]) -> f64,
{
    cost: C,
    max_iterations: usize,
    step_size: f64,
    target_acceptance_ratio: f64,
    sampling_frequency: usize,
}

impl<C> MonteCarloMinimiser<C>
where
    C: FnMut(&[f64]) -> f64,
{
    /// Build a minimiser over `cost`, with conservative defaults
    /// (1000 iterations, step size 0.1).
    pub fn new(cost: C) -> Self {
        Self {
            cost,
            max_iterations: 1000,
            step_size: 0.1,
            target_acceptance_ratio: DEFAULT_TARGET_ACCEPTANCE_RATIO,
            sampling_frequency: 0,
        }
    }

    /// Set the number of trial iterations to run.
    pub fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the initial per-parameter trial step size.
    pub fn set_step_size(&mut self, step_size: f64) -> &mut Self {
        self.step_size = step_size;
        self
    }

    /// Current step size (mutated in place during [`Self::minimise`]).
    #[must_use]
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Set the acceptance ratio the step size adapts towards.
    pub fn set_target_acceptance_ratio(&mut self, ratio: f64) -> &mut Self {
        self.target_acceptance_ratio = ratio;
        self
    }

    /// Call `sampling` on the current best values every `frequency`
    /// iterations (0 disables sampling entirely).
    pub fn set_sampling_frequency(&mut self, frequency: usize) -> &mut Self {
        self.sampling_frequency = frequency;
        self
    }

    /// Minimise the cost function over `values` in place, drawing trial
    /// perturbations from `rng`. `sampling`, if given, is called on the
    /// current best values every `sampling_frequency` iterations,
    /// typically to apply a smoothing pass between batches. Returns the
    /// final cost.
    pub fn minimise(
        &mut self,
        values: &mut [f64],
        rng: &mut impl Rng,
        mut sampling: Option<&mut dyn FnMut(&mut [f64])>,
    ) -> f64 {
        if values.is_empty() {
            return 0.0;
        }

        let mut current_error = (self.cost)(values);
        let mut trial = values.to_vec();
        let mut n_accepted = 0usize;

        for iter in 0..self.max_iterations {
            for (t, v) in trial.iter_mut().zip(values.iter()) {
                *t = v + rng.gen_range(-1.0..1.0) * self.step_size;
            }

            let trial_error = (self.cost)(&trial);
            if trial_error < current_error {
                values.copy_from_slice(&trial);
                current_error = trial_error;
                n_accepted += 1;
            }

            let acceptance_rate = n_accepted as f64 / (iter + 1) as f64;
            self.step_size *= if n_accepted == 0 {
                0.8
            } else {
                acceptance_rate / self.target_acceptance_ratio
            };

            if self.sampling_frequency > 0 && (iter + 1) % self.sampling_frequency == 0 {
                if let Some(sample) = sampling.as_deref_mut() {
                    sample(values);
                }
            }
        }

        current_error
    }
}
