//! # Strategy
//!
//! The `Strategy` trait defines the interface for the per-iteration update
//! rules of a population-based metaheuristic. The [`Algorithm`] driver owns
//! the lifecycle (initialization, the termination-bounded loop, global best
//! tracking) and delegates one unit of search progress per cycle to the
//! strategy, so further strategies can be added without modifying the
//! driving loop.
//!
//! [`Algorithm`]: crate::algorithm::Algorithm

pub mod bacterial_foraging;
pub mod particle_swarm;

use std::fmt::Debug;

use crate::{
    candidate::{BestTracker, Encoding},
    error::{OptimizationError, Result},
    evaluator::Evaluator,
    population::Population,
    rng::RandomNumberGenerator,
};

/// A per-iteration update rule for a population-based search.
///
/// Implementors choose their own member encoding via the associated
/// [`Member`](Strategy::Member) type, read and write the population, consult
/// the evaluator for every new position, and report every fresh evaluation to
/// the [`BestTracker`].
pub trait Strategy: Debug {
    /// The member encoding this strategy operates on.
    type Member: Encoding;

    /// A human-readable name for the strategy.
    fn name(&self) -> &str;

    /// The fixed population size this strategy is configured for.
    fn population_size(&self) -> usize;

    /// Performs one unit of search progress.
    ///
    /// The population has exactly [`population_size`](Strategy::population_size)
    /// members on entry and must have exactly that many on return. Every
    /// member mutated by the strategy must be re-evaluated before the call
    /// returns, and every fresh evaluation must be passed to
    /// [`BestTracker::observe`].
    ///
    /// ## Errors
    ///
    /// Evaluator faults (non-finite costs) propagate out of this method
    /// uncaught: a failed evaluation invalidates the whole iteration, so the
    /// engine fails fast and lets the caller decide whether to retry the run.
    fn single_iteration(
        &mut self,
        population: &mut Population<Self::Member>,
        tracker: &mut BestTracker,
        evaluator: &dyn Evaluator,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()>;

    /// The number of tunable hyperparameters this strategy exposes for
    /// meta-optimization.
    fn num_free_parameters(&self) -> usize;

    /// The strategy's hyperparameters as a flat vector, for an outer tuning
    /// loop that treats them as a search space of their own.
    fn free_parameters(&self) -> Vec<f64>;

    /// Replaces the strategy's hyperparameters from a flat vector.
    ///
    /// Not every strategy supports this; the default implementation reports
    /// [`OptimizationError::Unsupported`].
    fn set_free_parameters(&mut self, parameters: &[f64]) -> Result<()> {
        let _ = parameters;
        Err(OptimizationError::Unsupported(format!(
            "{} does not support free parameter mutation",
            self.name()
        )))
    }
}

pub use bacterial_foraging::{BacterialForaging, Bacterium, BfoConfig, BfoConfigBuilder};
pub use particle_swarm::{Particle, ParticleSwarm, PsoConfig, PsoConfigBuilder};
