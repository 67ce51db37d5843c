//! # Algorithm Lifecycle
//!
//! The `Algorithm` struct is the polymorphic driver of a run: it owns one
//! population, one evaluator, and one strategy, and walks the lifecycle
//! `Uninitialized → Initialized → Running → Stopped`. Each cycle of the
//! termination-bounded loop delegates one unit of search progress to the
//! strategy and returns a defensive copy of the best candidate ever seen, so
//! callers can never mutate engine-internal state through a result.
//!
//! ## Example
//!
//! ```rust
//! use swarmopt::algorithm::{Algorithm, StopCondition};
//! use swarmopt::rng::RandomNumberGenerator;
//! use swarmopt::strategy::{BacterialForaging, BfoConfig};
//!
//! let sphere = |variables: &[f64]| variables.iter().map(|x| x * x).sum::<f64>();
//! let strategy = BacterialForaging::new(BfoConfig::builder().size(10).build()).unwrap();
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let mut algorithm = Algorithm::new(strategy, 3, sphere).unwrap();
//! algorithm.init(&mut rng).unwrap();
//!
//! let best = algorithm.run(&StopCondition::Iterations(5), &mut rng).unwrap();
//! assert!(best.cost().is_finite());
//! ```

use std::time::{Duration, Instant};

use tracing::debug;

use crate::{
    candidate::{BestTracker, Candidate, Encoding},
    error::{OptimizationError, Result},
    evaluator::Evaluator,
    population::Population,
    rng::RandomNumberGenerator,
    strategy::Strategy,
};

/// The lifecycle state of an [`Algorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed, but no population exists yet.
    Uninitialized,
    /// A population has been built and the initial best selected.
    Initialized,
    /// Inside [`Algorithm::run`].
    Running,
    /// A run has completed; further iterations are still permitted.
    Stopped,
}

/// When the driving loop of [`Algorithm::run`] terminates.
///
/// The condition is checked before every iteration, so a bound that is
/// already met performs no work and returns the best seen so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopCondition {
    /// Stop after this many iterations.
    Iterations(usize),
    /// Stop once the global best cost is strictly below this threshold.
    CostBelow(f64),
    /// Stop once this much wall-clock time has elapsed.
    TimeLimit(Duration),
}

impl StopCondition {
    fn is_met(&self, iterations: usize, best_cost: f64, started: Instant) -> bool {
        match *self {
            StopCondition::Iterations(limit) => iterations >= limit,
            StopCondition::CostBelow(threshold) => best_cost < threshold,
            StopCondition::TimeLimit(budget) => started.elapsed() >= budget,
        }
    }
}

/// Drives one optimization run: owns the population, tracks the global best,
/// and delegates per-iteration progress to the strategy.
#[derive(Debug)]
pub struct Algorithm<S: Strategy, V: Evaluator> {
    strategy: S,
    evaluator: V,
    dimension: usize,
    population: Option<Population<S::Member>>,
    tracker: BestTracker,
    state: State,
}

impl<S: Strategy, V: Evaluator> Algorithm<S, V> {
    /// Creates a new driver for the given strategy, search dimension, and
    /// evaluator.
    ///
    /// ## Errors
    ///
    /// Returns [`OptimizationError::Configuration`] if the dimension is zero
    /// or the strategy is configured with an empty population.
    pub fn new(strategy: S, dimension: usize, evaluator: V) -> Result<Self> {
        if dimension == 0 {
            return Err(OptimizationError::Configuration(
                "Search dimension cannot be zero".to_string(),
            ));
        }
        if strategy.population_size() == 0 {
            return Err(OptimizationError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        Ok(Self {
            strategy,
            evaluator,
            dimension,
            population: None,
            tracker: BestTracker::new(),
            state: State::Uninitialized,
        })
    }

    /// Builds a random population and selects the initial global best.
    ///
    /// Re-initializing discards any previous population and best.
    pub fn init(&mut self, rng: &mut RandomNumberGenerator) -> Result<()> {
        let population = Population::random(
            self.strategy.population_size(),
            self.dimension,
            &self.evaluator,
            rng,
        )?;
        self.install(population)
    }

    /// Builds a population from the given seed vectors, filling remaining
    /// slots randomly, and selects the initial global best.
    pub fn init_seeded(
        &mut self,
        seeds: &[Vec<f64>],
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        let population = Population::seeded(
            seeds,
            self.strategy.population_size(),
            self.dimension,
            &self.evaluator,
            rng,
        )?;
        self.install(population)
    }

    fn install(&mut self, mut population: Population<S::Member>) -> Result<()> {
        population.sort_by_cost();
        let champion = population.members()[0].candidate().clone();
        self.tracker = BestTracker::new();
        self.tracker.seed(champion);
        self.population = Some(population);
        self.state = State::Initialized;
        debug!(
            strategy = self.strategy.name(),
            dimension = self.dimension,
            "algorithm initialized"
        );
        Ok(())
    }

    /// Performs one unit of search progress and returns a defensive copy of
    /// the best candidate seen so far.
    ///
    /// ## Errors
    ///
    /// Returns [`OptimizationError::NotInitialized`] if called before
    /// [`init`](Algorithm::init) or [`init_seeded`](Algorithm::init_seeded);
    /// evaluator faults propagate uncaught.
    pub fn single_iteration(&mut self, rng: &mut RandomNumberGenerator) -> Result<Candidate> {
        let population = self
            .population
            .as_mut()
            .ok_or(OptimizationError::NotInitialized)?;
        self.strategy
            .single_iteration(population, &mut self.tracker, &self.evaluator, rng)?;
        debug_assert_eq!(population.len(), self.strategy.population_size());
        self.tracker.snapshot()
    }

    /// Repeatedly invokes [`single_iteration`](Algorithm::single_iteration)
    /// until the stop condition is met and returns the final global best.
    pub fn run(
        &mut self,
        stop: &StopCondition,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Candidate> {
        if self.population.is_none() {
            return Err(OptimizationError::NotInitialized);
        }
        self.state = State::Running;
        let started = Instant::now();
        let mut iterations = 0_usize;
        let mut best = self.tracker.snapshot()?;

        while !stop.is_met(iterations, best.cost(), started) {
            best = self.single_iteration(rng)?;
            iterations += 1;
            debug!(
                strategy = self.strategy.name(),
                iterations,
                best_cost = best.cost(),
                "iteration complete"
            );
        }

        self.state = State::Stopped;
        Ok(best)
    }

    /// Returns a defensive copy of the best candidate seen so far.
    pub fn best(&self) -> Result<Candidate> {
        self.tracker.snapshot()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the search dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the current population, if initialized.
    pub fn population(&self) -> Option<&Population<S::Member>> {
        self.population.as_ref()
    }

    /// Returns the strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The number of hyperparameters the strategy exposes for
    /// meta-optimization.
    pub fn num_free_parameters(&self) -> usize {
        self.strategy.num_free_parameters()
    }

    /// The strategy's hyperparameters as a flat vector.
    pub fn free_parameters(&self) -> Vec<f64> {
        self.strategy.free_parameters()
    }

    /// Replaces the strategy's hyperparameters from a flat vector, if the
    /// strategy supports it.
    pub fn set_free_parameters(&mut self, parameters: &[f64]) -> Result<()> {
        self.strategy.set_free_parameters(parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A deliberately simple strategy for exercising the driver: every
    /// iteration relocates the worst member to a random position.
    #[derive(Debug)]
    struct RandomRestart {
        size: usize,
    }

    impl Strategy for RandomRestart {
        type Member = Candidate;

        fn name(&self) -> &str {
            "Random Restart"
        }

        fn population_size(&self) -> usize {
            self.size
        }

        fn single_iteration(
            &mut self,
            population: &mut Population<Candidate>,
            tracker: &mut BestTracker,
            evaluator: &dyn Evaluator,
            rng: &mut RandomNumberGenerator,
        ) -> Result<()> {
            population.sort_by_cost();
            let worst = population.len() - 1;
            let member = &mut population.members_mut()[worst];
            member.randomize(rng, evaluator)?;
            tracker.observe(member.candidate());
            Ok(())
        }

        fn num_free_parameters(&self) -> usize {
            0
        }

        fn free_parameters(&self) -> Vec<f64> {
            Vec::new()
        }
    }

    fn sum_evaluator() -> impl Evaluator {
        |variables: &[f64]| variables.iter().sum::<f64>()
    }

    #[test]
    fn test_iteration_before_init_is_a_usage_fault() {
        let mut rng = RandomNumberGenerator::from_seed(31);
        let mut algorithm =
            Algorithm::new(RandomRestart { size: 4 }, 2, sum_evaluator()).unwrap();

        assert_eq!(algorithm.state(), State::Uninitialized);
        assert!(matches!(
            algorithm.single_iteration(&mut rng),
            Err(OptimizationError::NotInitialized)
        ));
        assert!(matches!(
            algorithm.run(&StopCondition::Iterations(1), &mut rng),
            Err(OptimizationError::NotInitialized)
        ));
        assert!(matches!(
            algorithm.best(),
            Err(OptimizationError::NotInitialized)
        ));
    }

    #[test]
    fn test_lifecycle_states() {
        let mut rng = RandomNumberGenerator::from_seed(32);
        let mut algorithm =
            Algorithm::new(RandomRestart { size: 4 }, 2, sum_evaluator()).unwrap();

        algorithm.init(&mut rng).unwrap();
        assert_eq!(algorithm.state(), State::Initialized);

        algorithm
            .run(&StopCondition::Iterations(3), &mut rng)
            .unwrap();
        assert_eq!(algorithm.state(), State::Stopped);
    }

    #[test]
    fn test_global_best_never_regresses() {
        let mut rng = RandomNumberGenerator::from_seed(33);
        let mut algorithm =
            Algorithm::new(RandomRestart { size: 6 }, 3, sum_evaluator()).unwrap();
        algorithm.init(&mut rng).unwrap();

        let mut previous = algorithm.best().unwrap().cost();
        for _ in 0..25 {
            let best = algorithm.single_iteration(&mut rng).unwrap();
            assert!(best.cost() <= previous);
            previous = best.cost();
        }
    }

    #[test]
    fn test_init_selects_population_champion() {
        let mut rng = RandomNumberGenerator::from_seed(34);
        let mut algorithm =
            Algorithm::new(RandomRestart { size: 8 }, 2, sum_evaluator()).unwrap();
        algorithm.init(&mut rng).unwrap();

        let best = algorithm.best().unwrap();
        for member in algorithm.population().unwrap().iter() {
            assert!(best.cost() <= member.cost());
        }
    }

    #[test]
    fn test_zero_iteration_run_returns_initial_best() {
        let mut rng = RandomNumberGenerator::from_seed(35);
        let mut algorithm =
            Algorithm::new(RandomRestart { size: 4 }, 2, sum_evaluator()).unwrap();
        algorithm.init(&mut rng).unwrap();

        let initial = algorithm.best().unwrap();
        let returned = algorithm
            .run(&StopCondition::Iterations(0), &mut rng)
            .unwrap();
        assert_eq!(returned, initial);
    }

    #[test]
    fn test_invalid_construction_is_rejected() {
        assert!(Algorithm::new(RandomRestart { size: 4 }, 0, sum_evaluator()).is_err());
        assert!(Algorithm::new(RandomRestart { size: 0 }, 2, sum_evaluator()).is_err());
    }

    #[test]
    fn test_returned_best_is_a_defensive_copy() {
        let mut rng = RandomNumberGenerator::from_seed(36);
        let mut algorithm =
            Algorithm::new(RandomRestart { size: 4 }, 2, sum_evaluator()).unwrap();
        algorithm.init(&mut rng).unwrap();

        let mut snapshot = algorithm.best().unwrap();
        snapshot.variables[0] = 123.0;
        snapshot.cost = -123.0;

        assert_ne!(algorithm.best().unwrap().cost(), -123.0);
    }

    #[test]
    fn test_free_parameter_reflection_delegates() {
        let algorithm =
            Algorithm::new(RandomRestart { size: 4 }, 2, sum_evaluator()).unwrap();
        assert_eq!(algorithm.num_free_parameters(), 0);
        assert!(algorithm.free_parameters().is_empty());

        let mut algorithm = algorithm;
        assert!(matches!(
            algorithm.set_free_parameters(&[1.0]),
            Err(OptimizationError::Unsupported(_))
        ));
    }
}
