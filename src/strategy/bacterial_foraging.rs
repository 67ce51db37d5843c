//! # Bacterial Foraging Optimization
//!
//! A chemotaxis-based search strategy modeled on the foraging behavior of
//! E. coli colonies. Each bacterium tumbles into a random direction, moves a
//! step scaled by the configured swim length, and keeps swimming along the
//! same direction while its cost strictly improves. After every chemotactic
//! pass the healthiest half of the colony reproduces over the worst half,
//! and each iteration ends by dispersing bacteria to random positions with a
//! fixed probability to escape local minima.
//!
//! ## Example
//!
//! ```rust
//! use swarmopt::algorithm::Algorithm;
//! use swarmopt::rng::RandomNumberGenerator;
//! use swarmopt::strategy::{BacterialForaging, BfoConfig};
//!
//! let sphere = |variables: &[f64]| variables.iter().map(|x| x * x).sum::<f64>();
//! let config = BfoConfig::builder().size(10).build();
//! let strategy = BacterialForaging::new(config).unwrap();
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let mut algorithm = Algorithm::new(strategy, 3, sphere).unwrap();
//! algorithm.init(&mut rng).unwrap();
//!
//! let best = algorithm.single_iteration(&mut rng).unwrap();
//! assert!(best.cost().is_finite());
//! ```

use crate::{
    candidate::{clamp_unit, BestTracker, Candidate, Encoding},
    error::{OptimizationError, Result},
    evaluator::Evaluator,
    population::Population,
    rng::RandomNumberGenerator,
    strategy::Strategy,
};

/// Configuration for [`BacterialForaging`].
///
/// ## Fields
///
/// - `size`: number of bacteria in the colony (default 20).
/// - `nc`: chemotactic steps per reproduction cycle (default 8).
/// - `ns`: maximum number of times a bacterium swims in the same direction
///   (default 3).
/// - `nre`: reproduction-elimination cycles per iteration (default 3).
/// - `ped`: probability of a bacterium being dispersed (default 0.25).
/// - `ci`: basic swim length for each bacterium (default 0.05).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BfoConfig {
    pub size: usize,
    pub nc: usize,
    pub ns: usize,
    pub nre: usize,
    pub ped: f64,
    pub ci: f64,
}

impl Default for BfoConfig {
    fn default() -> Self {
        Self {
            size: 20,
            nc: 8,
            ns: 3,
            nre: 3,
            ped: 0.25,
            ci: 0.05,
        }
    }
}

impl BfoConfig {
    /// Returns a builder for creating a `BfoConfig` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swarmopt::strategy::BfoConfig;
    ///
    /// let config = BfoConfig::builder()
    ///     .size(30)
    ///     .nc(10)
    ///     .ped(0.1)
    ///     .build();
    /// assert_eq!(config.size, 30);
    /// ```
    pub fn builder() -> BfoConfigBuilder {
        BfoConfigBuilder::default()
    }
}

/// Builder for [`BfoConfig`].
///
/// Provides a fluent interface for constructing `BfoConfig` instances;
/// unset parameters fall back to the documented defaults.
#[derive(Debug, Clone, Default)]
pub struct BfoConfigBuilder {
    size: Option<usize>,
    nc: Option<usize>,
    ns: Option<usize>,
    nre: Option<usize>,
    ped: Option<f64>,
    ci: Option<f64>,
}

impl BfoConfigBuilder {
    /// Sets the colony size.
    pub fn size(mut self, value: usize) -> Self {
        self.size = Some(value);
        self
    }

    /// Sets the number of chemotactic steps per reproduction cycle.
    pub fn nc(mut self, value: usize) -> Self {
        self.nc = Some(value);
        self
    }

    /// Sets the maximum swim length.
    pub fn ns(mut self, value: usize) -> Self {
        self.ns = Some(value);
        self
    }

    /// Sets the number of reproduction-elimination cycles.
    pub fn nre(mut self, value: usize) -> Self {
        self.nre = Some(value);
        self
    }

    /// Sets the dispersal probability.
    pub fn ped(mut self, value: f64) -> Self {
        self.ped = Some(value);
        self
    }

    /// Sets the basic swim length.
    pub fn ci(mut self, value: f64) -> Self {
        self.ci = Some(value);
        self
    }

    /// Builds the `BfoConfig` instance.
    pub fn build(self) -> BfoConfig {
        let defaults = BfoConfig::default();
        BfoConfig {
            size: self.size.unwrap_or(defaults.size),
            nc: self.nc.unwrap_or(defaults.nc),
            ns: self.ns.unwrap_or(defaults.ns),
            nre: self.nre.unwrap_or(defaults.nre),
            ped: self.ped.unwrap_or(defaults.ped),
            ci: self.ci.unwrap_or(defaults.ci),
        }
    }
}

/// A candidate extended with the state a bacterium carries through its
/// chemotactic lifespan.
///
/// `health` accumulates the costs seen during one chemotactic step and is
/// the comparison currency for reproduction ranking: lower health means a
/// fitter lineage. `prev_cost` holds the cost before the most recent move and
/// drives the swim-while-improving decision.
#[derive(Debug, Clone)]
pub struct Bacterium {
    pub(crate) candidate: Candidate,
    pub(crate) prev_cost: f64,
    pub(crate) health: f64,
}

impl Bacterium {
    /// Returns the accumulated health of the current chemotactic step.
    pub fn health(&self) -> f64 {
        self.health
    }

    /// Returns the cost before the most recent move.
    pub fn prev_cost(&self) -> f64 {
        self.prev_cost
    }

    /// Moves one step of length `ci / |tumble|²` along the tumble direction,
    /// clamping each coordinate to `[0, 1]`, and re-evaluates.
    fn step_along(
        &mut self,
        tumble: &[f64],
        norm_sq: f64,
        ci: f64,
        evaluator: &dyn Evaluator,
    ) -> Result<()> {
        self.prev_cost = self.candidate.cost();
        for (value, direction) in self.candidate.variables.iter_mut().zip(tumble) {
            *value = clamp_unit(*value + ci * direction / norm_sq);
        }
        self.candidate.reevaluate(evaluator)?;
        Ok(())
    }
}

impl Encoding for Bacterium {
    fn from_candidate(candidate: Candidate, _rng: &mut RandomNumberGenerator) -> Self {
        Self {
            prev_cost: candidate.cost(),
            health: 0.0,
            candidate,
        }
    }

    fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    fn candidate_mut(&mut self) -> &mut Candidate {
        &mut self.candidate
    }
}

/// The Bacterial Foraging Optimization strategy.
#[derive(Debug, Clone)]
pub struct BacterialForaging {
    config: BfoConfig,
}

impl BacterialForaging {
    /// Creates the strategy from a validated configuration.
    ///
    /// ## Errors
    ///
    /// Returns [`OptimizationError::Configuration`] if the colony is too
    /// small to reproduce, any loop count is zero, the dispersal probability
    /// is outside `[0, 1]`, or the swim length is not a positive finite
    /// number.
    pub fn new(config: BfoConfig) -> Result<Self> {
        if config.size < 2 {
            return Err(OptimizationError::Configuration(format!(
                "Colony size must be at least 2, got {}",
                config.size
            )));
        }
        if config.nc == 0 || config.nre == 0 {
            return Err(OptimizationError::Configuration(
                "Chemotactic and reproduction loop counts must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&config.ped) {
            return Err(OptimizationError::Configuration(format!(
                "Dispersal probability must be within [0, 1], got {}",
                config.ped
            )));
        }
        if !config.ci.is_finite() || config.ci <= 0.0 {
            return Err(OptimizationError::Configuration(format!(
                "Swim length must be a positive finite number, got {}",
                config.ci
            )));
        }
        Ok(Self { config })
    }

    /// Returns the strategy's configuration.
    pub fn config(&self) -> &BfoConfig {
        &self.config
    }
}

impl Default for BacterialForaging {
    fn default() -> Self {
        Self {
            config: BfoConfig::default(),
        }
    }
}

impl Strategy for BacterialForaging {
    type Member = Bacterium;

    fn name(&self) -> &str {
        "Bacterial Foraging Optimization"
    }

    fn population_size(&self) -> usize {
        self.config.size
    }

    fn single_iteration(
        &mut self,
        population: &mut Population<Bacterium>,
        tracker: &mut BestTracker,
        evaluator: &dyn Evaluator,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        let size = population.len();
        let dimension = population.dimension();
        let BfoConfig {
            nc, ns, nre, ped, ci, ..
        } = self.config;

        for _ in 0..nre {
            for _ in 0..nc {
                // Health only accumulates within one chemotactic step
                for bacterium in population.iter_mut() {
                    bacterium.health = 0.0;
                }

                for i in 0..size {
                    let (tumble, norm_sq) = draw_tumble(dimension, rng);
                    let bacterium = &mut population.members_mut()[i];

                    bacterium.step_along(&tumble, norm_sq, ci, evaluator)?;
                    let cost = bacterium.cost();
                    bacterium.health += cost;
                    tracker.observe(bacterium.candidate());

                    // Keep swimming along the same direction while the cost
                    // strictly improves, up to the swim cap
                    let mut swims = 0;
                    while swims < ns && bacterium.cost() < bacterium.prev_cost {
                        swims += 1;
                        bacterium.step_along(&tumble, norm_sq, ci, evaluator)?;
                        tracker.observe(bacterium.candidate());
                    }
                }
            }

            reproduce(population)?;
        }

        for i in 0..size {
            if rng.gen_range(0.0..1.0) < ped {
                let bacterium = &mut population.members_mut()[i];
                bacterium.candidate_mut().randomize(rng, evaluator)?;
                bacterium.prev_cost = bacterium.cost();
                bacterium.health = 0.0;
                tracker.observe(bacterium.candidate());
            }
        }

        Ok(())
    }

    fn num_free_parameters(&self) -> usize {
        6
    }

    fn free_parameters(&self) -> Vec<f64> {
        let BfoConfig {
            size,
            nc,
            ns,
            nre,
            ped,
            ci,
        } = self.config;
        vec![size as f64, nc as f64, nre as f64, ns as f64, ped, ci]
    }
}

/// Draws a tumble direction with each component uniform in `[-1, 1)`,
/// redrawing until the squared norm is nonzero so the step length
/// `ci / |tumble|²` stays defined.
fn draw_tumble(dimension: usize, rng: &mut RandomNumberGenerator) -> (Vec<f64>, f64) {
    loop {
        let tumble: Vec<f64> = rng.fetch_uniform(-1.0, 1.0, dimension).into_iter().collect();
        let norm_sq: f64 = tumble.iter().map(|value| value * value).sum();
        if norm_sq > 0.0 {
            return (tumble, norm_sq);
        }
    }
}

/// Duplicates the healthiest half of the colony over the worst half.
///
/// After a stable ascending sort by health, the member at index `i` in the
/// best half overwrites the member at `i + size / 2`. Diversity is halved by
/// construction: this is duplication, not recombination.
fn reproduce(population: &mut Population<Bacterium>) -> Result<()> {
    population.sort_by_key_f64(|bacterium| bacterium.health);
    let half = population.len() / 2;
    for left in 0..half {
        let survivor = population.members()[left].clone();
        population.replace(left + half, survivor)?;
    }
    Ok(())
}
