//! # Particle Swarm Optimization
//!
//! A swarm strategy built on the particle encoding: each member carries a
//! velocity and an owned snapshot of the best position it has individually
//! visited. One iteration applies the velocity/position recurrence to every
//! particle, pulling it towards its personal best and the swarm's global
//! best, re-evaluates, and updates both bests on strict improvement.
//!
//! Each stochastic term of the recurrence samples its own fresh uniform
//! scalar per dimension, so the cognitive and social pulls fluctuate
//! independently.
//!
//! ## Example
//!
//! ```rust
//! use swarmopt::algorithm::Algorithm;
//! use swarmopt::rng::RandomNumberGenerator;
//! use swarmopt::strategy::{ParticleSwarm, PsoConfig};
//!
//! let sphere = |variables: &[f64]| variables.iter().map(|x| x * x).sum::<f64>();
//! let strategy = ParticleSwarm::new(PsoConfig::default()).unwrap();
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

/// Velocities are clamped to `[-VELOCITY_CLAMP, VELOCITY_CLAMP]` on every
/// update, keeping single-step displacement a fraction of the unit interval.
pub const VELOCITY_CLAMP: f64 = 0.1;

/// Configuration for [`ParticleSwarm`].
///
/// ## Fields
///
/// - `size`: number of particles in the swarm (default 30).
/// - `omega`: inertia weight on the previous velocity (default 0.729).
/// - `c1`: cognitive weight pulling towards the particle's own best
///   (default 1.49445).
/// - `c2`: social weight pulling towards the swarm's global best
///   (default 1.49445).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoConfig {
    pub size: usize,
    pub omega: f64,
    pub c1: f64,
    pub c2: f64,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            size: 30,
            omega: 0.729,
            c1: 1.49445,
            c2: 1.49445,
        }
    }
}

impl PsoConfig {
    /// Returns a builder for creating a `PsoConfig` instance.
    pub fn builder() -> PsoConfigBuilder {
        PsoConfigBuilder::default()
    }
}

/// Builder for [`PsoConfig`].
#[derive(Debug, Clone, Default)]
pub struct PsoConfigBuilder {
    size: Option<usize>,
    omega: Option<f64>,
    c1: Option<f64>,
    c2: Option<f64>,
}

impl PsoConfigBuilder {
    /// Sets the swarm size.
    pub fn size(mut self, value: usize) -> Self {
        self.size = Some(value);
        self
    }

    /// Sets the inertia weight.
    pub fn omega(mut self, value: f64) -> Self {
        self.omega = Some(value);
        self
    }

    /// Sets the cognitive weight.
    pub fn c1(mut self, value: f64) -> Self {
        self.c1 = Some(value);
        self
    }

    /// Sets the social weight.
    pub fn c2(mut self, value: f64) -> Self {
        self.c2 = Some(value);
        self
    }

    /// Builds the `PsoConfig` instance.
    pub fn build(self) -> PsoConfig {
        let defaults = PsoConfig::default();
        PsoConfig {
            size: self.size.unwrap_or(defaults.size),
            omega: self.omega.unwrap_or(defaults.omega),
            c1: self.c1.unwrap_or(defaults.c1),
            c2: self.c2.unwrap_or(defaults.c2),
        }
    }
}

/// A candidate extended with a velocity and an owned snapshot of the best
/// position this particle has individually visited.
///
/// The local best invariant: `local_best.cost()` never exceeds any cost this
/// particle has observed since the snapshot was last taken.
#[derive(Debug, Clone)]
pub struct Particle {
    pub(crate) candidate: Candidate,
    pub(crate) velocity: Vec<f64>,
    pub(crate) local_best: Candidate,
}

impl Particle {
    /// Returns the particle's velocity vector.
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Returns the best position this particle has individually visited.
    pub fn local_best(&self) -> &Candidate {
        &self.local_best
    }

    /// Applies the velocity/position recurrence in place.
    ///
    /// The caller must re-evaluate the candidate afterwards; the coordinates
    /// change here but the cost does not.
    fn displace(
        &mut self,
        config: &PsoConfig,
        global_best: &[f64],
        rng: &mut RandomNumberGenerator,
    ) {
        for i in 0..self.candidate.variables.len() {
            let r1 = rng.gen_range(0.0..1.0);
            let r2 = rng.gen_range(0.0..1.0);
            let (velocity, position) = recurrence(
                config.omega,
                config.c1,
                config.c2,
                self.velocity[i],
                self.candidate.variables[i],
                self.local_best.variables[i],
                global_best[i],
                r1,
                r2,
            );
            self.velocity[i] = velocity;
            self.candidate.variables[i] = position;
        }
    }
}

impl Encoding for Particle {
    fn from_candidate(candidate: Candidate, rng: &mut RandomNumberGenerator) -> Self {
        // Initial velocities are uniform in [-1, 1); the first update clamps
        // them into the velocity range
        let velocity = rng
            .fetch_uniform(-1.0, 1.0, candidate.dimension())
            .into_iter()
            .collect();
        Self {
            local_best: candidate.clone(),
            velocity,
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

/// One dimension of the particle recurrence.
///
/// `velocity' = omega * velocity + r1 * c1 * (local - position)
///            + r2 * c2 * (global - position)`, clamped to the velocity
/// range; the new position is `position + velocity'` clamped to `[0, 1]`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn recurrence(
    omega: f64,
    c1: f64,
    c2: f64,
    velocity: f64,
    position: f64,
    local_best: f64,
    global_best: f64,
    r1: f64,
    r2: f64,
) -> (f64, f64) {
    let velocity = (omega * velocity
        + r1 * c1 * (local_best - position)
        + r2 * c2 * (global_best - position))
        .clamp(-VELOCITY_CLAMP, VELOCITY_CLAMP);
    let position = clamp_unit(position + velocity);
    (velocity, position)
}

/// The Particle Swarm Optimization strategy.
#[derive(Debug, Clone)]
pub struct ParticleSwarm {
    config: PsoConfig,
}

impl ParticleSwarm {
    /// Creates the strategy from a validated configuration.
    ///
    /// ## Errors
    ///
    /// Returns [`OptimizationError::Configuration`] if the swarm is empty or
    /// any weight is not a finite non-negative number.
    pub fn new(config: PsoConfig) -> Result<Self> {
        if config.size == 0 {
            return Err(OptimizationError::Configuration(
                "Swarm size cannot be zero".to_string(),
            ));
        }
        validate_weights(config.omega, config.c1, config.c2)?;
        Ok(Self { config })
    }

    /// Returns the strategy's configuration.
    pub fn config(&self) -> &PsoConfig {
        &self.config
    }
}

impl Default for ParticleSwarm {
    fn default() -> Self {
        Self {
            config: PsoConfig::default(),
        }
    }
}

fn validate_weights(omega: f64, c1: f64, c2: f64) -> Result<()> {
    for (name, value) in [("omega", omega), ("c1", c1), ("c2", c2)] {
        if !value.is_finite() || value < 0.0 {
            return Err(OptimizationError::Configuration(format!(
                "Weight {} must be a finite non-negative number, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

impl Strategy for ParticleSwarm {
    type Member = Particle;

    fn name(&self) -> &str {
        "Particle Swarm Optimization"
    }

    fn population_size(&self) -> usize {
        self.config.size
    }

    fn single_iteration(
        &mut self,
        population: &mut Population<Particle>,
        tracker: &mut BestTracker,
        evaluator: &dyn Evaluator,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        for i in 0..population.len() {
            // Fetch the freshest global best so particles later in the pass
            // are pulled towards improvements found earlier in it
            let global_best = tracker.snapshot()?;
            let particle = &mut population.members_mut()[i];

            particle.displace(&self.config, global_best.variables(), rng);
            particle.candidate.reevaluate(evaluator)?;

            if particle.candidate.cost() < particle.local_best.cost() {
                particle.local_best = particle.candidate.clone();
            }
            tracker.observe(&particle.candidate);
        }

        Ok(())
    }

    fn num_free_parameters(&self) -> usize {
        3
    }

    fn free_parameters(&self) -> Vec<f64> {
        vec![self.config.omega, self.config.c1, self.config.c2]
    }

    fn set_free_parameters(&mut self, parameters: &[f64]) -> Result<()> {
        if parameters.len() != 3 {
            return Err(OptimizationError::Configuration(format!(
                "Expected 3 free parameters (omega, c1, c2), got {}",
                parameters.len()
            )));
        }
        validate_weights(parameters[0], parameters[1], parameters[2])?;
        self.config.omega = parameters[0];
        self.config.c1 = parameters[1];
        self.config.c2 = parameters[2];
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_evaluator() -> impl Evaluator {
        |variables: &[f64]| variables.iter().sum::<f64>()
    }

    #[test]
    fn test_recurrence_with_fixed_randoms() {
        // With r1 = r2 = 0.5 the raw velocity is
        // 0.5 * 0.0 + 0.5 * 1.0 * (0.5 - 0.5) + 0.5 * 1.0 * (0.8 - 0.5) = 0.15,
        // clamped to 0.1, giving position 0.6
        let (velocity, position) = recurrence(0.5, 1.0, 1.0, 0.0, 0.5, 0.5, 0.8, 0.5, 0.5);
        assert_eq!(velocity, VELOCITY_CLAMP);
        assert_eq!(position, 0.6);
    }

    #[test]
    fn test_recurrence_clamps_both_ends() {
        let (velocity, position) = recurrence(0.5, 1.0, 1.0, 0.0, 0.9, 0.9, 0.0, 0.5, 0.5);
        assert_eq!(velocity, -VELOCITY_CLAMP);
        assert_eq!(position, 0.8);

        // Position clamps at the unit interval edge
        let (velocity, position) = recurrence(1.0, 1.0, 1.0, 0.1, 0.95, 0.95, 0.95, 0.5, 0.5);
        assert_eq!(velocity, VELOCITY_CLAMP);
        assert_eq!(position, 1.0);
    }

    #[test]
    fn test_particle_starts_at_its_own_local_best() {
        let evaluator = sum_evaluator();
        let mut rng = RandomNumberGenerator::from_seed(11);
        let candidate = Candidate::from_vector(vec![0.2, 0.4], &evaluator).unwrap();
        let particle = Particle::from_candidate(candidate.clone(), &mut rng);

        assert_eq!(particle.local_best(), &candidate);
        assert_eq!(particle.velocity().len(), 2);
        for &value in particle.velocity() {
            assert!((-1.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_single_iteration_invariants() {
        let evaluator = sum_evaluator();
        let mut rng = RandomNumberGenerator::from_seed(21);
        let mut strategy =
            ParticleSwarm::new(PsoConfig::builder().size(8).build()).unwrap();
        let mut population: Population<Particle> =
            Population::random(8, 3, &evaluator, &mut rng).unwrap();
        let mut tracker = BestTracker::new();
        tracker.seed(population.best().unwrap().candidate().clone());

        strategy
            .single_iteration(&mut population, &mut tracker, &evaluator, &mut rng)
            .unwrap();

        assert_eq!(population.len(), 8);
        for particle in population.iter() {
            for &value in particle.candidate().variables() {
                assert!((0.0..=1.0).contains(&value));
            }
            for &value in particle.velocity() {
                assert!((-VELOCITY_CLAMP..=VELOCITY_CLAMP).contains(&value));
            }
            // Local best never exceeds the current cost
            assert!(particle.local_best().cost() <= particle.cost());
            let expected: f64 = particle.candidate().variables().iter().sum();
            assert_eq!(particle.cost(), expected);
        }
    }

    #[test]
    fn test_free_parameters_roundtrip() {
        let mut strategy = ParticleSwarm::default();
        assert_eq!(strategy.num_free_parameters(), 3);

        strategy.set_free_parameters(&[0.5, 1.0, 2.0]).unwrap();
        assert_eq!(strategy.free_parameters(), vec![0.5, 1.0, 2.0]);

        assert!(matches!(
            strategy.set_free_parameters(&[0.5, 1.0]),
            Err(OptimizationError::Configuration(_))
        ));
        assert!(matches!(
            strategy.set_free_parameters(&[f64::NAN, 1.0, 2.0]),
            Err(OptimizationError::Configuration(_))
        ));
    }
}
