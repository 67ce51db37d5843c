//! # Candidate Model
//!
//! A `Candidate` is one point in the search space paired with its evaluated
//! cost. The cost is kept consistent with the variables at all times: every
//! constructor evaluates on construction, and every coordinate mutation goes
//! through a re-evaluating operation, so no stale cost can be observed.
//!
//! Strategy-specific state (a bacterium's health, a particle's velocity) is
//! layered on through composition rather than inheritance: the owning
//! strategy wraps a `Candidate` in its own member type and exposes it through
//! the [`Encoding`] trait.
//!
//! ## Example
//!
//! ```rust
//! use swarmopt::candidate::Candidate;
//! use swarmopt::rng::RandomNumberGenerator;
//!
//! let sum = |variables: &[f64]| variables.iter().sum::<f64>();
//! let mut rng = RandomNumberGenerator::from_seed(42);
//!
//! let candidate = Candidate::random(3, &mut rng, &sum).unwrap();
//! assert_eq!(candidate.variables().len(), 3);
//! assert!(candidate.cost().is_finite());
//! ```

use std::fmt::Debug;

use crate::error::{OptimizationError, OptionExt, Result};
use crate::evaluator::Evaluator;
use crate::rng::RandomNumberGenerator;

/// Clamps a coordinate to the normalized search interval `[0, 1]`.
pub(crate) fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Evaluates `variables` and rejects non-finite costs.
///
/// Cost validity is foundational to ranking and best-tracking, so a NaN or
/// infinite evaluator output fails the whole iteration rather than entering
/// the population.
pub(crate) fn checked_cost(evaluator: &dyn Evaluator, variables: &[f64]) -> Result<f64> {
    let cost = evaluator.evaluate(variables);
    if !cost.is_finite() {
        return Err(OptimizationError::InvalidCost(format!(
            "evaluator returned non-finite cost {} for {:?}",
            cost, variables
        )));
    }
    Ok(cost)
}

/// One point in the search space paired with its evaluated cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub(crate) variables: Vec<f64>,
    pub(crate) cost: f64,
}

impl Candidate {
    /// Creates a candidate from an already evaluated variable vector.
    pub fn new(variables: Vec<f64>, cost: f64) -> Self {
        Self { variables, cost }
    }

    /// Creates a candidate from a variable vector, evaluating it once.
    pub fn from_vector(variables: Vec<f64>, evaluator: &dyn Evaluator) -> Result<Self> {
        let cost = checked_cost(evaluator, &variables)?;
        Ok(Self { variables, cost })
    }

    /// Creates a candidate with every coordinate drawn uniformly from
    /// `[0, 1)`, evaluated once.
    pub fn random(
        dimension: usize,
        rng: &mut RandomNumberGenerator,
        evaluator: &dyn Evaluator,
    ) -> Result<Self> {
        let variables: Vec<f64> = rng.fetch_uniform(0.0, 1.0, dimension).into_iter().collect();
        Self::from_vector(variables, evaluator)
    }

    /// Returns the variable vector.
    pub fn variables(&self) -> &[f64] {
        &self.variables
    }

    /// Returns the evaluated cost of the current variables.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the search dimension of this candidate.
    pub fn dimension(&self) -> usize {
        self.variables.len()
    }

    /// Re-evaluates the current variables and stores the new cost.
    ///
    /// Called after any in-place coordinate mutation to restore the
    /// cost-variable consistency invariant.
    pub fn reevaluate(&mut self, evaluator: &dyn Evaluator) -> Result<f64> {
        self.cost = checked_cost(evaluator, &self.variables)?;
        Ok(self.cost)
    }

    /// Replaces every coordinate with an independent uniform draw from
    /// `[0, 1)` and re-evaluates.
    pub fn randomize(
        &mut self,
        rng: &mut RandomNumberGenerator,
        evaluator: &dyn Evaluator,
    ) -> Result<f64> {
        for value in self.variables.iter_mut() {
            *value = rng.gen_range(0.0..1.0);
        }
        self.reevaluate(evaluator)
    }
}

/// The composition seam between the generic engine and strategy-specific
/// candidate state.
///
/// Strategies that need extra per-member state (health, velocity, a personal
/// best) define their own member type wrapping a [`Candidate`] and implement
/// this trait; the plain `Candidate` implements it trivially for strategies
/// that need nothing more than position and cost.
pub trait Encoding: Clone + Debug + Send + Sync {
    /// Wraps a freshly evaluated candidate in the member type, with any
    /// strategy-specific state at its starting values.
    ///
    /// Starting values that need randomness draw from the injected
    /// generator, keeping seeded runs reproducible.
    fn from_candidate(candidate: Candidate, rng: &mut RandomNumberGenerator) -> Self;

    /// Returns the wrapped candidate.
    fn candidate(&self) -> &Candidate;

    /// Returns the wrapped candidate mutably.
    fn candidate_mut(&mut self) -> &mut Candidate;

    /// Returns the cost of the wrapped candidate.
    fn cost(&self) -> f64 {
        self.candidate().cost()
    }
}

impl Encoding for Candidate {
    fn from_candidate(candidate: Candidate, _rng: &mut RandomNumberGenerator) -> Self {
        candidate
    }

    fn candidate(&self) -> &Candidate {
        self
    }

    fn candidate_mut(&mut self) -> &mut Candidate {
        self
    }
}

/// Single authority for tracking the lowest-cost candidate observed across a
/// run.
///
/// The engine calls [`BestTracker::observe`] after every evaluation; the
/// tracked best is replaced only on strictly lower cost, so the reported best
/// never regresses. The tracked snapshot is owned: the population member it
/// was copied from may since have been replaced.
#[derive(Debug, Clone, Default)]
pub struct BestTracker {
    best: Option<Candidate>,
}

impl BestTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self { best: None }
    }

    /// Unconditionally installs `candidate` as the current best.
    ///
    /// Used once at initialization with the population's champion.
    pub fn seed(&mut self, candidate: Candidate) {
        self.best = Some(candidate);
    }

    /// Observes a freshly evaluated candidate, keeping a copy if it is
    /// strictly better than the current best.
    ///
    /// Returns `true` if the tracked best improved.
    pub fn observe(&mut self, candidate: &Candidate) -> bool {
        let improved = match &self.best {
            Some(best) => candidate.cost() < best.cost(),
            None => true,
        };
        if improved {
            tracing::trace!(cost = candidate.cost(), "new global best observed");
            self.best = Some(candidate.clone());
        }
        improved
    }

    /// Returns the tracked best, if any observation has happened yet.
    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    /// Returns a defensive copy of the tracked best.
    pub fn snapshot(&self) -> Result<Candidate> {
        self.best
            .clone()
            .ok_or_else_opt(|| OptimizationError::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_evaluator() -> impl Evaluator {
        |variables: &[f64]| variables.iter().sum::<f64>()
    }

    #[test]
    fn test_random_candidate_in_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let evaluator = sum_evaluator();
        let candidate = Candidate::random(8, &mut rng, &evaluator).unwrap();

        assert_eq!(candidate.dimension(), 8);
        for &value in candidate.variables() {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_cost_consistency_after_randomize() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let evaluator = sum_evaluator();
        let mut candidate = Candidate::from_vector(vec![0.5, 0.5], &evaluator).unwrap();
        assert_eq!(candidate.cost(), 1.0);

        candidate.randomize(&mut rng, &evaluator).unwrap();
        let expected: f64 = candidate.variables().iter().sum();
        assert_eq!(candidate.cost(), expected);
    }

    #[test]
    fn test_non_finite_cost_is_rejected() {
        let evaluator = |_: &[f64]| f64::NAN;
        let result = Candidate::from_vector(vec![0.5], &evaluator);
        assert!(matches!(result, Err(OptimizationError::InvalidCost(_))));
    }

    #[test]
    fn test_best_tracker_copy_on_strict_improve() {
        let mut tracker = BestTracker::new();
        tracker.seed(Candidate::new(vec![0.5], 1.0));

        // Equal cost must not replace the tracked best
        assert!(!tracker.observe(&Candidate::new(vec![0.9], 1.0)));
        assert_eq!(tracker.best().unwrap().variables(), &[0.5]);

        // Strictly lower cost must
        assert!(tracker.observe(&Candidate::new(vec![0.1], 0.5)));
        assert_eq!(tracker.best().unwrap().cost(), 0.5);

        // Regression never happens
        assert!(!tracker.observe(&Candidate::new(vec![0.8], 0.7)));
        assert_eq!(tracker.best().unwrap().cost(), 0.5);
    }

    #[test]
    fn test_best_tracker_snapshot_is_a_copy() {
        let mut tracker = BestTracker::new();
        tracker.seed(Candidate::new(vec![0.5], 1.0));

        let mut snapshot = tracker.snapshot().unwrap();
        snapshot.variables[0] = 0.0;
        snapshot.cost = -1.0;

        assert_eq!(tracker.best().unwrap().variables(), &[0.5]);
        assert_eq!(tracker.best().unwrap().cost(), 1.0);
    }

    #[test]
    fn test_best_tracker_empty_snapshot_fails() {
        let tracker = BestTracker::new();
        assert!(matches!(
            tracker.snapshot(),
            Err(OptimizationError::NotInitialized)
        ));
    }
}
