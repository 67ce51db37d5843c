//! # Population Container
//!
//! A `Population` is the fixed-size working set of candidates for one run.
//! Its size is set at construction and never changes: mutation happens only
//! through explicit in-place replacement and sorting, and every member is
//! evaluated before any constructor or update returns.
//!
//! Initialization draws variable vectors from the injected random number
//! generator first, then evaluates them. When the population is large enough
//! to make it worthwhile, evaluation runs in parallel with Rayon; the draws
//! and the wrapping of candidates into members stay sequential so that seeded
//! runs remain reproducible.
//!
//! ## Example
//!
//! ```rust
//! use swarmopt::candidate::Candidate;
//! use swarmopt::population::Population;
//! use swarmopt::rng::RandomNumberGenerator;
//!
//! let sum = |variables: &[f64]| variables.iter().sum::<f64>();
//! let mut rng = RandomNumberGenerator::from_seed(42);
//!
//! let population: Population<Candidate> = Population::random(10, 3, &sum, &mut rng).unwrap();
//! assert_eq!(population.len(), 10);
//! ```

use rayon::prelude::*;

use crate::candidate::{Candidate, Encoding};
use crate::error::{OptimizationError, OptionExt, Result};
use crate::evaluator::Evaluator;
use crate::rng::RandomNumberGenerator;

/// Minimum number of members before initial evaluation is parallelized.
const PARALLEL_EVALUATION_THRESHOLD: usize = 1000;

/// The fixed-size working set of candidates for one run.
#[derive(Debug, Clone)]
pub struct Population<E: Encoding> {
    members: Vec<E>,
    dimension: usize,
}

impl<E: Encoding> Population<E> {
    /// Builds a population of `size` members whose variables are drawn
    /// uniformly from `[0, 1)^dimension`, each evaluated once.
    pub fn random(
        size: usize,
        dimension: usize,
        evaluator: &dyn Evaluator,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self> {
        validate_shape(size, dimension)?;
        let vectors: Vec<Vec<f64>> = (0..size)
            .map(|_| rng.fetch_uniform(0.0, 1.0, dimension).into_iter().collect())
            .collect();
        Self::from_vectors(vectors, dimension, evaluator, rng)
    }

    /// Builds a population from the given seed vectors, filling the
    /// remaining slots with random members.
    ///
    /// The number of seeds must not exceed `size`, and every seed must have
    /// exactly `dimension` coordinates.
    pub fn seeded(
        seeds: &[Vec<f64>],
        size: usize,
        dimension: usize,
        evaluator: &dyn Evaluator,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self> {
        validate_shape(size, dimension)?;
        if seeds.len() > size {
            return Err(OptimizationError::Configuration(format!(
                "Got {} seed vectors for a population of size {}",
                seeds.len(),
                size
            )));
        }
        for (i, seed) in seeds.iter().enumerate() {
            if seed.len() != dimension {
                return Err(OptimizationError::Configuration(format!(
                    "Seed vector {} has {} coordinates, expected {}",
                    i,
                    seed.len(),
                    dimension
                )));
            }
        }

        let mut vectors: Vec<Vec<f64>> = seeds.to_vec();
        while vectors.len() < size {
            vectors.push(rng.fetch_uniform(0.0, 1.0, dimension).into_iter().collect());
        }
        Self::from_vectors(vectors, dimension, evaluator, rng)
    }

    /// Wraps pre-evaluated members into a population.
    pub(crate) fn from_members(members: Vec<E>) -> Result<Self> {
        let dimension = members
            .first()
            .ok_or_else_opt(|| OptimizationError::EmptyPopulation)?
            .candidate()
            .dimension();
        Ok(Self { members, dimension })
    }

    fn from_vectors(
        vectors: Vec<Vec<f64>>,
        dimension: usize,
        evaluator: &dyn Evaluator,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self> {
        let candidates: Result<Vec<Candidate>> = if vectors.len() >= PARALLEL_EVALUATION_THRESHOLD {
            vectors
                .into_par_iter()
                .map(|variables| Candidate::from_vector(variables, evaluator))
                .collect()
        } else {
            vectors
                .into_iter()
                .map(|variables| Candidate::from_vector(variables, evaluator))
                .collect()
        };
        // Wrapping stays sequential: member types may draw starting state
        // (a particle's initial velocity) from the injected generator
        let members = candidates?
            .into_iter()
            .map(|candidate| E::from_candidate(candidate, rng))
            .collect();
        Ok(Self { members, dimension })
    }

    /// Returns the fixed number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the population holds no members.
    ///
    /// Constructors reject zero sizes, so this only holds for a population
    /// that was never successfully built.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the search dimension shared by all members.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the member at `index`, if within bounds.
    pub fn get(&self, index: usize) -> Option<&E> {
        self.members.get(index)
    }

    /// Returns the member at `index` mutably, if within bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.members.get_mut(index)
    }

    /// Returns the members as a slice.
    pub fn members(&self) -> &[E] {
        &self.members
    }

    /// Returns the members as a mutable slice.
    pub fn members_mut(&mut self) -> &mut [E] {
        &mut self.members
    }

    /// Returns an iterator over the members.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.members.iter()
    }

    /// Returns a mutable iterator over the members.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, E> {
        self.members.iter_mut()
    }

    /// Overwrites the member at `index` in place, preserving the fixed size.
    pub fn replace(&mut self, index: usize, member: E) -> Result<()> {
        let size = self.members.len();
        match self.members.get_mut(index) {
            Some(slot) => {
                *slot = member;
                Ok(())
            }
            None => Err(OptimizationError::IndexOutOfBounds { index, size }),
        }
    }

    /// Stable sort of the members ascending by cost.
    pub fn sort_by_cost(&mut self) {
        self.sort_by_key_f64(|member| member.cost());
    }

    /// Stable sort of the members ascending by the given scalar key.
    ///
    /// Costs and health values are guaranteed finite by construction, so ties
    /// are the only case where the ordering falls back to equality.
    pub fn sort_by_key_f64<F>(&mut self, key: F)
    where
        F: Fn(&E) -> f64,
    {
        self.members.sort_by(|a, b| {
            key(a)
                .partial_cmp(&key(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// Returns the lowest-cost member.
    pub fn best(&self) -> Result<&E> {
        self.members
            .iter()
            .min_by(|a, b| {
                a.cost()
                    .partial_cmp(&b.cost())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .ok_or_else_opt(|| OptimizationError::EmptyPopulation)
    }
}

fn validate_shape(size: usize, dimension: usize) -> Result<()> {
    if size == 0 {
        return Err(OptimizationError::Configuration(
            "Population size cannot be zero".to_string(),
        ));
    }
    if dimension == 0 {
        return Err(OptimizationError::Configuration(
            "Search dimension cannot be zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_evaluator() -> impl Evaluator {
        |variables: &[f64]| variables.iter().sum::<f64>()
    }

    #[test]
    fn test_random_population_is_fully_evaluated() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let evaluator = sum_evaluator();
        let population: Population<Candidate> =
            Population::random(10, 4, &evaluator, &mut rng).unwrap();

        assert_eq!(population.len(), 10);
        assert_eq!(population.dimension(), 4);
        for member in population.iter() {
            let expected: f64 = member.variables().iter().sum();
            assert_eq!(member.cost(), expected);
        }
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        let evaluator = sum_evaluator();
        let result: Result<Population<Candidate>> =
            Population::random(0, 4, &evaluator, &mut rng);
        assert!(matches!(result, Err(OptimizationError::Configuration(_))));
    }

    #[test]
    fn test_seeded_population_contains_seed() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let evaluator = sum_evaluator();
        let seeds = vec![vec![0.5, 0.5]];
        let population: Population<Candidate> =
            Population::seeded(&seeds, 4, 2, &evaluator, &mut rng).unwrap();

        assert_eq!(population.len(), 4);
        let matching = population
            .iter()
            .filter(|member| member.variables() == [0.5, 0.5])
            .count();
        assert_eq!(matching, 1);
        assert_eq!(population.get(0).unwrap().cost(), 1.0);
    }

    #[test]
    fn test_too_many_seeds_is_rejected() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let evaluator = sum_evaluator();
        let seeds = vec![vec![0.1, 0.1], vec![0.2, 0.2], vec![0.3, 0.3]];
        let result: Result<Population<Candidate>> =
            Population::seeded(&seeds, 2, 2, &evaluator, &mut rng);
        assert!(matches!(result, Err(OptimizationError::Configuration(_))));
    }

    #[test]
    fn test_seed_dimension_mismatch_is_rejected() {
        let mut rng = RandomNumberGenerator::from_seed(7);
        let evaluator = sum_evaluator();
        let seeds = vec![vec![0.1, 0.2, 0.3]];
        let result: Result<Population<Candidate>> =
            Population::seeded(&seeds, 4, 2, &evaluator, &mut rng);
        assert!(matches!(result, Err(OptimizationError::Configuration(_))));
    }

    #[test]
    fn test_sort_by_cost_is_ascending_and_stable() {
        let members = vec![
            Candidate::new(vec![0.3], 3.0),
            Candidate::new(vec![0.1], 1.0),
            Candidate::new(vec![0.2], 1.0),
            Candidate::new(vec![0.4], 0.5),
        ];
        let mut population = Population::from_members(members).unwrap();
        population.sort_by_cost();

        assert_eq!(population.get(0).unwrap().cost(), 0.5);
        // Equal costs keep their original relative order
        assert_eq!(population.get(1).unwrap().variables(), &[0.1]);
        assert_eq!(population.get(2).unwrap().variables(), &[0.2]);
        assert_eq!(population.get(3).unwrap().cost(), 3.0);
    }

    #[test]
    fn test_replace_preserves_size() {
        let members = vec![
            Candidate::new(vec![0.1], 1.0),
            Candidate::new(vec![0.2], 2.0),
        ];
        let mut population = Population::from_members(members).unwrap();

        population
            .replace(1, Candidate::new(vec![0.9], 9.0))
            .unwrap();
        assert_eq!(population.len(), 2);
        assert_eq!(population.get(1).unwrap().cost(), 9.0);

        let result = population.replace(2, Candidate::new(vec![0.0], 0.0));
        assert!(matches!(
            result,
            Err(OptimizationError::IndexOutOfBounds { index: 2, size: 2 })
        ));
    }

    #[test]
    fn test_best_returns_lowest_cost_member() {
        let members = vec![
            Candidate::new(vec![0.3], 3.0),
            Candidate::new(vec![0.1], 0.25),
            Candidate::new(vec![0.2], 2.0),
        ];
        let population = Population::from_members(members).unwrap();
        assert_eq!(population.best().unwrap().cost(), 0.25);
    }
}
