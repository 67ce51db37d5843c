//! # Evaluator Trait
//!
//! The `Evaluator` trait is the objective function under minimization: it
//! maps a candidate's variable vector to a scalar cost. It is the only
//! collaborator the engine depends on for objective semantics and is
//! injected at algorithm construction.
//!
//! Implementations must be side-effect free with respect to engine state and
//! safe to call from multiple threads, since population members may be
//! evaluated in parallel.
//!
//! ## Example
//!
//! ```rust
//! use swarmopt::evaluator::Evaluator;
//!
//! struct Sphere;
//!
//! impl Evaluator for Sphere {
//!     fn evaluate(&self, variables: &[f64]) -> f64 {
//!         variables.iter().map(|x| x * x).sum()
//!     }
//! }
//!
//! let sphere = Sphere;
//! assert_eq!(sphere.evaluate(&[0.0, 0.0]), 0.0);
//! ```
//!
//! Closures with the right signature implement the trait as well:
//!
//! ```rust
//! use swarmopt::evaluator::Evaluator;
//!
//! let sum = |variables: &[f64]| variables.iter().sum::<f64>();
//! assert_eq!(sum.evaluate(&[0.25, 0.75]), 1.0);
//! ```

/// The objective function under minimization.
///
/// `evaluate` receives the candidate's variable vector, conventionally
/// normalized to `[0, 1]` per dimension, and returns its scalar cost. Lower
/// is better. A non-finite return value is treated as an evaluator fault and
/// propagated out of the engine.
pub trait Evaluator: Send + Sync {
    /// Computes the cost of the given variable vector.
    fn evaluate(&self, variables: &[f64]) -> f64;
}

impl<F> Evaluator for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, variables: &[f64]) -> f64 {
        self(variables)
    }
}
