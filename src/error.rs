//! # Error Types
//!
//! This module defines custom error types for the optimization library.
//! It provides specific error variants for the failure scenarios that may
//! occur while constructing and running an optimization algorithm.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use swarmopt::error::{OptimizationError, Result};
//!
//! fn some_function() -> Result<()> {
//!     // Function implementation
//!     Ok(())
//! }
//!
//! fn caller() {
//!     match some_function() {
//!         Ok(_) => println!("Success!"),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use swarmopt::error::{OptimizationError, OptionExt};
//!
//! fn lowest_cost(costs: &[f64]) -> swarmopt::error::Result<f64> {
//!     costs
//!         .iter()
//!         .cloned()
//!         .min_by(|a, b| a.partial_cmp(b).unwrap())
//!         .ok_or_else_opt(|| OptimizationError::EmptyPopulation)
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur in the optimization library.
///
/// This enum provides specific error variants for the different failure
/// scenarios that may occur while building and running an algorithm.
#[derive(Error, Debug)]
pub enum OptimizationError {
    /// Error that occurs when an iteration or result is requested before
    /// the algorithm has been initialized.
    #[error("Algorithm has not been initialized: call init() or init_seeded() first")]
    NotInitialized,

    /// Error that occurs when an operation is not supported by a strategy.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when the evaluator produces a cost that cannot be
    /// used for ranking or best-tracking.
    #[error("Invalid cost value: {0}")]
    InvalidCost(String),

    /// Error that occurs when a population index is outside of the
    /// container's fixed size.
    #[error("Index {index} is out of bounds for population of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },
}

/// A specialized Result type for optimization operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the
/// error type fixed to `OptimizationError`.
///
/// ## Examples
///
/// ```rust
/// use swarmopt::error::{OptimizationError, Result};
///
/// fn may_fail() -> Result<i32> {
///     // Some operation that might fail
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, OptimizationError>;

/// Extension trait for Option to convert to Result with a custom error.
///
/// This trait provides a convenient way to convert an `Option` to a `Result`
/// with a lazily constructed `OptimizationError`.
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    ///
    /// ## Arguments
    ///
    /// * `err_fn` - A closure that returns an `OptimizationError`.
    ///
    /// ## Returns
    ///
    /// A `Result<T, OptimizationError>` with the original value or the
    /// generated error.
    fn ok_or_else_opt<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> OptimizationError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_opt<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> OptimizationError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_ext_some() {
        let value: Option<i32> = Some(7);
        let result = value.ok_or_else_opt(|| OptimizationError::EmptyPopulation);
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn test_option_ext_none() {
        let value: Option<i32> = None;
        let result = value.ok_or_else_opt(|| OptimizationError::EmptyPopulation);
        assert!(matches!(result, Err(OptimizationError::EmptyPopulation)));
    }

    #[test]
    fn test_error_display() {
        let err = OptimizationError::IndexOutOfBounds { index: 5, size: 4 };
        assert_eq!(
            err.to_string(),
            "Index 5 is out of bounds for population of size 4"
        );
    }
}
