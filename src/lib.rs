pub mod algorithm;
pub mod candidate;
pub mod error;
pub mod evaluator;
pub mod population;
pub mod rng;
pub mod strategy;

// Re-export commonly used types for convenience
pub use algorithm::{Algorithm, State, StopCondition};
pub use candidate::{BestTracker, Candidate, Encoding};
pub use error::{OptimizationError, OptionExt, Result};
pub use evaluator::Evaluator;
pub use population::Population;
pub use strategy::{
    BacterialForaging, BfoConfig, ParticleSwarm, PsoConfig, Strategy,
};
