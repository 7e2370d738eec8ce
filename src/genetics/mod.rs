//! Generational genetic algorithm over fixed-length real-valued candidates.

pub mod engine;
pub mod operators;
pub mod types;

pub use engine::{Calibration, Optimizer, OptimizerState};
pub use operators::{BlendCrossover, Crossover, GaussianMutation, Mutation, Selection, TournamentSelection};
pub use types::{GenerationStats, Individual};
