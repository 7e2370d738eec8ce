//! Arrival volume forecasting with a Mamdani fuzzy model, calibrated by a genetic algorithm.
//!
//! The fuzzy side reads last month's and the previous month's arrivals, fires a small rule
//! base and defuzzifies the predicted arrivals by centroid. The genetic side searches a gene
//! vector that minimises the mean squared forecast error over labeled samples.
//!
//! ```no_run
//! use fuzzy_arrival::{run_calibration, CalibrationConfig};
//!
//! let config = CalibrationConfig {
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let report = run_calibration(&config)?;
//!
//! println!("{report}");
//! # Ok::<(), fuzzy_arrival::Error>(())
//! ```

use tracing::info;

pub mod config;
pub mod dsl;
pub mod error;
pub mod fitness;
pub mod genetics;
pub mod inference;
pub mod inputs;
mod linspace;
pub mod membership;
pub mod model;
pub mod ops;
pub mod outputs;
pub mod report;
pub mod rules;
pub mod terms;
pub mod variable;

pub use config::CalibrationConfig;
pub use error::{Error, Result};
pub use fitness::{Evaluate, FitnessEvaluator, GeneBinding, Sample, DEFAULT_SAMPLES};
pub use genetics::Optimizer;
pub use inference::{FuzzySystem, InferenceEngine};
pub use membership::{membership, Triangle};
pub use model::ArrivalModel;
pub use report::CalibrationReport;
pub use terms::Level;

/// Calibrates the arrival model against [`DEFAULT_SAMPLES`].
pub fn run_calibration(config: &CalibrationConfig) -> Result<CalibrationReport> {
    run_calibration_with_samples(config, DEFAULT_SAMPLES.to_vec())
}

pub fn run_calibration_with_samples(config: &CalibrationConfig, samples: Vec<Sample>) -> Result<CalibrationReport> {
    config.validate()?;

    let engine = InferenceEngine::default().with_and_op(config.and_op);
    let evaluator = FitnessEvaluator::new(engine, samples, config.binding, config.candidate_length)?;

    info!(binding = ?config.binding, seed = ?config.seed, samples = evaluator.samples().len(), "calibrating arrival model");

    let calibration = Optimizer::from_config(evaluator, config)?.run()?;

    Ok(CalibrationReport::new(calibration, config.binding, config.seed))
}
