use std::fmt;

use serde::Serialize;

use crate::fitness::GeneBinding;
use crate::genetics::{Calibration, GenerationStats, Individual};

/// What a calibration run hands back to its caller.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub binding: GeneBinding,
    pub seed: Option<u64>,
    pub best: Individual,
    pub best_generation: usize,
    pub final_best: Individual,
    pub logbook: Vec<GenerationStats>,
}

impl CalibrationReport {
    pub fn new(calibration: Calibration, binding: GeneBinding, seed: Option<u64>) -> Self {
        Self {
            binding,
            seed,
            best: calibration.best,
            best_generation: calibration.best_generation,
            final_best: calibration.final_best,
            logbook: calibration.logbook,
        }
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best.fitness
    }
}

impl fmt::Display for CalibrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>4} {:>7} {:>12} {:>12} {:>12} {:>12}", "gen", "nevals", "avg", "std", "min", "max")?;

        for stats in &self.logbook {
            writeln!(
                f,
                "{:>4} {:>7} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                stats.generation, stats.evaluations, stats.avg, stats.std, stats.min, stats.max
            )?;
        }

        if self.binding == GeneBinding::Detached {
            writeln!(f, "note: genes are not wired into the fuzzy model, fitness is constant")?;
        }

        writeln!(f, "Best individual: {}", self.best)?;

        match self.best.fitness {
            Some(fitness) => write!(f, "Best fitness (MSE): {fitness:.6} (generation {})", self.best_generation),
            None => write!(f, "Best fitness (MSE): unscored"),
        }
    }
}
