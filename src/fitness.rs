use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::inference::InferenceEngine;
use crate::model::ArrivalModel;

/// A labeled observation: two months of history and the arrivals that followed.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Sample {
    pub arrival_last_month: f64,
    pub arrival_two_months_ago: f64,
    pub expected: f64,
}

impl Sample {
    pub const fn new(arrival_last_month: f64, arrival_two_months_ago: f64, expected: f64) -> Self {
        Self {
            arrival_last_month,
            arrival_two_months_ago,
            expected,
        }
    }
}

pub const DEFAULT_SAMPLES: [Sample; 3] = [
    Sample::new(20., 30., 25.),
    Sample::new(70., 80., 75.),
    Sample::new(50., 50., 50.),
];

/// Whether a candidate's genes reach the fuzzy model being scored.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneBinding {
    /// Genes are ignored: every candidate is scored against the fixed model, so fitness
    /// is the same for the whole population
    #[default]
    Detached,
    /// Genes place the consequent breakpoints, see [`crate::model::breakpoint_terms`]
    Breakpoints,
}

/// Scores a gene vector. Lower is better.
pub trait Evaluate {
    fn evaluate(&self, genes: &[f64]) -> Result<f64>;
}

/// Mean squared forecast error over a fixed set of samples.
pub struct FitnessEvaluator {
    engine: InferenceEngine,
    model: ArrivalModel,
    samples: Vec<Sample>,
    binding: GeneBinding,
    candidate_length: usize,
}

impl FitnessEvaluator {
    pub fn new(
        engine: InferenceEngine,
        samples: Vec<Sample>,
        binding: GeneBinding,
        candidate_length: usize,
    ) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InvalidParameter("fitness needs at least one sample".into()));
        }

        Ok(Self {
            engine,
            model: ArrivalModel::new(engine)?,
            samples,
            binding,
            candidate_length,
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn binding(&self) -> GeneBinding {
        self.binding
    }

    /// Mean squared error of `model` over the samples
    pub fn mse(&self, model: &ArrivalModel) -> Result<f64> {
        let mut total = 0.;

        for sample in &self.samples {
            let prediction = model.forecast(sample.arrival_last_month, sample.arrival_two_months_ago)?;
            total += (prediction - sample.expected).powi(2);
        }

        Ok(total / self.samples.len() as f64)
    }
}

impl Evaluate for FitnessEvaluator {
    fn evaluate(&self, genes: &[f64]) -> Result<f64> {
        if genes.len() != self.candidate_length {
            return Err(Error::MalformedCandidate(format!(
                "expected {} genes, got {}",
                self.candidate_length,
                genes.len()
            )));
        }

        if let Some(gene) = genes.iter().find(|g| !g.is_finite()) {
            return Err(Error::MalformedCandidate(format!("gene {gene} is not finite")));
        }

        let fitness = match self.binding {
            GeneBinding::Detached => self.mse(&self.model)?,
            GeneBinding::Breakpoints => self.mse(&ArrivalModel::from_genes(self.engine, genes)?)?,
        };

        debug!(?genes, fitness, "evaluated candidate");

        Ok(fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator(binding: GeneBinding) -> FitnessEvaluator {
        FitnessEvaluator::new(InferenceEngine::default(), DEFAULT_SAMPLES.to_vec(), binding, 5).unwrap()
    }

    #[test]
    fn test_mse_is_deterministic() {
        let evaluator = evaluator(GeneBinding::Detached);
        let first = evaluator.evaluate(&[0.1, 0.2, 0.3, 0.4, 0.5]).unwrap();
        let second = evaluator.evaluate(&[0.1, 0.2, 0.3, 0.4, 0.5]).unwrap();

        assert_eq!(first, second);
        assert!(first >= 0.);
    }

    #[test]
    fn test_mse_matches_manual_computation() {
        let evaluator = evaluator(GeneBinding::Detached);
        let model = ArrivalModel::new(InferenceEngine::default()).unwrap();
        let expected = DEFAULT_SAMPLES
            .iter()
            .map(|s| (model.forecast(s.arrival_last_month, s.arrival_two_months_ago).unwrap() - s.expected).powi(2))
            .sum::<f64>()
            / 3.;

        assert!((evaluator.evaluate(&[0.; 5]).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_detached_fitness_ignores_genes() {
        let evaluator = evaluator(GeneBinding::Detached);
        let baseline = evaluator.evaluate(&[0.5; 5]).unwrap();

        for genes in [[0.; 5], [1.; 5], [0.9, -3., 12., 0.4, 0.01]] {
            assert_eq!(evaluator.evaluate(&genes), Ok(baseline));
        }
    }

    #[test]
    fn test_breakpoint_fitness_depends_on_genes() {
        let detached = evaluator(GeneBinding::Detached);
        let bound = evaluator(GeneBinding::Breakpoints);

        // neutral genes rebuild the default model
        assert_eq!(bound.evaluate(&[0.5; 5]), detached.evaluate(&[0.5; 5]));
        assert_ne!(bound.evaluate(&[0.1, 0.9, 0.2, 0.8, 0.3]), bound.evaluate(&[0.5; 5]));
    }

    #[test]
    fn test_malformed_candidates_are_rejected() {
        for binding in [GeneBinding::Detached, GeneBinding::Breakpoints] {
            let evaluator = evaluator(binding);

            assert!(matches!(evaluator.evaluate(&[0.5; 4]), Err(Error::MalformedCandidate(_))));
            assert!(matches!(
                evaluator.evaluate(&[0.5, 0.5, f64::INFINITY, 0.5, 0.5]),
                Err(Error::MalformedCandidate(_))
            ));
        }
    }

    #[test]
    fn test_uncovered_sample_aborts_evaluation() {
        let evaluator = FitnessEvaluator::new(
            InferenceEngine::default(),
            vec![Sample::new(20., 30., 25.), Sample::new(50., 0., 30.)],
            GeneBinding::Detached,
            5,
        )
        .unwrap();

        assert!(matches!(evaluator.evaluate(&[0.5; 5]), Err(Error::NoRuleFired(_))));
    }

    #[test]
    fn test_empty_samples_rejected() {
        assert!(matches!(
            FitnessEvaluator::new(InferenceEngine::default(), Vec::new(), GeneBinding::Detached, 5),
            Err(Error::InvalidParameter(_))
        ));
    }
}
