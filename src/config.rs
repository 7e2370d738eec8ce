use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fitness::GeneBinding;
use crate::model::BREAKPOINT_GENES;
use crate::ops::AndOp;

/// Every knob of a calibration run. `Default` reproduces the reference setup.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Probability that a pair of consecutive offspring is mated
    pub crossover_probability: f64,
    /// Probability that an offspring goes through mutation at all
    pub mutation_probability: f64,
    /// Per gene mutation probability once an offspring is picked for mutation
    pub gene_mutation_probability: f64,
    pub mutation_mu: f64,
    pub mutation_sigma: f64,
    pub blend_alpha: f64,
    pub tournament_size: usize,
    pub candidate_length: usize,
    pub binding: GeneBinding,
    pub and_op: AndOp,
    pub seed: Option<u64>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            generations: 10,
            crossover_probability: 0.5,
            mutation_probability: 0.2,
            gene_mutation_probability: 0.2,
            mutation_mu: 0.,
            mutation_sigma: 1.,
            blend_alpha: 0.5,
            tournament_size: 3,
            candidate_length: 5,
            binding: GeneBinding::Detached,
            and_op: AndOp::Min,
            seed: None,
        }
    }
}

impl CalibrationConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(Error::OptimizerConfig(msg)) };

        if self.population_size == 0 {
            return invalid("population size must be at least 1".into());
        }

        if self.generations == 0 {
            return invalid("generation count must be at least 1".into());
        }

        if self.tournament_size == 0 {
            return invalid("tournament size must be at least 1".into());
        }

        if self.candidate_length == 0 {
            return invalid("candidate length must be at least 1".into());
        }

        for (name, p) in [
            ("crossover probability", self.crossover_probability),
            ("mutation probability", self.mutation_probability),
            ("gene mutation probability", self.gene_mutation_probability),
        ] {
            if !(0. ..=1.).contains(&p) {
                return invalid(format!("{name} must lie in [0, 1], got {p}"));
            }
        }

        if !self.mutation_mu.is_finite() {
            return invalid(format!("mutation mu must be finite, got {}", self.mutation_mu));
        }

        if !self.mutation_sigma.is_finite() || self.mutation_sigma < 0. {
            return invalid(format!(
                "mutation sigma must be finite and non-negative, got {}",
                self.mutation_sigma
            ));
        }

        if !self.blend_alpha.is_finite() || self.blend_alpha < 0. {
            return invalid(format!(
                "blend alpha must be finite and non-negative, got {}",
                self.blend_alpha
            ));
        }

        if self.binding == GeneBinding::Breakpoints && self.candidate_length != BREAKPOINT_GENES {
            return invalid(format!(
                "breakpoint binding needs candidates of {BREAKPOINT_GENES} genes, got {}",
                self.candidate_length
            ));
        }

        Ok(())
    }
}

#[test]
fn test_defaults_are_valid() {
    let config = CalibrationConfig::default();

    assert_eq!(config.validate(), Ok(()));
    assert_eq!(config.population_size, 10);
    assert_eq!(config.candidate_length, 5);
}

#[test]
fn test_invalid_configs() {
    let cases = [
        CalibrationConfig {
            population_size: 0,
            ..Default::default()
        },
        CalibrationConfig {
            generations: 0,
            ..Default::default()
        },
        CalibrationConfig {
            tournament_size: 0,
            ..Default::default()
        },
        CalibrationConfig {
            crossover_probability: 1.5,
            ..Default::default()
        },
        CalibrationConfig {
            mutation_probability: -0.1,
            ..Default::default()
        },
        CalibrationConfig {
            gene_mutation_probability: f64::NAN,
            ..Default::default()
        },
        CalibrationConfig {
            mutation_sigma: -1.,
            ..Default::default()
        },
        CalibrationConfig {
            binding: GeneBinding::Breakpoints,
            candidate_length: 7,
            ..Default::default()
        },
    ];

    for config in cases {
        assert!(
            matches!(config.validate(), Err(Error::OptimizerConfig(_))),
            "{config:?} should be rejected"
        );
    }
}

#[test]
fn test_partial_config_from_json() {
    let config: CalibrationConfig =
        serde_json::from_str(r#"{ "generations": 25, "binding": "breakpoints", "seed": 7 }"#).unwrap();

    assert_eq!(config.generations, 25);
    assert_eq!(config.binding, GeneBinding::Breakpoints);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.population_size, 10);
}
