use std::fmt;

use serde::{Deserialize, Serialize};

/// A candidate parameter vector and, once scored, its fitness (lower is better).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Individual {
    pub genes: Vec<f64>,
    pub fitness: Option<f64>,
}

impl Individual {
    pub fn new(genes: Vec<f64>) -> Self {
        Self { genes, fitness: None }
    }

    pub fn is_scored(&self) -> bool {
        self.fitness.is_some()
    }

    /// Drops the cached fitness after the genes changed
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;

        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }

            write!(f, "{gene:.6}")?;
        }

        f.write_str("]")
    }
}

/// Fitness summary of one generation, one line of the logbook.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    /// Candidates scored during this generation
    pub evaluations: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub std: f64,
}

impl GenerationStats {
    /// Returns `None` unless every individual is scored
    pub fn from_population(generation: usize, evaluations: usize, population: &[Individual]) -> Option<Self> {
        let fitness = population.iter().map(|ind| ind.fitness).collect::<Option<Vec<f64>>>()?;

        if fitness.is_empty() {
            return None;
        }

        let n = fitness.len() as f64;
        let avg = fitness.iter().sum::<f64>() / n;
        let var = fitness.iter().map(|f| (f - avg).powi(2)).sum::<f64>() / n;

        Some(Self {
            generation,
            evaluations,
            min: fitness.iter().copied().fold(f64::INFINITY, f64::min),
            max: fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            avg,
            std: var.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(fitness: f64) -> Individual {
        Individual {
            genes: vec![0.; 5],
            fitness: Some(fitness),
        }
    }

    #[test]
    fn test_generation_stats() {
        let population = [scored(1.), scored(3.), scored(5.), scored(7.)];
        let stats = GenerationStats::from_population(2, 4, &population).unwrap();

        assert_eq!(stats.generation, 2);
        assert_eq!(stats.min, 1.);
        assert_eq!(stats.max, 7.);
        assert_eq!(stats.avg, 4.);
        assert!((stats.std - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_stats_need_scored_population() {
        let population = [scored(1.), Individual::new(vec![0.; 5])];

        assert_eq!(GenerationStats::from_population(0, 1, &population), None);
        assert_eq!(GenerationStats::from_population(0, 0, &[]), None);
    }

    #[test]
    fn test_display() {
        let mut ind = Individual::new(vec![0.5, -1.25]);

        assert_eq!(ind.to_string(), "[0.500000, -1.250000]");
        ind.fitness = Some(2.);
        ind.invalidate();
        assert!(!ind.is_scored());
    }
}
