use rand::{Rng, RngCore};

use crate::error::{Error, Result};
use crate::genetics::types::Individual;

/// Picks parents out of a scored population.
pub trait Selection {
    fn select(&self, population: &[Individual], k: usize, rng: &mut dyn RngCore) -> Result<Vec<Individual>>;
}

/// Best of `size` individuals drawn with replacement, repeated `k` times.
#[derive(Clone, Copy, Debug)]
pub struct TournamentSelection {
    pub tournament_size: usize,
}

impl TournamentSelection {
    pub fn new(size: usize) -> Self {
        Self { tournament_size: size }
    }
}

impl Selection for TournamentSelection {
    fn select(&self, population: &[Individual], k: usize, rng: &mut dyn RngCore) -> Result<Vec<Individual>> {
        if population.is_empty() {
            return Err(Error::OptimizerConfig("cannot select from an empty population".into()));
        }

        let fitness_of = |ind: &Individual| {
            ind.fitness
                .ok_or_else(|| Error::MalformedCandidate("selected an individual that was never evaluated".into()))
        };

        let mut chosen = Vec::with_capacity(k);

        for _ in 0..k {
            let mut best = &population[rng.random_range(0..population.len())];
            let mut best_fitness = fitness_of(best)?;

            for _ in 1..self.tournament_size {
                let challenger = &population[rng.random_range(0..population.len())];
                let challenger_fitness = fitness_of(challenger)?;

                // the first drawn aspirant keeps ties
                if challenger_fitness < best_fitness {
                    best = challenger;
                    best_fitness = challenger_fitness;
                }
            }

            chosen.push(best.clone());
        }

        Ok(chosen)
    }
}
