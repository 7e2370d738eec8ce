use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::operators::{BlendCrossover, Crossover, GaussianMutation, Mutation, Selection, TournamentSelection};
use super::types::{GenerationStats, Individual};
use crate::config::CalibrationConfig;
use crate::error::{Error, Result};
use crate::fitness::Evaluate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimizerState {
    Initialized,
    /// `generation` is the last generation that was fully evaluated
    Evolving { generation: usize },
    Terminated,
}

/// Outcome of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct Calibration {
    /// Lowest fitness candidate seen during the whole run
    pub best: Individual,
    pub best_generation: usize,
    /// Lowest fitness candidate of the last generation
    pub final_best: Individual,
    pub final_population: Vec<Individual>,
    pub logbook: Vec<GenerationStats>,
}

/// Generational GA: select, mate and mutate, re-score, replace. No elitism; the hall of
/// fame keeps the best candidate seen so far.
pub struct Optimizer<E, S = TournamentSelection, C = BlendCrossover, M = GaussianMutation> {
    evaluator: E,
    select: S,
    mate: C,
    mutate: M,
    population_size: usize,
    generations: usize,
    candidate_length: usize,
    crossover_probability: f64,
    mutation_probability: f64,
    rng: StdRng,
    population: Vec<Individual>,
    hall_of_fame: Option<(Individual, usize)>,
    logbook: Vec<GenerationStats>,
    state: OptimizerState,
}

impl<E: Evaluate> Optimizer<E> {
    /// Tournament selection, blend crossover and gaussian mutation configured from `config`
    pub fn from_config(evaluator: E, config: &CalibrationConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Optimizer::new(
            evaluator,
            TournamentSelection::new(config.tournament_size),
            BlendCrossover::new(config.blend_alpha),
            GaussianMutation::new(config.mutation_mu, config.mutation_sigma, config.gene_mutation_probability)?,
            config,
            rng,
        )
    }
}

impl<E, S, C, M> Optimizer<E, S, C, M>
where
    E: Evaluate,
    S: Selection,
    C: Crossover,
    M: Mutation,
{
    pub fn new(evaluator: E, select: S, mate: C, mutate: M, config: &CalibrationConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            evaluator,
            select,
            mate,
            mutate,
            population_size: config.population_size,
            generations: config.generations,
            candidate_length: config.candidate_length,
            crossover_probability: config.crossover_probability,
            mutation_probability: config.mutation_probability,
            rng,
            population: Vec::new(),
            hall_of_fame: None,
            logbook: Vec::with_capacity(config.generations + 1),
            state: OptimizerState::Initialized,
        })
    }

    pub fn state(&self) -> OptimizerState {
        self.state
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    pub fn logbook(&self) -> &[GenerationStats] {
        &self.logbook
    }

    /// Best candidate seen so far, if anything has been scored yet
    pub fn best(&self) -> Option<&Individual> {
        self.hall_of_fame.as_ref().map(|(ind, _)| ind)
    }

    /// Advances by one generation (the first call creates and scores generation zero).
    pub fn step(&mut self) -> Result<OptimizerState> {
        self.state = match self.state {
            OptimizerState::Initialized => {
                self.initialize()?;

                OptimizerState::Evolving { generation: 0 }
            },
            OptimizerState::Evolving { generation } => {
                let next = generation + 1;

                self.evolve(next)?;

                if next >= self.generations {
                    OptimizerState::Terminated
                } else {
                    OptimizerState::Evolving { generation: next }
                }
            },
            OptimizerState::Terminated => OptimizerState::Terminated,
        };

        Ok(self.state)
    }

    /// Runs every remaining generation. Any evaluation failure aborts the run.
    pub fn run(mut self) -> Result<Calibration> {
        info!(
            population = self.population_size,
            generations = self.generations,
            "starting evolution"
        );

        while self.step()? != OptimizerState::Terminated {}

        let (best, best_generation) = self
            .hall_of_fame
            .take()
            .ok_or_else(|| Error::OptimizerConfig("run ended without scoring a candidate".into()))?;
        let final_best = best_of(&self.population)
            .cloned()
            .ok_or_else(|| Error::OptimizerConfig("run ended with an empty population".into()))?;

        info!(fitness = ?best.fitness, best_generation, "evolution finished");

        Ok(Calibration {
            best,
            best_generation,
            final_best,
            final_population: self.population,
            logbook: self.logbook,
        })
    }

    fn initialize(&mut self) -> Result<()> {
        let rng = &mut self.rng;

        self.population = (0..self.population_size)
            .map(|_| Individual::new((0..self.candidate_length).map(|_| rng.random::<f64>()).collect()))
            .collect();

        self.record(0)
    }

    fn evolve(&mut self, generation: usize) -> Result<()> {
        let mut offspring = self.select.select(&self.population, self.population_size, &mut self.rng)?;

        for pair in offspring.chunks_exact_mut(2) {
            if self.rng.random::<f64>() < self.crossover_probability {
                let (left, right) = pair.split_at_mut(1);

                self.mate.mate(&mut left[0], &mut right[0], &mut self.rng)?;
            }
        }

        for individual in offspring.iter_mut() {
            if self.rng.random::<f64>() < self.mutation_probability {
                self.mutate.mutate(individual, &mut self.rng)?;
            }
        }

        if let Some(bad) = offspring.iter().find(|ind| ind.len() != self.candidate_length) {
            return Err(Error::MalformedCandidate(format!(
                "operators produced a candidate of {} genes, expected {}",
                bad.len(),
                self.candidate_length
            )));
        }

        self.population = offspring;

        self.record(generation)
    }

    /// Scores every invalidated individual, then updates the hall of fame and logbook
    fn record(&mut self, generation: usize) -> Result<()> {
        let mut evaluations = 0;

        for individual in self.population.iter_mut().filter(|ind| !ind.is_scored()) {
            let fitness = self.evaluator.evaluate(&individual.genes)?;

            if fitness.is_nan() {
                return Err(Error::MalformedCandidate(format!(
                    "candidate {individual} scored a NaN fitness"
                )));
            }

            individual.fitness = Some(fitness);
            evaluations += 1;
        }

        if let Some(best) = best_of(&self.population) {
            let improved = match &self.hall_of_fame {
                None => true,
                Some((champion, _)) => best.fitness < champion.fitness,
            };

            if improved {
                debug!(generation, fitness = ?best.fitness, "new best candidate");
                self.hall_of_fame = Some((best.clone(), generation));
            }
        }

        let stats = GenerationStats::from_population(generation, evaluations, &self.population)
            .ok_or_else(|| Error::OptimizerConfig("cannot summarise an empty population".into()))?;

        info!(
            generation = stats.generation,
            nevals = stats.evaluations,
            avg = stats.avg,
            std = stats.std,
            min = stats.min,
            max = stats.max,
            "generation scored"
        );
        self.logbook.push(stats);

        Ok(())
    }
}

/// First individual with the lowest fitness
fn best_of(population: &[Individual]) -> Option<&Individual> {
    population.iter().filter(|ind| ind.is_scored()).fold(None, |best, ind| match best {
        Some(b) if b.fitness <= ind.fitness => Some(b),
        _ => Some(ind),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::fitness::GeneBinding;

    /// Distance of the genes from a target point
    struct Sphere(f64);

    impl Evaluate for Sphere {
        fn evaluate(&self, genes: &[f64]) -> Result<f64> {
            Ok(genes.iter().map(|g| (g - self.0).powi(2)).sum())
        }
    }

    /// Fails once it has been called `limit` times
    struct Flaky {
        calls: Cell<usize>,
        limit: usize,
    }

    impl Evaluate for Flaky {
        fn evaluate(&self, _genes: &[f64]) -> Result<f64> {
            self.calls.set(self.calls.get() + 1);

            if self.calls.get() > self.limit {
                return Err(Error::NoRuleFired("predicted_arrival".into()));
            }

            Ok(1.)
        }
    }

    fn seeded(seed: u64) -> CalibrationConfig {
        CalibrationConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_state_machine() {
        let mut optimizer = Optimizer::from_config(
            Sphere(0.),
            &CalibrationConfig {
                generations: 2,
                ..seeded(1)
            },
        )
        .unwrap();

        assert_eq!(optimizer.state(), OptimizerState::Initialized);
        assert!(optimizer.best().is_none());
        assert_eq!(optimizer.step(), Ok(OptimizerState::Evolving { generation: 0 }));
        assert_eq!(optimizer.population().len(), 10);
        assert!(optimizer.population().iter().all(|ind| ind.is_scored()));
        assert!(optimizer
            .population()
            .iter()
            .flat_map(|ind| &ind.genes)
            .all(|g| (0. ..1.).contains(g)));
        assert_eq!(optimizer.logbook()[0].evaluations, 10);
        assert_eq!(optimizer.step(), Ok(OptimizerState::Evolving { generation: 1 }));
        assert_eq!(optimizer.step(), Ok(OptimizerState::Terminated));
        assert_eq!(optimizer.step(), Ok(OptimizerState::Terminated));
        assert_eq!(optimizer.logbook().len(), 3);
    }

    #[test]
    fn test_same_seed_same_run() {
        let a = Optimizer::from_config(Sphere(0.3), &seeded(99)).unwrap().run().unwrap();
        let b = Optimizer::from_config(Sphere(0.3), &seeded(99)).unwrap().run().unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_best_never_worsens() {
        for seed in 0..5 {
            let run = Optimizer::from_config(Sphere(0.7), &seeded(seed)).unwrap().run().unwrap();
            let best = run.best.fitness.unwrap();

            assert_eq!(run.logbook.len(), 11);
            assert!(best <= run.logbook[0].min);
            assert!(run.logbook.iter().all(|stats| best <= stats.min));
            assert!(best <= run.final_best.fitness.unwrap());
            assert_eq!(run.logbook[run.best_generation].min, best);
        }
    }

    #[test]
    fn test_gene_length_is_fixed() {
        let config = CalibrationConfig {
            crossover_probability: 1.,
            mutation_probability: 1.,
            gene_mutation_probability: 1.,
            generations: 5,
            ..seeded(4)
        };
        let run = Optimizer::from_config(Sphere(0.), &config).unwrap().run().unwrap();

        assert_eq!(run.final_population.len(), 10);
        assert!(run.final_population.iter().all(|ind| ind.len() == 5));
        // every offspring was touched, so every one was re-scored
        assert!(run.logbook[1..].iter().all(|stats| stats.evaluations == 10));
    }

    #[test]
    fn test_untouched_offspring_keep_their_fitness() {
        let config = CalibrationConfig {
            crossover_probability: 0.,
            mutation_probability: 0.,
            ..seeded(8)
        };
        let run = Optimizer::from_config(Sphere(0.), &config).unwrap().run().unwrap();

        assert!(run.logbook[1..].iter().all(|stats| stats.evaluations == 0));
    }

    #[test]
    fn test_evaluation_failure_aborts_run() {
        let flaky = Flaky {
            calls: Cell::new(0),
            limit: 12,
        };
        let config = CalibrationConfig {
            crossover_probability: 1.,
            ..seeded(2)
        };

        assert_eq!(
            Optimizer::from_config(flaky, &config).unwrap().run().err(),
            Some(Error::NoRuleFired("predicted_arrival".into()))
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = CalibrationConfig {
            population_size: 0,
            ..Default::default()
        };

        assert!(matches!(
            Optimizer::from_config(Sphere(0.), &config),
            Err(Error::OptimizerConfig(_))
        ));

        let config = CalibrationConfig {
            binding: GeneBinding::Breakpoints,
            candidate_length: 3,
            ..Default::default()
        };

        assert!(Optimizer::from_config(Sphere(0.), &config).is_err());
    }
}
