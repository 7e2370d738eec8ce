use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};
use crate::genetics::types::Individual;

/// Perturbs an individual in place.
pub trait Mutation {
    fn mutate(&self, individual: &mut Individual, rng: &mut dyn RngCore) -> Result<()>;
}

/// Adds `Normal(mu, sigma)` noise to each gene with probability `indpb`.
#[derive(Clone, Copy, Debug)]
pub struct GaussianMutation {
    noise: Normal<f64>,
    indpb: f64,
}

impl GaussianMutation {
    pub fn new(mu: f64, sigma: f64, indpb: f64) -> Result<Self> {
        let noise = Normal::new(mu, sigma)
            .map_err(|e| Error::OptimizerConfig(format!("gaussian mutation N({mu}, {sigma}): {e}")))?;

        if !(0. ..=1.).contains(&indpb) {
            return Err(Error::OptimizerConfig(format!(
                "per gene mutation probability must lie in [0, 1], got {indpb}"
            )));
        }

        Ok(Self { noise, indpb })
    }
}

impl Mutation for GaussianMutation {
    fn mutate(&self, individual: &mut Individual, rng: &mut dyn RngCore) -> Result<()> {
        for gene in individual.genes.iter_mut() {
            if rng.random::<f64>() < self.indpb {
                *gene += self.noise.sample(rng);
            }
        }

        individual.invalidate();

        Ok(())
    }
}
