use rand::{Rng, RngCore};

use crate::error::{Error, Result};
use crate::genetics::types::Individual;

/// Mates two individuals in place.
pub trait Crossover {
    fn mate(&self, a: &mut Individual, b: &mut Individual, rng: &mut dyn RngCore) -> Result<()>;
}

/// Blend crossover: each child gene is drawn on the line through both parents, up to
/// `alpha` times their distance beyond either parent.
#[derive(Clone, Copy, Debug)]
pub struct BlendCrossover {
    pub alpha: f64,
}

impl BlendCrossover {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }
}

impl Crossover for BlendCrossover {
    fn mate(&self, a: &mut Individual, b: &mut Individual, rng: &mut dyn RngCore) -> Result<()> {
        if a.len() != b.len() {
            return Err(Error::MalformedCandidate(format!(
                "cannot mate candidates of {} and {} genes",
                a.len(),
                b.len()
            )));
        }

        for (x1, x2) in a.genes.iter_mut().zip(b.genes.iter_mut()) {
            let gamma = (1. + 2. * self.alpha) * rng.random::<f64>() - self.alpha;
            let (p1, p2) = (*x1, *x2);

            *x1 = (1. - gamma) * p1 + gamma * p2;
            *x2 = gamma * p1 + (1. - gamma) * p2;
        }

        a.invalidate();
        b.invalidate();

        Ok(())
    }
}
