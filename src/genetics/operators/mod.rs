pub mod crossover;
pub mod mutation;
pub mod selection;

pub use crossover::{BlendCrossover, Crossover};
pub use mutation::{GaussianMutation, Mutation};
pub use selection::{Selection, TournamentSelection};
