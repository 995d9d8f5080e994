//! # Evolve Data
//!
//! Plain data types shared by the simulation engine and its hosts.
//! Nothing here carries simulation logic; see `evolve_core` for the rules
//! that operate on these values.

pub mod data;

pub use data::environment::{
    DeathCause, Food, LiveEvent, Particle, PopulationStats, Toxin,
};
pub use data::genome::{Gene, Genome};
pub use data::organism::{Lineage, Metabolism, Organism, Physics};
