//! Core data structures for the Evolve simulation.

pub mod environment;
pub mod genome;
pub mod organism;
