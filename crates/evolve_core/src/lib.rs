//! # Evolve Core
//!
//! The simulation engine for Evolve, an artificial-life sandbox in which
//! organisms carrying heritable genomes forage, flock, fight, breed and die
//! in a wrap-around 2D world.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Genome generation, species classification and mutation bounds
//! - Organism lifecycle (creation, ageing, death)
//! - Steering, metabolism and reproduction systems
//! - The food, toxin and temperature lifecycle of the environment
//! - The tick scheduler and population statistics
//!
//! ## Architecture
//!
//! - **Component-based organisms**: `Physics`, `Metabolism`, `Lineage`
//! - **System-based updates**: behaviour, metabolism, reproduction, stats
//! - **Snapshot perception**: every organism senses the same pre-tick state
//! - **Deterministic simulation**: seeded `ChaCha8Rng`, per-organism streams
//!   derived from a per-tick seed, so the optional `parallel` feature does
//!   not change results
//!
//! ## Example
//!
//! ```
//! use evolve_core::config::AppConfig;
//! use evolve_core::world;
//!
//! let mut config = AppConfig::default();
//! config.world.seed = Some(42);
//! let (mut world, mut env) = world::initialize(config).unwrap();
//! for _ in 0..10 {
//!     world.update(&mut env);
//! }
//! assert_eq!(world.stats().tick, 10);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Food, toxins, particles and temperature
pub mod environment;
/// Genome generation, species ids and gene bands
pub mod genome;
/// Organism creation and death
pub mod lifecycle;
/// Tick counters and logging setup
pub mod metrics;
/// Renderer snapshots, neighbour views and trail history
pub mod snapshot;
/// Proximity queries and toroidal wrapping
pub mod spatial;
/// Per-tick systems (behaviour, metabolism, reproduction, stats)
pub mod systems;
/// Population ownership and the tick scheduler
pub mod world;

pub use environment::Environment;
pub use genome::GenomeLogic;
pub use metrics::{init_logging, Metrics};
pub use world::{initialize, World};
