//! # Evolve
//!
//! Host application for the Evolve artificial-life engine. The simulation
//! itself lives in `evolve_core`; this crate drives it (run, pause, reset,
//! headless batches) and exports statistics and snapshots.

pub mod app;

pub use evolve_core::config::AppConfig;
