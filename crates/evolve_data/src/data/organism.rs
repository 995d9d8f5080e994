use super::genome::Genome;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position and velocity of an organism in world units.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Physics {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

/// Energy budget and reproductive timers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Metabolism {
    pub energy: f64,
    pub max_energy: f64,
    /// Ticks alive.
    pub age: u64,
    /// Ticks left before the organism may reproduce again.
    pub reproduction_cooldown: u32,
    /// Energy required to reproduce. Fixed at birth from the genome.
    pub reproduction_threshold: f64,
}

/// Ancestry bookkeeping. `species` is fixed at birth from the genome.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lineage {
    pub species: u8,
    pub generation: u32,
    pub offspring_count: u32,
    pub birth_tick: u64,
}

/// A single simulated agent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Organism {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub physics: Physics,
    pub metabolism: Metabolism,
    pub lineage: Lineage,
    pub genome: Genome,
}
