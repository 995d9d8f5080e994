use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A consumable food pellet.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Food {
    pub x: f64,
    pub y: f64,
    /// Ticks since the pellet spawned.
    pub age: u32,
}

impl Food {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, age: 0 }
    }
}

/// A toxic hazard. Organisms sensing it pay an energy penalty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Toxin {
    pub x: f64,
    pub y: f64,
    pub age: u32,
}

impl Toxin {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, age: 0 }
    }
}

/// Ambient drifting particle. Purely decorative.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Remaining ticks before the particle disappears.
    pub life: u32,
    pub hue: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
/// Aggregated population statistics, recomputed at the end of every tick.
pub struct PopulationStats {
    /// Number of living organisms.
    pub population: usize,
    /// Mean genome size across living organisms.
    pub avg_size: f64,
    /// Mean genome speed across living organisms.
    pub avg_speed: f64,
    /// Mean current energy across living organisms.
    pub avg_energy: f64,
    /// Number of distinct species ids present.
    pub species_count: usize,
    /// Cumulative births since initialisation.
    pub total_born: u64,
    /// Cumulative deaths since initialisation.
    pub total_died: u64,
    pub born_this_tick: usize,
    pub died_this_tick: usize,
    /// Deepest generation among living organisms.
    pub max_lineage_depth: u32,
    pub food_count: usize,
    pub toxin_count: usize,
    pub temperature: f64,
    pub tick: u64,
    pub generation: u64,
}

/// Why an organism was removed from the population.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Energy reached zero.
    Starvation,
    /// Age exceeded the genome lifespan.
    OldAge,
}

/// Discrete events produced by a tick, for hosts that log or display them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum LiveEvent {
    Birth {
        id: Uuid,
        parent_id: Uuid,
        species: u8,
        tick: u64,
    },
    Death {
        id: Uuid,
        age: u64,
        cause: DeathCause,
        tick: u64,
    },
    Extinction {
        tick: u64,
    },
}
