use crate::config::AppConfig;
use crate::genome::GenomeLogic;
use evolve_data::{DeathCause, Gene, Genome, Lineage, Metabolism, Organism, Physics};
use rand::Rng;
use uuid::Uuid;

/// Builds an organism at rest. Species and reproduction threshold are
/// derived here once and never recomputed.
pub fn create_organism_with_rng<R: Rng>(
    x: f64,
    y: f64,
    genome: Genome,
    energy: f64,
    tick: u64,
    config: &AppConfig,
    rng: &mut R,
) -> Organism {
    let max_energy = config.metabolism.max_energy;
    let threshold_factor = genome.effective(Gene::ReproductionThreshold, config);
    Organism {
        id: Uuid::from_u128(rng.gen::<u128>()),
        parent_id: None,
        physics: Physics {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
        },
        metabolism: Metabolism {
            energy: energy.min(max_energy),
            max_energy,
            age: 0,
            reproduction_cooldown: 0,
            reproduction_threshold: max_energy * threshold_factor,
        },
        lineage: Lineage {
            species: genome.species(),
            generation: 0,
            offspring_count: 0,
            birth_tick: tick,
        },
        genome,
    }
}

/// Founding member of the initial population: random genome, 75% energy.
pub fn create_founder_with_rng<R: Rng>(
    x: f64,
    y: f64,
    config: &AppConfig,
    rng: &mut R,
) -> Organism {
    let genome = Genome::random_with_rng(config, rng);
    let energy = config.metabolism.max_energy * config.metabolism.initial_energy_factor;
    create_organism_with_rng(x, y, genome, energy, 0, config, rng)
}

/// Founder at a uniform random position.
pub fn spawn_founder_with_rng<R: Rng>(config: &AppConfig, rng: &mut R) -> Organism {
    let x = rng.gen::<f64>() * config.world.width;
    let y = rng.gen::<f64>() * config.world.height;
    create_founder_with_rng(x, y, config, rng)
}

#[must_use]
pub fn death_cause(organism: &Organism, config: &AppConfig) -> Option<DeathCause> {
    if organism.metabolism.energy <= 0.0 {
        Some(DeathCause::Starvation)
    } else if organism.metabolism.age as f64 > organism.genome.effective(Gene::Lifespan, config) {
        Some(DeathCause::OldAge)
    } else {
        None
    }
}

#[inline]
#[must_use]
pub fn is_dead(organism: &Organism, config: &AppConfig) -> bool {
    death_cause(organism, config).is_some()
}
