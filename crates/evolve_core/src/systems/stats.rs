use crate::environment::Environment;
use evolve_data::{Organism, PopulationStats};
use std::collections::HashSet;

pub struct StatsContext<'a> {
    pub stats: &'a mut PopulationStats,
    pub population: &'a [Organism],
    pub environment: &'a Environment,
    pub born: usize,
    pub died: usize,
}

/// Recomputes the per-tick aggregates and folds this tick's births and
/// deaths into the running totals.
pub fn update_population_stats(ctx: StatsContext<'_>) {
    let stats = ctx.stats;
    stats.born_this_tick = ctx.born;
    stats.died_this_tick = ctx.died;
    stats.total_born += ctx.born as u64;
    stats.total_died += ctx.died as u64;

    stats.population = ctx.population.len();
    stats.food_count = ctx.environment.food.len();
    stats.toxin_count = ctx.environment.toxins.len();
    stats.temperature = ctx.environment.temperature;
    stats.tick = ctx.environment.time;
    stats.generation = ctx.environment.generation;
    stats.max_lineage_depth = ctx
        .population
        .iter()
        .map(|o| o.lineage.generation)
        .max()
        .unwrap_or(0);

    if ctx.population.is_empty() {
        stats.avg_size = 0.0;
        stats.avg_speed = 0.0;
        stats.avg_energy = 0.0;
        stats.species_count = 0;
        return;
    }

    let n = ctx.population.len() as f64;
    let (size, speed, energy) = ctx.population.iter().fold((0.0, 0.0, 0.0), |acc, o| {
        (
            acc.0 + o.genome.size,
            acc.1 + o.genome.speed,
            acc.2 + o.metabolism.energy,
        )
    });
    stats.avg_size = size / n;
    stats.avg_speed = speed / n;
    stats.avg_energy = energy / n;
    stats.species_count = ctx
        .population
        .iter()
        .map(|o| o.lineage.species)
        .collect::<HashSet<_>>()
        .len();
}
