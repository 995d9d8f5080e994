//! Population ownership and the tick scheduler.

use crate::config::AppConfig;
use crate::environment::Environment;
use crate::genome::GenomeLogic;
use crate::lifecycle;
use crate::metrics::Metrics;
use crate::snapshot::{NeighborView, OrganismSnapshot, WorldSnapshot};
use crate::spatial;
use crate::systems::behavior::Perception;
use crate::systems::stats::{self, StatsContext};
use crate::systems::{metabolism, reproduction};
use evolve_data::{Gene, Genome, LiveEvent, Organism, PopulationStats};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::time::Instant;
use uuid::Uuid;

const SEED_MIX: u64 = 0x517C_C1B7_2722_0A95;

/// Per-organism RNG seed for one tick. Depends only on the tick seed and
/// the organism id, so update order and thread count do not matter.
fn organism_seed(tick_seed: u64, id: Uuid) -> u64 {
    let u = id.as_u128();
    let mut seed = tick_seed.wrapping_mul(SEED_MIX);
    seed ^= (u >> 64) as u64;
    seed = seed.wrapping_mul(SEED_MIX);
    seed ^ u as u64
}

fn step_one(
    index: usize,
    organism: &mut Organism,
    neighbors: &[NeighborView],
    env: &Environment,
    config: &AppConfig,
    tick_seed: u64,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(organism_seed(tick_seed, organism.id));
    let perception =
        Perception::gather(organism, index, &env.food, &env.toxins, neighbors, config);
    metabolism::update_organism(organism, &perception, env.temperature, config, &mut rng);
}

/// Updates every organism in population order against a pre-tick snapshot.
#[cfg_attr(feature = "parallel", allow(dead_code))]
fn step_sequential(
    population: &mut [Organism],
    env: &Environment,
    config: &AppConfig,
    tick_seed: u64,
) {
    let neighbors = NeighborView::capture(population, config);
    population
        .iter_mut()
        .enumerate()
        .for_each(|(i, o)| step_one(i, o, &neighbors, env, config, tick_seed));
}

/// Same as [`step_sequential`], spread over the rayon pool.
#[cfg(feature = "parallel")]
fn step_parallel(
    population: &mut [Organism],
    env: &Environment,
    config: &AppConfig,
    tick_seed: u64,
) {
    let neighbors = NeighborView::capture(population, config);
    population
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, o)| step_one(i, o, &neighbors, env, config, tick_seed));
}

pub struct World {
    pub config: AppConfig,
    pub population: Vec<Organism>,
    pub stats: PopulationStats,
    pub metrics: Metrics,
    rng: ChaCha8Rng,
    extinction_reported: bool,
}

fn rng_for(config: &AppConfig) -> ChaCha8Rng {
    match config.world.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Builds a validated world and its environment: founders at uniform
/// positions, `food_target` food items, zeroed statistics.
pub fn initialize(config: AppConfig) -> anyhow::Result<(World, Environment)> {
    config.validate()?;
    let mut rng = rng_for(&config);

    let population: Vec<Organism> = (0..config.world.initial_population)
        .map(|_| lifecycle::spawn_founder_with_rng(&config, &mut rng))
        .collect();

    let mut env = Environment::new(&config);
    env.seed_food(config.world.food_target, &mut rng);

    tracing::info!(
        population = population.len(),
        food = env.food.len(),
        fingerprint = %config.fingerprint(),
        "World initialized"
    );

    let world = World {
        metrics: Metrics::new(config.world.log_interval),
        config,
        population,
        stats: PopulationStats::default(),
        rng,
        extinction_reported: false,
    };
    Ok((world, env))
}

impl World {
    /// World over a hand-placed population, with an RNG seeded from the
    /// config. Statistics start zeroed.
    pub fn with_population(config: AppConfig, population: Vec<Organism>) -> anyhow::Result<Self> {
        config.validate()?;
        anyhow::ensure!(
            population.len() <= config.world.max_population,
            "Population of {} exceeds max population {}",
            population.len(),
            config.world.max_population
        );
        Ok(Self {
            metrics: Metrics::new(config.world.log_interval),
            rng: rng_for(&config),
            config,
            population,
            stats: PopulationStats::default(),
            extinction_reported: false,
        })
    }

    /// Advances the simulation by one tick.
    ///
    /// An empty population leaves `env` untouched; the first such call
    /// reports [`LiveEvent::Extinction`].
    pub fn update(&mut self, env: &mut Environment) -> Vec<LiveEvent> {
        let start = Instant::now();
        let mut events = Vec::new();

        if self.population.is_empty() {
            self.report_extinction(env.time, &mut events);
            return events;
        }

        env.update(&self.config, &mut self.rng);
        let tick = env.time;
        let tick_seed: u64 = self.rng.gen();

        self.pass_organisms(env, tick_seed);
        self.pass_feeding(env);
        let newborns = self.pass_reproduction(tick, &mut events);
        let died = self.pass_removal(tick, &mut events);
        let born = newborns.len();
        self.population.extend(newborns);

        if tick.is_multiple_of(self.config.world.generation_interval) && !self.population.is_empty() {
            env.generation += 1;
        }

        stats::update_population_stats(StatsContext {
            stats: &mut self.stats,
            population: &self.population,
            environment: env,
            born,
            died,
        });

        self.metrics.record_births(born);
        self.metrics.record_deaths(died);
        self.metrics
            .record_tick(start.elapsed(), self.population.len(), env.food.len());

        if self.population.is_empty() {
            self.report_extinction(tick, &mut events);
        }
        events
    }

    fn report_extinction(&mut self, tick: u64, events: &mut Vec<LiveEvent>) {
        if !self.extinction_reported {
            self.extinction_reported = true;
            tracing::warn!(tick, total_died = self.stats.total_died, "Population extinct");
            events.push(LiveEvent::Extinction { tick });
        }
    }

    fn pass_organisms(&mut self, env: &Environment, tick_seed: u64) {
        #[cfg(feature = "parallel")]
        step_parallel(&mut self.population, env, &self.config, tick_seed);

        #[cfg(not(feature = "parallel"))]
        step_sequential(&mut self.population, env, &self.config, tick_seed);
    }

    /// Food in spawn order; each item goes to the first living organism in
    /// reach.
    fn pass_feeding(&mut self, env: &mut Environment) {
        let config = &self.config;
        let population = &mut self.population;
        env.food.retain(|food| {
            let eater = population.iter_mut().find(|o| {
                !lifecycle::is_dead(o, config) && metabolism::can_eat(o, food, config)
            });
            match eater {
                Some(o) => {
                    metabolism::feed(o, config);
                    false
                }
                None => true,
            }
        });
    }

    fn pick_mate(&mut self, index: usize) -> Option<Genome> {
        let parent = &self.population[index];
        let origin = (parent.physics.x, parent.physics.y);
        let range = parent.genome.effective(Gene::SensorRange, &self.config)
            * self.config.reproduction.mate_range_factor;
        let range_sq = range * range;
        let species = parent.lineage.species;

        let candidates: Vec<usize> = self
            .population
            .iter()
            .enumerate()
            .filter(|(j, o)| {
                *j != index
                    && o.lineage.species == species
                    && !lifecycle::is_dead(o, &self.config)
                    && spatial::distance_sq(origin, (o.physics.x, o.physics.y)) < range_sq
            })
            .map(|(j, _)| j)
            .collect();

        if candidates.is_empty() {
            return None;
        }
        let pick = candidates[self.rng.gen_range(0..candidates.len())];
        Some(self.population[pick].genome)
    }

    fn pass_reproduction(&mut self, tick: u64, events: &mut Vec<LiveEvent>) -> Vec<Organism> {
        let mut newborns = Vec::new();
        let cap = self.config.world.max_population;

        for i in 0..self.population.len() {
            if self.population.len() + newborns.len() >= cap {
                break;
            }
            let parent = &self.population[i];
            if lifecycle::is_dead(parent, &self.config)
                || !reproduction::can_reproduce(parent, &self.config)
            {
                continue;
            }

            let mate = self.pick_mate(i);
            let child = reproduction::reproduce(
                &mut self.population[i],
                mate.as_ref(),
                tick,
                &self.config,
                &mut self.rng,
            );
            if let Some(child) = child {
                tracing::debug!(
                    id = %child.id,
                    parent = %self.population[i].id,
                    species = child.lineage.species,
                    generation = child.lineage.generation,
                    "Birth"
                );
                events.push(LiveEvent::Birth {
                    id: child.id,
                    parent_id: self.population[i].id,
                    species: child.lineage.species,
                    tick,
                });
                newborns.push(child);
            }
        }
        newborns
    }

    fn pass_removal(&mut self, tick: u64, events: &mut Vec<LiveEvent>) -> usize {
        let config = &self.config;
        let mut died = 0;
        self.population
            .retain(|o| match lifecycle::death_cause(o, config) {
                Some(cause) => {
                    tracing::debug!(id = %o.id, age = o.metabolism.age, ?cause, "Death");
                    events.push(LiveEvent::Death {
                        id: o.id,
                        age: o.metabolism.age,
                        cause,
                        tick,
                    });
                    died += 1;
                    false
                }
                None => true,
            });
        died
    }

    #[must_use]
    pub fn stats(&self) -> &PopulationStats {
        &self.stats
    }

    #[must_use]
    pub fn population(&self) -> &[Organism] {
        &self.population
    }

    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.population.is_empty()
    }

    /// Read-only view for renderers.
    #[must_use]
    pub fn snapshot(&self, env: &Environment) -> WorldSnapshot {
        WorldSnapshot {
            tick: env.time,
            generation: env.generation,
            temperature: env.temperature,
            width: env.width,
            height: env.height,
            organisms: self.population.iter().map(OrganismSnapshot::from).collect(),
            food: env.food.clone(),
            toxins: env.toxins.clone(),
            particles: env.particles.clone(),
            stats: self.stats.clone(),
        }
    }
}
