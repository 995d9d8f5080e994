//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every numeric constant the engine uses lives here;
//! a configuration is fixed for the lifetime of a run.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in the `Default` impls)
//! 2. `config.toml` file (overrides defaults, section by section)
//! 3. Command line flags of the host binary (seed, tick count)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 800.0
//! height = 600.0
//! initial_population = 50
//! seed = 42
//!
//! [metabolism]
//! food_energy_gain = 65.0
//!
//! [evolution]
//! mutation_rate = 0.06
//! ```

use crate::genome::{safety_band, tolerance_band};
use evolve_data::Gene;
use serde::{Deserialize, Serialize};

/// World-level simulation configuration.
///
/// Dimensions of the toroidal arena, population limits and run pacing.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub initial_population: usize,
    pub max_population: usize,
    /// Initial food count; food keeps spawning until 1.5x this value.
    pub food_target: usize,
    pub seed: Option<u64>,
    /// Ticks between increments of the coarse generation counter.
    pub generation_interval: u64,
    /// Ticks between progress log lines.
    pub log_interval: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            initial_population: 50,
            max_population: 500,
            food_target: 150,
            seed: None,
            generation_interval: 500,
            log_interval: 1000,
        }
    }
}

/// Generation ranges for every gene.
///
/// Random genomes draw each gene uniformly from `[min, max]`. Mutation
/// tolerance and safety bands are derived from these ranges.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GenomeConfig {
    pub size_min: f64,
    pub size_max: f64,
    pub speed_min: f64,
    pub speed_max: f64,
    pub energy_efficiency_min: f64,
    pub energy_efficiency_max: f64,
    pub reproduction_threshold_min: f64,
    pub reproduction_threshold_max: f64,
    pub reproduction_speed_min: f64,
    pub reproduction_speed_max: f64,
    pub lifespan_base: f64,
    pub lifespan_random_add: f64,
    pub aggressiveness_max: f64,
    pub sociability_max: f64,
    pub toxin_resistance_min: f64,
    pub toxin_resistance_max: f64,
    pub sensor_range_min: f64,
    pub sensor_range_max: f64,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            size_min: 3.0,
            size_max: 9.0,
            speed_min: 0.5,
            speed_max: 2.0,
            energy_efficiency_min: 0.7,
            energy_efficiency_max: 1.4,
            reproduction_threshold_min: 0.4,
            reproduction_threshold_max: 1.1,
            reproduction_speed_min: 0.8,
            reproduction_speed_max: 1.2,
            lifespan_base: 4500.0,
            lifespan_random_add: 2500.0,
            aggressiveness_max: 0.6,
            sociability_max: 1.0,
            toxin_resistance_min: 0.2,
            toxin_resistance_max: 0.8,
            sensor_range_min: 30.0,
            sensor_range_max: 80.0,
        }
    }
}

/// Energy balance of organisms.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MetabolismConfig {
    pub max_energy: f64,
    pub child_initial_energy: f64,
    /// Initial population members start at this fraction of max energy.
    pub initial_energy_factor: f64,
    pub metabolic_rate_base: f64,
    pub size_cost_factor: f64,
    pub stress_impact_multiplier: f64,
    pub temperature_optimum: f64,
    pub temperature_stress_factor: f64,
    pub toxin_damage_factor: f64,
    /// Efficiency at or below this value is not used as a divisor.
    pub efficiency_epsilon: f64,
    /// Consumption multiplier applied instead of dividing by a tiny efficiency.
    pub inefficiency_penalty: f64,
    pub food_energy_gain: f64,
    /// Added to the organism size to form its eat radius.
    pub eat_margin: f64,
}

impl Default for MetabolismConfig {
    fn default() -> Self {
        Self {
            max_energy: 120.0,
            child_initial_energy: 60.0,
            initial_energy_factor: 0.75,
            metabolic_rate_base: 0.08,
            size_cost_factor: 0.01,
            stress_impact_multiplier: 0.01,
            temperature_optimum: 0.5,
            temperature_stress_factor: 0.1,
            toxin_damage_factor: 0.01,
            efficiency_epsilon: 0.01,
            inefficiency_penalty: 5.0,
            food_energy_gain: 65.0,
            eat_margin: 4.0,
        }
    }
}

/// Steering weights of the decision policy.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BehaviorConfig {
    pub acceleration: f64,
    /// Targets closer than this are ignored by steering.
    pub steer_epsilon: f64,
    /// Velocity multiplier applied every tick.
    pub damping: f64,
    /// Top speed as a fraction of the speed gene.
    pub max_speed_factor: f64,
    /// Below this fraction of max energy an organism forages urgently.
    pub hunger_fraction: f64,
    pub forage_urgent_strength: f64,
    pub forage_strength: f64,
    pub toxin_avoid_strength: f64,
    pub social_threshold: f64,
    pub social_strength: f64,
    pub aggression_threshold: f64,
    pub pursue_strength: f64,
    pub flee_strength: f64,
    pub dominance_size_ratio: f64,
    pub dominance_energy_ratio: f64,
    pub threat_size_ratio: f64,
    pub explore_chance: f64,
    pub explore_impulse: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            acceleration: 0.08,
            steer_epsilon: 0.1,
            damping: 0.92,
            max_speed_factor: 0.6,
            hunger_fraction: 0.7,
            forage_urgent_strength: 1.5,
            forage_strength: 1.0,
            toxin_avoid_strength: 1.2,
            social_threshold: 0.6,
            social_strength: 0.3,
            aggression_threshold: 0.7,
            pursue_strength: 0.5,
            flee_strength: 0.7,
            dominance_size_ratio: 1.1,
            dominance_energy_ratio: 1.2,
            threat_size_ratio: 1.2,
            explore_chance: 0.12,
            explore_impulse: 0.35,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ReproductionConfig {
    pub base_cooldown: u32,
    pub min_age: u64,
    /// Fraction of max energy a parent pays per offspring.
    pub energy_cost_factor: f64,
    /// Chance of per-gene crossover when a mate is available.
    pub crossover_chance: f64,
    /// Offspring spawn at parent size plus this distance.
    pub offspring_spacing: f64,
    /// Mates are searched within this fraction of the sensor range.
    pub mate_range_factor: f64,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            base_cooldown: 200,
            min_age: 50,
            energy_cost_factor: 0.15,
            crossover_chance: 0.5,
            offspring_spacing: 10.0,
            mate_range_factor: 0.8,
        }
    }
}

/// Mutation operator parameters and the bands it clamps into.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EvolutionConfig {
    pub mutation_rate: f64,
    /// Full width of the uniform jitter, centred on zero.
    pub mutation_amount: f64,
    pub tolerance_low: f64,
    pub tolerance_high: f64,
    pub safety_low: f64,
    pub safety_high: f64,
    /// Lower safety bound of genes used as divisors.
    pub divisor_floor: f64,
    pub lifespan_jitter_fraction: f64,
    pub lifespan_floor_factor: f64,
    pub lifespan_safety_floor: f64,
    pub lifespan_safety_ceiling: f64,
    pub hue_jitter_scale: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.06,
            mutation_amount: 0.2,
            tolerance_low: 0.7,
            tolerance_high: 1.3,
            safety_low: 0.5,
            safety_high: 1.5,
            divisor_floor: 0.1,
            lifespan_jitter_fraction: 0.2,
            lifespan_floor_factor: 0.5,
            lifespan_safety_floor: 0.3,
            lifespan_safety_ceiling: 4.0,
            hue_jitter_scale: 40.0,
        }
    }
}

/// Resource spawning and climate.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub temperature_amplitude: f64,
    pub temperature_frequency: f64,
    pub food_abundance: f64,
    pub food_spawn_scale: f64,
    pub food_cap_factor: f64,
    pub food_lifetime: u32,
    pub toxicity: f64,
    pub toxin_spawn_scale: f64,
    pub toxin_lifetime: u32,
    pub particles_enabled: bool,
    pub particle_spawn_chance: f64,
    pub particle_life: u32,
    /// Full width of the uniform particle drift velocity.
    pub particle_drift: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            temperature_amplitude: 0.2,
            temperature_frequency: 0.0005,
            food_abundance: 0.8,
            food_spawn_scale: 0.10,
            food_cap_factor: 1.5,
            food_lifetime: 1500,
            toxicity: 0.05,
            toxin_spawn_scale: 0.015,
            toxin_lifetime: 300,
            particles_enabled: true,
            particle_spawn_chance: 0.3,
            particle_life: 100,
            particle_drift: 0.5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub genome: GenomeConfig,
    pub metabolism: MetabolismConfig,
    pub behavior: BehaviorConfig,
    pub reproduction: ReproductionConfig,
    pub evolution: EvolutionConfig,
    pub environment: EnvironmentConfig,
}

fn ensure_range(min: f64, max: f64, name: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        min.is_finite() && max.is_finite() && min <= max,
        "{name} range must be finite with min <= max"
    );
    Ok(())
}

fn ensure_probability(value: f64, name: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&value),
        "{name} must be in [0.0, 1.0]"
    );
    Ok(())
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    ///
    /// # Validation Rules
    /// - World dimensions must be positive and finite
    /// - Initial population must fit under the population cap (max 10000)
    /// - Every gene range must be ordered; genes used as divisors must be positive
    /// - Probabilities must be in [0.0, 1.0]
    pub fn validate(&self) -> anyhow::Result<()> {
        let w = &self.world;
        anyhow::ensure!(
            w.width.is_finite() && w.width > 0.0,
            "World width must be positive"
        );
        anyhow::ensure!(
            w.height.is_finite() && w.height > 0.0,
            "World height must be positive"
        );
        anyhow::ensure!(
            w.max_population <= 10000,
            "Max population too large (max 10000)"
        );
        anyhow::ensure!(
            w.initial_population <= w.max_population,
            "Initial population exceeds max population"
        );
        anyhow::ensure!(w.food_target <= 10000, "Food target too large (max 10000)");
        anyhow::ensure!(
            w.generation_interval > 0,
            "Generation interval must be positive"
        );
        anyhow::ensure!(w.log_interval > 0, "Log interval must be positive");

        let g = &self.genome;
        ensure_range(g.size_min, g.size_max, "Size")?;
        ensure_range(g.speed_min, g.speed_max, "Speed")?;
        ensure_range(
            g.energy_efficiency_min,
            g.energy_efficiency_max,
            "Energy efficiency",
        )?;
        ensure_range(
            g.reproduction_threshold_min,
            g.reproduction_threshold_max,
            "Reproduction threshold",
        )?;
        ensure_range(
            g.reproduction_speed_min,
            g.reproduction_speed_max,
            "Reproduction speed",
        )?;
        ensure_range(
            g.toxin_resistance_min,
            g.toxin_resistance_max,
            "Toxin resistance",
        )?;
        ensure_range(g.sensor_range_min, g.sensor_range_max, "Sensor range")?;
        anyhow::ensure!(g.size_min > 0.0, "Size min must be positive");
        anyhow::ensure!(
            g.energy_efficiency_min > 0.0,
            "Energy efficiency min must be positive"
        );
        anyhow::ensure!(
            g.reproduction_speed_min > 0.0,
            "Reproduction speed min must be positive"
        );
        anyhow::ensure!(g.lifespan_base > 0.0, "Lifespan base must be positive");
        anyhow::ensure!(
            g.lifespan_random_add >= 0.0,
            "Lifespan random add must be non-negative"
        );
        ensure_probability(g.aggressiveness_max, "Aggressiveness max")?;
        ensure_probability(g.sociability_max, "Sociability max")?;

        let m = &self.metabolism;
        anyhow::ensure!(m.max_energy > 0.0, "Max energy must be positive");
        anyhow::ensure!(
            m.child_initial_energy > 0.0 && m.child_initial_energy <= m.max_energy,
            "Child initial energy must be in (0, max_energy]"
        );
        ensure_probability(m.initial_energy_factor, "Initial energy factor")?;
        anyhow::ensure!(
            m.metabolic_rate_base >= 0.0,
            "Metabolic rate must be non-negative"
        );
        anyhow::ensure!(
            m.efficiency_epsilon > 0.0,
            "Efficiency epsilon must be positive"
        );
        anyhow::ensure!(
            m.food_energy_gain >= 0.0,
            "Food energy gain must be non-negative"
        );

        let b = &self.behavior;
        ensure_probability(b.damping, "Damping")?;
        ensure_probability(b.explore_chance, "Explore chance")?;
        anyhow::ensure!(
            b.max_speed_factor > 0.0,
            "Max speed factor must be positive"
        );

        let r = &self.reproduction;
        ensure_probability(r.energy_cost_factor, "Reproduction energy cost")?;
        ensure_probability(r.crossover_chance, "Crossover chance")?;
        anyhow::ensure!(
            r.mate_range_factor >= 0.0,
            "Mate range factor must be non-negative"
        );

        let e = &self.evolution;
        ensure_probability(e.mutation_rate, "Mutation rate")?;
        anyhow::ensure!(
            e.mutation_amount >= 0.0,
            "Mutation amount must be non-negative"
        );
        anyhow::ensure!(
            e.safety_low <= e.tolerance_low && e.tolerance_high <= e.safety_high,
            "Safety band must enclose the tolerance band"
        );
        anyhow::ensure!(e.divisor_floor > 0.0, "Divisor floor must be positive");
        anyhow::ensure!(
            e.tolerance_low <= e.tolerance_high,
            "Tolerance low must not exceed tolerance high"
        );
        // Mutation clamps into these bands, so an inverted one would panic.
        for gene in Gene::ALL {
            let (lo, hi) = tolerance_band(gene, self);
            anyhow::ensure!(
                lo <= hi,
                "{} tolerance band is inverted: [{lo}, {hi}]",
                gene.name()
            );
            let (lo, hi) = safety_band(gene, self);
            anyhow::ensure!(
                lo <= hi,
                "{} safety band is inverted: [{lo}, {hi}]",
                gene.name()
            );
        }

        let env = &self.environment;
        ensure_probability(env.food_abundance * env.food_spawn_scale, "Food spawn chance")?;
        ensure_probability(env.toxicity * env.toxin_spawn_scale, "Toxin spawn chance")?;
        ensure_probability(env.particle_spawn_chance, "Particle spawn chance")?;

        Ok(())
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Stable identifier of the simulation rules, independent of world size
    /// and seed.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.genome).as_bytes());
        hasher.update(format!("{:?}", self.metabolism).as_bytes());
        hasher.update(format!("{:?}", self.behavior).as_bytes());
        hasher.update(format!("{:?}", self.reproduction).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hasher.update(format!("{:?}", self.environment).as_bytes());
        hex::encode(hasher.finalize())
    }
}
