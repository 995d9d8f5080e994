//! Genome generation, classification and bounds.
//!
//! Three nested bands exist per gene:
//! - the *generation* range random genomes are drawn from,
//! - the *tolerance* band a single mutation step is clamped into,
//! - the *safety* band every genome is forced into after mutation.

use crate::config::AppConfig;
use evolve_data::{Gene, Genome};
use rand::Rng;

/// Number of distinct species ids.
pub const SPECIES_COUNT: u8 = 8;

/// `[min, max]` a freshly generated gene is drawn from.
#[must_use]
pub fn generation_bounds(gene: Gene, config: &AppConfig) -> (f64, f64) {
    let g = &config.genome;
    match gene {
        Gene::Size => (g.size_min, g.size_max),
        Gene::Speed => (g.speed_min, g.speed_max),
        Gene::EnergyEfficiency => (g.energy_efficiency_min, g.energy_efficiency_max),
        Gene::ReproductionThreshold => {
            (g.reproduction_threshold_min, g.reproduction_threshold_max)
        }
        Gene::ReproductionSpeed => (g.reproduction_speed_min, g.reproduction_speed_max),
        Gene::Lifespan => (g.lifespan_base, g.lifespan_base + g.lifespan_random_add),
        Gene::Aggressiveness => (0.0, g.aggressiveness_max),
        Gene::Sociability => (0.0, g.sociability_max),
        Gene::ToxinResistance => (g.toxin_resistance_min, g.toxin_resistance_max),
        Gene::SensorRange => (g.sensor_range_min, g.sensor_range_max),
        Gene::Hue => (0.0, 360.0),
    }
}

/// Band a mutated gene is clamped into. Wider than the generation range so
/// lineages can drift past their founders.
#[must_use]
pub fn tolerance_band(gene: Gene, config: &AppConfig) -> (f64, f64) {
    let evo = &config.evolution;
    match gene {
        Gene::Size
        | Gene::Speed
        | Gene::EnergyEfficiency
        | Gene::ReproductionThreshold
        | Gene::ReproductionSpeed
        | Gene::ToxinResistance
        | Gene::SensorRange => {
            let (min, max) = generation_bounds(gene, config);
            (min * evo.tolerance_low, max * evo.tolerance_high)
        }
        Gene::Lifespan => (
            config.genome.lifespan_base * evo.lifespan_floor_factor,
            f64::INFINITY,
        ),
        Gene::Aggressiveness | Gene::Sociability => (0.0, 1.0),
        Gene::Hue => (0.0, 360.0),
    }
}

/// Absolute band every gene is forced into once mutation is done.
#[must_use]
pub fn safety_band(gene: Gene, config: &AppConfig) -> (f64, f64) {
    let evo = &config.evolution;
    match gene {
        Gene::Size
        | Gene::Speed
        | Gene::ReproductionThreshold
        | Gene::ToxinResistance
        | Gene::SensorRange => {
            let (min, max) = generation_bounds(gene, config);
            (min * evo.safety_low, max * evo.safety_high)
        }
        Gene::EnergyEfficiency | Gene::ReproductionSpeed => {
            let (_, max) = generation_bounds(gene, config);
            (evo.divisor_floor, max * evo.safety_high)
        }
        Gene::Lifespan => {
            let (base, max) = generation_bounds(gene, config);
            (
                base * evo.lifespan_safety_floor,
                max * evo.lifespan_safety_ceiling,
            )
        }
        Gene::Aggressiveness | Gene::Sociability => (0.0, 1.0),
        Gene::Hue => (0.0, 360.0),
    }
}

pub trait GenomeLogic {
    /// Draws every gene uniformly from its generation range.
    fn random_with_rng<R: Rng>(config: &AppConfig, rng: &mut R) -> Self;

    /// Coarse class id in `[0, 8)`.
    ///
    /// Distant genomes can share an id; the grouping only steers flocking and
    /// mate choice.
    fn species(&self) -> u8;

    /// Gene value safe for arithmetic: non-finite values read as the
    /// generation minimum.
    fn effective(&self, gene: Gene, config: &AppConfig) -> f64;

    /// Forces every gene into its safety band, replacing non-finite values
    /// with the generation minimum first.
    fn sanitize(&mut self, config: &AppConfig);
}

impl GenomeLogic for Genome {
    fn random_with_rng<R: Rng>(config: &AppConfig, rng: &mut R) -> Self {
        let mut genome = Genome {
            size: 0.0,
            speed: 0.0,
            energy_efficiency: 0.0,
            reproduction_threshold: 0.0,
            reproduction_speed: 0.0,
            lifespan: 0.0,
            aggressiveness: 0.0,
            sociability: 0.0,
            toxin_resistance: 0.0,
            sensor_range: 0.0,
            hue: 0.0,
        };
        for gene in Gene::ALL {
            let (min, max) = generation_bounds(gene, config);
            // Half-open draw; also tolerates min == max.
            genome.set(gene, min + rng.gen::<f64>() * (max - min));
        }
        genome
    }

    fn species(&self) -> u8 {
        let key = self.size + self.speed * 5.0 + self.aggressiveness * 10.0;
        if !key.is_finite() {
            return 0;
        }
        let class = key.rem_euclid(f64::from(SPECIES_COUNT)).floor() as u8;
        class.min(SPECIES_COUNT - 1)
    }

    fn effective(&self, gene: Gene, config: &AppConfig) -> f64 {
        let value = self.get(gene);
        if value.is_finite() {
            value
        } else {
            generation_bounds(gene, config).0
        }
    }

    fn sanitize(&mut self, config: &AppConfig) {
        for gene in Gene::ALL {
            let value = self.effective(gene, config);
            let safe = match gene {
                Gene::Hue => {
                    // rem_euclid can round up to exactly 360 for tiny negatives.
                    let hue = value.rem_euclid(360.0);
                    if hue >= 360.0 {
                        0.0
                    } else {
                        hue
                    }
                }
                _ => {
                    let (lo, hi) = safety_band(gene, config);
                    value.clamp(lo, hi)
                }
            };
            self.set(gene, safe);
        }
    }
}
