use crate::config::AppConfig;
use crate::genome::GenomeLogic;
use crate::spatial;
use crate::systems::behavior::{self, Perception};
use evolve_data::{Food, Gene, Organism};
use rand::Rng;

/// Stress from temperature deviation plus the toxins the organism senses.
#[must_use]
pub fn environmental_stress(
    organism: &Organism,
    temperature: f64,
    toxins_sensed: usize,
    config: &AppConfig,
) -> f64 {
    let m = &config.metabolism;
    let resistance = organism.genome.effective(Gene::ToxinResistance, config);
    let thermal = (temperature - m.temperature_optimum).abs() * m.temperature_stress_factor;
    let toxic = toxins_sensed as f64 * (1.0 - resistance) * m.toxin_damage_factor;
    thermal + toxic
}

/// Energy burned this tick. A near-zero efficiency multiplies the cost
/// instead of dividing by it.
#[must_use]
pub fn energy_consumption(organism: &Organism, stress: f64, config: &AppConfig) -> f64 {
    let m = &config.metabolism;
    let size = organism.genome.effective(Gene::Size, config);
    let base = m.metabolic_rate_base + size * m.size_cost_factor + stress * m.stress_impact_multiplier;
    let efficiency = organism.genome.energy_efficiency;
    if efficiency.is_finite() && efficiency > m.efficiency_epsilon {
        base / efficiency
    } else {
        base * m.inefficiency_penalty
    }
}

/// Advances one organism by a tick: ageing, energy burn, steering, motion.
pub fn update_organism<R: Rng>(
    organism: &mut Organism,
    perception: &Perception<'_>,
    temperature: f64,
    config: &AppConfig,
    rng: &mut R,
) {
    organism.metabolism.age += 1;
    organism.metabolism.reproduction_cooldown =
        organism.metabolism.reproduction_cooldown.saturating_sub(1);

    let stress = environmental_stress(organism, temperature, perception.toxins.len(), config);
    organism.metabolism.energy -= energy_consumption(organism, stress, config);

    behavior::decide(organism, perception, config, rng);

    let physics = &mut organism.physics;
    physics.x = spatial::wrap(physics.x + physics.vx, config.world.width);
    physics.y = spatial::wrap(physics.y + physics.vy, config.world.height);
    physics.vx *= config.behavior.damping;
    physics.vy *= config.behavior.damping;

    organism.metabolism.energy = organism.metabolism.energy.min(organism.metabolism.max_energy);
}

#[must_use]
pub fn can_eat(organism: &Organism, food: &Food, config: &AppConfig) -> bool {
    let reach = organism.genome.effective(Gene::Size, config) + config.metabolism.eat_margin;
    spatial::distance_sq((organism.physics.x, organism.physics.y), (food.x, food.y)) < reach * reach
}

/// Credits one food item, capped at `max_energy`.
pub fn feed(organism: &mut Organism, config: &AppConfig) {
    let m = &mut organism.metabolism;
    m.energy = (m.energy + config.metabolism.food_energy_gain).min(m.max_energy);
}
