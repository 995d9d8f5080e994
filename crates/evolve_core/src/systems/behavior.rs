//! Steering decisions: foraging, toxin avoidance, flocking, aggression and
//! random exploration. Every rule adds to the velocity; nothing overwrites it.

use crate::config::{AppConfig, BehaviorConfig};
use crate::genome::GenomeLogic;
use crate::snapshot::NeighborView;
use crate::spatial::{self, Located};
use evolve_data::{Food, Gene, Organism, Physics, Toxin};
use rand::Rng;

/// What one organism can sense this tick, all within its sensor range.
#[derive(Debug, Default)]
pub struct Perception<'a> {
    pub food: Vec<&'a Food>,
    pub toxins: Vec<&'a Toxin>,
    /// Other organisms, as seen before the update pass began.
    pub neighbors: Vec<&'a NeighborView>,
}

impl<'a> Perception<'a> {
    /// Collects everything in range of `organism`. `index` is the
    /// organism's own slot in `neighbors` and is skipped.
    pub fn gather(
        organism: &Organism,
        index: usize,
        food: &'a [Food],
        toxins: &'a [Toxin],
        neighbors: &'a [NeighborView],
        config: &AppConfig,
    ) -> Self {
        let origin = (organism.physics.x, organism.physics.y);
        let range = organism.genome.effective(Gene::SensorRange, config);
        Self {
            food: spatial::find_nearby(food, origin, range),
            toxins: spatial::find_nearby(toxins, origin, range),
            neighbors: spatial::find_nearby(neighbors, origin, range)
                .into_iter()
                .filter(|n| n.index != index)
                .collect(),
        }
    }
}

fn steer(
    physics: &mut Physics,
    target: (f64, f64),
    speed: f64,
    strength: f64,
    sign: f64,
    config: &BehaviorConfig,
) {
    let dx = target.0 - physics.x;
    let dy = target.1 - physics.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist > config.steer_epsilon {
        let gain = sign * speed * strength * config.acceleration;
        physics.vx += dx / dist * gain;
        physics.vy += dy / dist * gain;
    }
}

/// Accelerates toward `target`. No-op when already on top of it.
pub fn move_towards(
    physics: &mut Physics,
    target: (f64, f64),
    speed: f64,
    strength: f64,
    config: &BehaviorConfig,
) {
    steer(physics, target, speed, strength, 1.0, config);
}

pub fn move_away(
    physics: &mut Physics,
    target: (f64, f64),
    speed: f64,
    strength: f64,
    config: &BehaviorConfig,
) {
    steer(physics, target, speed, strength, -1.0, config);
}

/// Rescales the velocity so its magnitude does not exceed `speed * factor`.
pub fn cap_speed(physics: &mut Physics, speed: f64, config: &BehaviorConfig) {
    let limit = speed * config.max_speed_factor;
    let current = (physics.vx * physics.vx + physics.vy * physics.vy).sqrt();
    if current > limit && current > 0.0 {
        physics.vx = physics.vx / current * limit;
        physics.vy = physics.vy / current * limit;
    }
}

/// Whether the organism forages at the urgent strength.
#[must_use]
pub fn is_hungry(organism: &Organism, config: &AppConfig) -> bool {
    let m = &organism.metabolism;
    m.energy < m.reproduction_threshold || m.energy < m.max_energy * config.behavior.hunger_fraction
}

/// Applies the decision policy to the organism's velocity.
pub fn decide<R: Rng>(
    organism: &mut Organism,
    perception: &Perception<'_>,
    config: &AppConfig,
    rng: &mut R,
) {
    let b = &config.behavior;
    let speed = organism.genome.effective(Gene::Speed, config);
    let size = organism.genome.effective(Gene::Size, config);
    let origin = (organism.physics.x, organism.physics.y);

    let mut moved_for_food = false;
    if let Some(food) = spatial::closest(&perception.food, origin) {
        let strength = if is_hungry(organism, config) {
            b.forage_urgent_strength
        } else {
            b.forage_strength
        };
        move_towards(&mut organism.physics, food.position(), speed, strength, b);
        moved_for_food = true;
    }

    if let Some(toxin) = spatial::closest(&perception.toxins, origin) {
        move_away(&mut organism.physics, toxin.position(), speed, b.toxin_avoid_strength, b);
    }

    if !perception.neighbors.is_empty() {
        let species = organism.lineage.species;
        let (same, other): (Vec<&NeighborView>, Vec<&NeighborView>) = perception
            .neighbors
            .iter()
            .copied()
            .partition(|n| n.species == species);

        let sociability = organism.genome.effective(Gene::Sociability, config);
        if sociability > b.social_threshold {
            if let Some(center) = spatial::centroid(&same) {
                move_towards(
                    &mut organism.physics,
                    center,
                    speed,
                    b.social_strength * sociability,
                    b,
                );
            }
        }

        let aggressiveness = organism.genome.effective(Gene::Aggressiveness, config);
        if aggressiveness > b.aggression_threshold {
            if let Some(target) = spatial::closest(&other, origin) {
                let dominant = size > target.size * b.dominance_size_ratio
                    && organism.metabolism.energy > target.energy * b.dominance_energy_ratio;
                if dominant {
                    move_towards(
                        &mut organism.physics,
                        target.position(),
                        speed,
                        b.pursue_strength * aggressiveness,
                        b,
                    );
                } else if target.size > size * b.threat_size_ratio {
                    move_away(&mut organism.physics, target.position(), speed, b.flee_strength, b);
                }
            }
        }
    }

    if !moved_for_food && rng.gen::<f64>() < b.explore_chance {
        organism.physics.vx += (rng.gen::<f64>() - 0.5) * b.explore_impulse;
        organism.physics.vy += (rng.gen::<f64>() - 0.5) * b.explore_impulse;
    }

    cap_speed(&mut organism.physics, speed, b);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn organism_at(x: f64, y: f64, rng: &mut ChaCha8Rng) -> Organism {
        let config = AppConfig::default();
        let mut o = lifecycle::create_founder_with_rng(x, y, &config, rng);
        o.genome.speed = 1.0;
        o.genome.size = 5.0;
        o.genome.sensor_range = 50.0;
        o.genome.sociability = 0.0;
        o.genome.aggressiveness = 0.0;
        o
    }

    fn view(index: usize, x: f64, y: f64, species: u8, size: f64, energy: f64) -> NeighborView {
        NeighborView {
            index,
            x,
            y,
            species,
            size,
            energy,
        }
    }

    #[test]
    fn test_move_towards_unit_direction() {
        let config = AppConfig::default();
        let mut p = Physics::default();
        move_towards(&mut p, (10.0, 0.0), 1.0, 1.0, &config.behavior);
        assert!((p.vx - 0.08).abs() < 1e-12);
        assert_eq!(p.vy, 0.0);

        let mut p = Physics::default();
        move_away(&mut p, (0.0, 10.0), 2.0, 1.5, &config.behavior);
        assert!((p.vy + 0.24).abs() < 1e-12);
    }

    #[test]
    fn test_steering_noop_when_on_target() {
        let config = AppConfig::default();
        let mut p = Physics::default();
        move_towards(&mut p, (0.05, 0.05), 1.0, 1.0, &config.behavior);
        assert_eq!((p.vx, p.vy), (0.0, 0.0));
    }

    #[test]
    fn test_cap_speed() {
        let config = AppConfig::default();
        let mut p = Physics {
            vx: 3.0,
            vy: 4.0,
            ..Physics::default()
        };
        cap_speed(&mut p, 1.0, &config.behavior);
        let mag = (p.vx * p.vx + p.vy * p.vy).sqrt();
        assert!((mag - 0.6).abs() < 1e-12);
        assert!((p.vx / p.vy - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_perception_excludes_self_and_out_of_range() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let o = organism_at(100.0, 100.0, &mut rng);
        let food = vec![Food::new(110.0, 100.0), Food::new(300.0, 300.0)];
        let toxins = vec![Toxin::new(100.0, 149.0), Toxin::new(100.0, 150.0)];
        let neighbors = vec![
            view(0, 100.0, 100.0, 0, 5.0, 50.0),
            view(1, 120.0, 100.0, 0, 5.0, 50.0),
        ];
        let p = Perception::gather(&o, 0, &food, &toxins, &neighbors, &config);
        assert_eq!(p.food.len(), 1);
        assert_eq!(p.toxins.len(), 1);
        assert_eq!(p.neighbors.len(), 1);
        assert_eq!(p.neighbors[0].index, 1);
    }

    #[test]
    fn test_hungry_forager_steers_harder() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(32);
        let food = vec![Food::new(120.0, 100.0)];

        let mut hungry = organism_at(100.0, 100.0, &mut rng);
        hungry.metabolism.energy = 10.0;
        let p = Perception::gather(&hungry, 0, &food, &[], &[], &config);
        decide(&mut hungry, &p, &config, &mut rng);
        assert!((hungry.physics.vx - 1.5 * 0.08).abs() < 1e-12);

        let mut sated = organism_at(100.0, 100.0, &mut rng);
        sated.metabolism.energy = 119.0;
        sated.metabolism.reproduction_threshold = 50.0;
        let p = Perception::gather(&sated, 0, &food, &[], &[], &config);
        decide(&mut sated, &p, &config, &mut rng);
        assert!((sated.physics.vx - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_toxin_avoidance() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(33);
        let mut o = organism_at(100.0, 100.0, &mut rng);
        // Food in view so exploration never fires.
        let food = vec![Food::new(100.0, 100.0)];
        let toxins = vec![Toxin::new(110.0, 100.0)];
        let p = Perception::gather(&o, 0, &food, &toxins, &[], &config);
        decide(&mut o, &p, &config, &mut rng);
        assert!((o.physics.vx + 1.2 * 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_social_pull_toward_same_species() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(34);
        let mut o = organism_at(100.0, 100.0, &mut rng);
        o.genome.sociability = 1.0;
        let species = o.lineage.species;
        let other = (species + 1) % 8;
        let food = vec![Food::new(100.0, 100.0)];
        let neighbors = vec![
            view(0, 100.0, 100.0, species, 5.0, 50.0),
            view(1, 100.0, 110.0, species, 5.0, 50.0),
            view(2, 100.0, 130.0, species, 5.0, 50.0),
            view(3, 130.0, 100.0, other, 5.0, 50.0),
        ];
        let p = Perception::gather(&o, 0, &food, &[], &neighbors, &config);
        decide(&mut o, &p, &config, &mut rng);
        assert!(o.physics.vx.abs() < 1e-12);
        assert!((o.physics.vy - 0.3 * 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_aggressor_pursues_weaker_and_flees_bigger() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(35);
        let food = vec![Food::new(100.0, 100.0)];

        let mut hunter = organism_at(100.0, 100.0, &mut rng);
        hunter.genome.aggressiveness = 1.0;
        hunter.metabolism.energy = 100.0;
        let other = (hunter.lineage.species + 1) % 8;
        let prey = vec![view(1, 120.0, 100.0, other, 2.0, 10.0)];
        let p = Perception::gather(&hunter, 0, &food, &[], &prey, &config);
        decide(&mut hunter, &p, &config, &mut rng);
        assert!((hunter.physics.vx - 0.5 * 0.08).abs() < 1e-12);

        let mut coward = organism_at(100.0, 100.0, &mut rng);
        coward.genome.aggressiveness = 1.0;
        let other = (coward.lineage.species + 1) % 8;
        let threat = vec![view(1, 120.0, 100.0, other, 9.0, 10.0)];
        let p = Perception::gather(&coward, 0, &food, &[], &threat, &config);
        decide(&mut coward, &p, &config, &mut rng);
        assert!((coward.physics.vx + 0.7 * 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_never_exceeds_cap() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(36);
        let mut o = organism_at(100.0, 100.0, &mut rng);
        for _ in 0..200 {
            let p = Perception::default();
            decide(&mut o, &p, &config, &mut rng);
            let mag = (o.physics.vx * o.physics.vx + o.physics.vy * o.physics.vy).sqrt();
            assert!(mag <= 0.6 + 1e-12);
        }
    }
}
