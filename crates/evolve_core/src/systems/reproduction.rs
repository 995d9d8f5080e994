use crate::config::AppConfig;
use crate::genome::{tolerance_band, GenomeLogic};
use crate::lifecycle;
use crate::spatial;
use evolve_data::{Gene, Genome, Organism};
use rand::Rng;
use std::f64::consts::TAU;

#[must_use]
pub fn can_reproduce(organism: &Organism, config: &AppConfig) -> bool {
    let m = &organism.metabolism;
    m.energy > m.reproduction_threshold
        && m.reproduction_cooldown == 0
        && m.age > config.reproduction.min_age
}

/// Ticks a parent must wait after reproducing.
#[must_use]
pub fn cooldown_for(genome: &Genome, config: &AppConfig) -> u32 {
    let base = f64::from(config.reproduction.base_cooldown);
    let factor = genome.reproduction_speed;
    let ticks = if factor.is_finite() && factor > config.metabolism.efficiency_epsilon {
        (base / factor).floor()
    } else {
        base * config.metabolism.inefficiency_penalty
    };
    ticks as u32
}

/// Uniform crossover: each gene from either parent with equal odds.
pub fn crossover<R: Rng>(a: &Genome, b: &Genome, rng: &mut R) -> Genome {
    let mut child = *a;
    for gene in Gene::ALL {
        if rng.gen::<f64>() >= 0.5 {
            child.set(gene, b.get(gene));
        }
    }
    child
}

/// Perturbs each gene with probability `mutation_rate`, then forces the
/// whole genome back into its safety bands.
pub fn mutate<R: Rng>(genome: &mut Genome, config: &AppConfig, rng: &mut R) {
    let evo = &config.evolution;
    for gene in Gene::ALL {
        if rng.gen::<f64>() >= evo.mutation_rate {
            continue;
        }
        let amount = (rng.gen::<f64>() - 0.5) * evo.mutation_amount;
        let value = genome.get(gene);
        let mutated = match gene {
            Gene::Hue => (value + amount * evo.hue_jitter_scale).rem_euclid(360.0),
            Gene::Size
            | Gene::Speed
            | Gene::EnergyEfficiency
            | Gene::ReproductionThreshold
            | Gene::ReproductionSpeed
            | Gene::ToxinResistance
            | Gene::SensorRange => {
                let (lo, hi) = tolerance_band(gene, config);
                (value * (1.0 + amount)).clamp(lo, hi)
            }
            Gene::Lifespan => {
                let (lo, _) = tolerance_band(gene, config);
                let jitter = amount * config.genome.lifespan_random_add * evo.lifespan_jitter_fraction;
                (value + jitter).max(lo)
            }
            Gene::Aggressiveness | Gene::Sociability => (value + amount).clamp(0.0, 1.0),
        };
        genome.set(gene, mutated);
    }
    genome.sanitize(config);
}

/// Produces an offspring when `parent` is eligible, paying the energy cost
/// and starting the cooldown. With a mate the child genome is a crossover
/// half the time; otherwise it is a copy of the parent's.
pub fn reproduce<R: Rng>(
    parent: &mut Organism,
    mate: Option<&Genome>,
    tick: u64,
    config: &AppConfig,
    rng: &mut R,
) -> Option<Organism> {
    if !can_reproduce(parent, config) {
        return None;
    }
    let r = &config.reproduction;

    parent.metabolism.energy -= parent.metabolism.max_energy * r.energy_cost_factor;
    parent.metabolism.reproduction_cooldown = cooldown_for(&parent.genome, config);

    let mut genome = match mate {
        Some(other) if rng.gen::<f64>() < r.crossover_chance => {
            crossover(&parent.genome, other, rng)
        }
        _ => parent.genome,
    };
    mutate(&mut genome, config, rng);

    let angle = rng.gen::<f64>() * TAU;
    let distance = parent.genome.effective(Gene::Size, config) + r.offspring_spacing;
    let x = spatial::wrap(parent.physics.x + angle.cos() * distance, config.world.width);
    let y = spatial::wrap(parent.physics.y + angle.sin() * distance, config.world.height);

    let mut child = lifecycle::create_organism_with_rng(
        x,
        y,
        genome,
        config.metabolism.child_initial_energy,
        tick,
        config,
        rng,
    );
    child.parent_id = Some(parent.id);
    child.lineage.generation = parent.lineage.generation + 1;
    parent.lineage.offspring_count += 1;
    Some(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::safety_band;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ready_parent(rng: &mut ChaCha8Rng) -> Organism {
        let config = AppConfig::default();
        let mut o = lifecycle::create_founder_with_rng(400.0, 300.0, &config, rng);
        o.metabolism.energy = 110.0;
        o.metabolism.reproduction_threshold = 0.0;
        o.metabolism.age = 51;
        o
    }

    #[test]
    fn test_eligibility_rules() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(51);
        let mut o = ready_parent(&mut rng);
        assert!(can_reproduce(&o, &config));

        o.metabolism.age = 50;
        assert!(!can_reproduce(&o, &config));
        o.metabolism.age = 51;

        o.metabolism.reproduction_cooldown = 1;
        assert!(!can_reproduce(&o, &config));
        o.metabolism.reproduction_cooldown = 0;

        o.metabolism.reproduction_threshold = 110.0;
        assert!(!can_reproduce(&o, &config));
    }

    #[test]
    fn test_cooldown_from_speed_factor() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(52);
        let mut genome = Genome::random_with_rng(&config, &mut rng);
        genome.reproduction_speed = 1.0;
        assert_eq!(cooldown_for(&genome, &config), 200);
        genome.reproduction_speed = 1.5;
        assert_eq!(cooldown_for(&genome, &config), 133);
        genome.reproduction_speed = 0.0;
        assert_eq!(cooldown_for(&genome, &config), 1000);
        genome.reproduction_speed = f64::NAN;
        assert_eq!(cooldown_for(&genome, &config), 1000);
    }

    #[test]
    fn test_ineligible_parent_is_untouched() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(53);
        let mut o = ready_parent(&mut rng);
        o.metabolism.age = 10;
        let before = o.clone();
        assert!(reproduce(&mut o, None, 7, &config, &mut rng).is_none());
        assert_eq!(o, before);
    }

    #[test]
    fn test_reproduce_pays_cost_and_links_child() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(54);
        let mut parent = ready_parent(&mut rng);
        parent.genome.reproduction_speed = 1.0;
        let child = reproduce(&mut parent, None, 7, &config, &mut rng).unwrap();

        assert!((parent.metabolism.energy - (110.0 - 18.0)).abs() < 1e-12);
        assert_eq!(parent.metabolism.reproduction_cooldown, 200);
        assert_eq!(parent.lineage.offspring_count, 1);

        assert_eq!(child.metabolism.energy, 60.0);
        assert_eq!(child.parent_id, Some(parent.id));
        assert_eq!(child.lineage.generation, 1);
        assert_eq!(child.lineage.birth_tick, 7);
        assert_eq!(child.metabolism.age, 0);
        assert_eq!(child.lineage.species, child.genome.species());

        let dx = child.physics.x - parent.physics.x;
        let dy = child.physics.y - parent.physics.y;
        let expected = parent.genome.size + 10.0;
        assert!(((dx * dx + dy * dy).sqrt() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_offspring_position_wraps() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(55);
        for _ in 0..50 {
            let mut parent = ready_parent(&mut rng);
            parent.physics.x = 1.0;
            parent.physics.y = 599.0;
            let child = reproduce(&mut parent, None, 0, &config, &mut rng).unwrap();
            assert!(child.physics.x >= 0.0 && child.physics.x < 800.0);
            assert!(child.physics.y >= 0.0 && child.physics.y < 600.0);
        }
    }

    #[test]
    fn test_crossover_takes_genes_from_parents_only() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(56);
        let a = Genome::random_with_rng(&config, &mut rng);
        let b = Genome::random_with_rng(&config, &mut rng);
        for _ in 0..100 {
            let child = crossover(&a, &b, &mut rng);
            for gene in Gene::ALL {
                let v = child.get(gene);
                assert!(v == a.get(gene) || v == b.get(gene));
            }
        }
    }

    #[test]
    fn test_mutation_respects_safety_bands() {
        let mut config = AppConfig::default();
        config.evolution.mutation_rate = 1.0;
        let mut rng = ChaCha8Rng::seed_from_u64(57);
        let mut genome = Genome::random_with_rng(&config, &mut rng);
        for _ in 0..2000 {
            mutate(&mut genome, &config, &mut rng);
            for gene in Gene::ALL {
                let v = genome.get(gene);
                let (lo, hi) = safety_band(gene, &config);
                assert!(v.is_finite());
                if gene == Gene::Hue {
                    assert!((0.0..360.0).contains(&v));
                } else {
                    assert!(v >= lo && v <= hi, "{} = {}", gene.name(), v);
                }
            }
        }
    }

    #[test]
    fn test_zero_mutation_rate_is_identity_for_valid_genome() {
        let mut config = AppConfig::default();
        config.evolution.mutation_rate = 0.0;
        let mut rng = ChaCha8Rng::seed_from_u64(58);
        let original = Genome::random_with_rng(&config, &mut rng);
        let mut genome = original;
        mutate(&mut genome, &config, &mut rng);
        assert_eq!(genome, original);
    }
}
