use crate::config::AppConfig;
use crate::genome::GenomeLogic;
use crate::spatial::Located;
use evolve_data::{Food, Gene, Genome, Organism, Particle, PopulationStats, Toxin};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use uuid::Uuid;

/// Maximum number of points kept per trail.
pub const TRAIL_LENGTH: usize = 15;
const TRAIL_FADE: f64 = 0.9;

/// Frozen view of one organism, taken before the update pass so every
/// organism perceives the same instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborView {
    /// Position in the population vector.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub species: u8,
    pub size: f64,
    pub energy: f64,
}

impl Located for NeighborView {
    #[inline]
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl NeighborView {
    #[must_use]
    pub fn capture(population: &[Organism], config: &AppConfig) -> Vec<NeighborView> {
        population
            .iter()
            .enumerate()
            .map(|(index, o)| NeighborView {
                index,
                x: o.physics.x,
                y: o.physics.y,
                species: o.lineage.species,
                size: o.genome.effective(Gene::Size, config),
                energy: o.metabolism.energy,
            })
            .collect()
    }
}

/// Read-only organism state for renderers.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrganismSnapshot {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub energy: f64,
    pub max_energy: f64,
    pub age: u64,
    pub species: u8,
    pub generation: u32,
    pub genome: Genome,
}

impl From<&Organism> for OrganismSnapshot {
    fn from(o: &Organism) -> Self {
        Self {
            id: o.id,
            x: o.physics.x,
            y: o.physics.y,
            vx: o.physics.vx,
            vy: o.physics.vy,
            energy: o.metabolism.energy,
            max_energy: o.metabolism.max_energy,
            age: o.metabolism.age,
            species: o.lineage.species,
            generation: o.lineage.generation,
            genome: o.genome,
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub generation: u64,
    pub temperature: f64,
    pub width: f64,
    pub height: f64,
    pub organisms: Vec<OrganismSnapshot>,
    pub food: Vec<Food>,
    pub toxins: Vec<Toxin>,
    pub particles: Vec<Particle>,
    pub stats: PopulationStats,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
    pub alpha: f64,
}

/// Renderer-side motion trails, fed from successive snapshots.
///
/// The engine never reads this; it exists so hosts do not have to store
/// history on the organisms themselves.
#[derive(Default, Debug, Clone)]
pub struct TrailHistory {
    trails: HashMap<Uuid, VecDeque<TrailPoint>>,
}

impl TrailHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the current position of every organism and fades older
    /// points. Trails of organisms missing from `organisms` are dropped.
    pub fn record(&mut self, organisms: &[OrganismSnapshot]) {
        let alive: HashSet<Uuid> = organisms.iter().map(|o| o.id).collect();
        self.trails.retain(|id, _| alive.contains(id));

        for o in organisms {
            let trail = self.trails.entry(o.id).or_default();
            trail.push_back(TrailPoint {
                x: o.x,
                y: o.y,
                alpha: 1.0,
            });
            if trail.len() > TRAIL_LENGTH {
                trail.pop_front();
            }
            for point in trail.iter_mut() {
                point.alpha *= TRAIL_FADE;
            }
        }
    }

    #[must_use]
    pub fn trail(&self, id: &Uuid) -> Option<&VecDeque<TrailPoint>> {
        self.trails.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trails.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    pub fn clear(&mut self) {
        self.trails.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_trail_is_bounded_and_fades() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut organism = lifecycle::create_founder_with_rng(10.0, 10.0, &config, &mut rng);
        let mut trails = TrailHistory::new();

        for step in 0..40 {
            organism.physics.x = step as f64;
            trails.record(&[OrganismSnapshot::from(&organism)]);
        }

        let trail = trails.trail(&organism.id).unwrap();
        assert_eq!(trail.len(), TRAIL_LENGTH);
        assert_eq!(trail.back().unwrap().x, 39.0);
        assert!((trail.back().unwrap().alpha - 0.9).abs() < 1e-12);
        assert!(trail.front().unwrap().alpha < trail.back().unwrap().alpha);
    }

    #[test]
    fn test_trail_dropped_when_organism_disappears() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let organism = lifecycle::create_founder_with_rng(10.0, 10.0, &config, &mut rng);
        let mut trails = TrailHistory::new();
        trails.record(&[OrganismSnapshot::from(&organism)]);
        assert_eq!(trails.len(), 1);
        trails.record(&[]);
        assert!(trails.is_empty());
    }

    #[test]
    fn test_neighbor_view_capture_preserves_order() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let population: Vec<_> = (0..5)
            .map(|i| lifecycle::create_founder_with_rng(i as f64, 0.0, &config, &mut rng))
            .collect();
        let views = NeighborView::capture(&population, &config);
        for (i, view) in views.iter().enumerate() {
            assert_eq!(view.index, i);
            assert_eq!(view.x, i as f64);
            assert_eq!(view.species, population[i].lineage.species);
        }
    }

    #[test]
    fn test_neighbor_view_reads_non_finite_size_as_minimum() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let mut organism = lifecycle::create_founder_with_rng(10.0, 10.0, &config, &mut rng);
        organism.genome.size = f64::NAN;
        let views = NeighborView::capture(&[organism], &config);
        assert_eq!(views[0].size, config.genome.size_min);
    }
}
