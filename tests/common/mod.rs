pub mod macros;

use evolve::AppConfig;
use evolve_core::environment::Environment;
use evolve_core::lifecycle;
use evolve_core::world::World;
use evolve_core::GenomeLogic;
use evolve_data::{Food, Gene, Genome, Organism, Toxin};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// World with no founders, no food, and no random spawning unless the test
/// asks for it.
#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    organisms: Vec<OrganismBuilder>,
    food: Vec<Food>,
    toxins: Vec<Toxin>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.seed = Some(42);
        config.world.initial_population = 0;
        config.world.food_target = 0;
        config.environment.food_abundance = 0.0;
        config.environment.toxicity = 0.0;
        config.environment.particles_enabled = false;
        Self {
            config,
            organisms: Vec::new(),
            food: Vec::new(),
            toxins: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_organism(mut self, organism: OrganismBuilder) -> Self {
        self.organisms.push(organism);
        self
    }

    pub fn with_food(mut self, x: f64, y: f64) -> Self {
        self.food.push(Food::new(x, y));
        self
    }

    pub fn with_toxin(mut self, x: f64, y: f64) -> Self {
        self.toxins.push(Toxin::new(x, y));
        self
    }

    pub fn build(self) -> (World, Environment) {
        self.try_build()
            .expect("Failed to create world in test builder")
    }

    pub fn try_build(self) -> anyhow::Result<(World, Environment)> {
        let population: Vec<Organism> = self
            .organisms
            .into_iter()
            .enumerate()
            .map(|(i, b)| b.build_with_seed(&self.config, 1000 + i as u64))
            .collect();
        let mut env = Environment::new(&self.config);
        env.food = self.food;
        env.toxins = self.toxins;
        let world = World::with_population(self.config, population)?;
        Ok((world, env))
    }
}

/// Organism with a random genome, then pinned genes and state.
///
/// Aggression and sociability default to zero so steering only follows
/// what a test sets up.
#[allow(dead_code)]
#[derive(Clone)]
pub struct OrganismBuilder {
    x: f64,
    y: f64,
    energy: f64,
    age: u64,
    cooldown: u32,
    threshold: Option<f64>,
    genes: Vec<(Gene, f64)>,
    genome: Option<Genome>,
}

#[allow(dead_code)]
impl OrganismBuilder {
    pub fn new() -> Self {
        Self {
            x: 100.0,
            y: 100.0,
            energy: 90.0,
            age: 0,
            cooldown: 0,
            threshold: None,
            genes: vec![(Gene::Aggressiveness, 0.0), (Gene::Sociability, 0.0)],
            genome: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn energy(mut self, amount: f64) -> Self {
        self.energy = amount;
        self
    }

    pub fn age(mut self, age: u64) -> Self {
        self.age = age;
        self
    }

    pub fn cooldown(mut self, ticks: u32) -> Self {
        self.cooldown = ticks;
        self
    }

    /// Overrides the energy needed to reproduce.
    pub fn threshold(mut self, energy: f64) -> Self {
        self.threshold = Some(energy);
        self
    }

    pub fn gene(mut self, gene: Gene, value: f64) -> Self {
        self.genes.push((gene, value));
        self
    }

    /// Starts from an exact genome instead of a random one.
    pub fn genome(mut self, genome: Genome) -> Self {
        self.genome = Some(genome);
        self.genes.clear();
        self
    }

    pub fn build(self, config: &AppConfig) -> Organism {
        self.build_with_seed(config, 7)
    }

    pub fn build_with_seed(self, config: &AppConfig, seed: u64) -> Organism {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut genome = self
            .genome
            .unwrap_or_else(|| Genome::random_with_rng(config, &mut rng));
        for (gene, value) in &self.genes {
            genome.set(*gene, *value);
        }
        let mut organism =
            lifecycle::create_organism_with_rng(self.x, self.y, genome, self.energy, 0, config, &mut rng);
        organism.metabolism.age = self.age;
        organism.metabolism.reproduction_cooldown = self.cooldown;
        if let Some(threshold) = self.threshold {
            organism.metabolism.reproduction_threshold = threshold;
        }
        organism
    }
}

/// A valid genome with round numbers, for scenarios that need exact values.
#[allow(dead_code)]
pub fn plain_genome() -> Genome {
    Genome {
        size: 5.0,
        speed: 1.0,
        energy_efficiency: 1.0,
        reproduction_threshold: 0.5,
        reproduction_speed: 1.0,
        lifespan: 5000.0,
        aggressiveness: 0.0,
        sociability: 0.0,
        toxin_resistance: 0.5,
        sensor_range: 50.0,
        hue: 180.0,
    }
}
