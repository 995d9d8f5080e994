use crate::config::AppConfig;
use evolve_data::{Food, Particle, Toxin};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shared world state outside the population: resources, hazards,
/// temperature and the tick clock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Environment {
    pub food: Vec<Food>,
    pub toxins: Vec<Toxin>,
    /// Decorative only; never read by organisms.
    pub particles: Vec<Particle>,
    pub temperature: f64,
    pub time: u64,
    /// Coarse progress counter, bumped every `generation_interval` ticks.
    pub generation: u64,
    pub width: f64,
    pub height: f64,
}

impl Environment {
    /// Empty environment at the optimum temperature.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            food: Vec::new(),
            toxins: Vec::new(),
            particles: Vec::new(),
            temperature: config.metabolism.temperature_optimum,
            time: 0,
            generation: 0,
            width: config.world.width,
            height: config.world.height,
        }
    }

    fn random_point<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
        (rng.gen::<f64>() * self.width, rng.gen::<f64>() * self.height)
    }

    /// Scatters `count` fresh food items uniformly.
    pub fn seed_food<R: Rng>(&mut self, count: usize, rng: &mut R) {
        self.food.reserve(count);
        for _ in 0..count {
            let (x, y) = self.random_point(rng);
            self.food.push(Food::new(x, y));
        }
    }

    #[must_use]
    pub fn temperature_at(time: u64, config: &AppConfig) -> f64 {
        let env = &config.environment;
        config.metabolism.temperature_optimum
            + env.temperature_amplitude * (time as f64 * env.temperature_frequency).sin()
    }

    /// Advances the clock and runs the resource lifecycle for one tick.
    pub fn update<R: Rng>(&mut self, config: &AppConfig, rng: &mut R) {
        let env = &config.environment;
        self.time += 1;
        self.temperature = Self::temperature_at(self.time, config);

        let food_cap = config.world.food_target as f64 * env.food_cap_factor;
        if (self.food.len() as f64) < food_cap
            && rng.gen::<f64>() < env.food_abundance * env.food_spawn_scale
        {
            let (x, y) = self.random_point(rng);
            self.food.push(Food::new(x, y));
        }
        for f in &mut self.food {
            f.age = f.age.saturating_add(1);
        }
        self.food.retain(|f| f.age < env.food_lifetime);

        if rng.gen::<f64>() < env.toxicity * env.toxin_spawn_scale {
            let (x, y) = self.random_point(rng);
            self.toxins.push(Toxin::new(x, y));
        }
        for t in &mut self.toxins {
            t.age = t.age.saturating_add(1);
        }
        self.toxins.retain(|t| t.age < env.toxin_lifetime);

        if env.particles_enabled {
            self.update_particles(config, rng);
        } else {
            self.particles.clear();
        }
    }

    fn update_particles<R: Rng>(&mut self, config: &AppConfig, rng: &mut R) {
        let env = &config.environment;
        if rng.gen::<f64>() < env.particle_spawn_chance {
            let (x, y) = self.random_point(rng);
            self.particles.push(Particle {
                x,
                y,
                vx: (rng.gen::<f64>() - 0.5) * env.particle_drift,
                vy: (rng.gen::<f64>() - 0.5) * env.particle_drift,
                life: env.particle_life,
                hue: rng.gen::<f64>() * 360.0,
            });
        }
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }
}
