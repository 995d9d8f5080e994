pub mod error;
pub mod report;

pub use error::{AppError, Result};
pub use report::{RunSummary, StatsWriter};

use evolve_core::config::AppConfig;
use evolve_core::snapshot::{OrganismSnapshot, TrailHistory, WorldSnapshot};
use evolve_core::{world, Environment, World};
use evolve_data::LiveEvent;
use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;

const EVENT_LOG_CAPACITY: usize = 100;

/// Host-side driver: owns the world, its environment, run state and the
/// annotations renderers need.
pub struct App {
    pub running: bool,
    pub config: AppConfig,
    pub world: World,
    pub env: Environment,
    pub trails: TrailHistory,
    /// Most recent events, newest last.
    pub event_log: VecDeque<LiveEvent>,
}

impl App {
    /// Starts paused, like a freshly opened simulation.
    pub fn new(config: AppConfig) -> Result<Self> {
        let (world, env) = world::initialize(config.clone())
            .map_err(|e| AppError::init(format!("{e:#}")))?;
        Ok(Self {
            running: false,
            config,
            world,
            env,
            trails: TrailHistory::new(),
            event_log: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
        })
    }

    /// Reads `path` when it exists, otherwise falls back to defaults.
    pub fn load_config(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::from(e).with_context(format!("reading {}", path.display())))?;
        AppConfig::from_toml(&content).map_err(|e| AppError::config(format!("{e:#}")))
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
        tracing::debug!(running = self.running, "Toggled simulation");
    }

    /// Rebuilds the world from the current configuration and pauses.
    pub fn reset(&mut self) -> Result<()> {
        let (world, env) = world::initialize(self.config.clone())
            .map_err(|e| AppError::init(format!("{e:#}")).with_context("resetting world"))?;
        self.world = world;
        self.env = env;
        self.trails.clear();
        self.event_log.clear();
        self.running = false;
        Ok(())
    }

    /// Advances one tick while running; does nothing when paused.
    pub fn tick(&mut self) -> Vec<LiveEvent> {
        if !self.running {
            return Vec::new();
        }
        self.step()
    }

    /// Advances exactly one tick regardless of the run state.
    pub fn step(&mut self) -> Vec<LiveEvent> {
        let events = self.world.update(&mut self.env);
        let organisms: Vec<OrganismSnapshot> = self
            .world
            .population()
            .iter()
            .map(OrganismSnapshot::from)
            .collect();
        self.trails.record(&organisms);

        for event in &events {
            if self.event_log.len() == EVENT_LOG_CAPACITY {
                self.event_log.pop_front();
            }
            self.event_log.push_back(event.clone());
        }
        events
    }

    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot(&self.env)
    }

    /// Runs up to `max_ticks` ticks as fast as possible, stopping early on
    /// extinction. Statistics go to `stats_out` when given.
    pub fn run_headless<W: Write>(
        &mut self,
        max_ticks: u64,
        mut stats_out: Option<&mut StatsWriter<W>>,
    ) -> Result<RunSummary> {
        self.running = true;
        let mut ticks = 0;
        while ticks < max_ticks && !self.world.is_extinct() {
            self.step();
            ticks += 1;
            if let Some(writer) = stats_out.as_deref_mut() {
                writer.observe(self.world.stats())?;
            }
        }
        self.running = false;

        let stats = self.world.stats();
        let elder_genome = self
            .world
            .population()
            .iter()
            .max_by_key(|o| o.metabolism.age)
            .map(|o| o.genome.to_hex());

        let summary = RunSummary {
            ticks,
            extinct: self.world.is_extinct(),
            population: stats.population,
            species_count: stats.species_count,
            total_born: stats.total_born,
            total_died: stats.total_died,
            generation: self.env.generation,
            max_lineage_depth: stats.max_lineage_depth,
            elder_genome,
        };
        tracing::info!(
            ticks = summary.ticks,
            population = summary.population,
            born = summary.total_born,
            died = summary.total_died,
            extinct = summary.extinct,
            "Headless run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> AppConfig {
        let mut config = AppConfig::default();
        config.world.seed = Some(seed);
        config
    }

    #[test]
    fn test_app_starts_paused_and_tick_respects_it() {
        let mut app = App::new(seeded(1)).unwrap();
        assert!(!app.running);
        app.tick();
        assert_eq!(app.env.time, 0);

        app.toggle_running();
        app.tick();
        assert_eq!(app.env.time, 1);
        assert_eq!(app.trails.len(), app.world.population().len());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut app = App::new(seeded(2)).unwrap();
        app.toggle_running();
        for _ in 0..20 {
            app.tick();
        }
        app.reset().unwrap();
        assert!(!app.running);
        assert_eq!(app.env.time, 0);
        assert_eq!(app.world.population().len(), 50);
        assert_eq!(app.world.stats().total_born, 0);
        assert!(app.trails.is_empty());
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = App::load_config(Path::new("/nonexistent/evolve/config.toml")).unwrap();
        assert_eq!(config.world.initial_population, 50);
    }

    #[test]
    fn test_invalid_config_file_is_reported() {
        let path = std::env::temp_dir().join(format!("evolve-bad-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[world]\nwidth = -5.0\n").unwrap();
        let err = App::load_config(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_run_headless_with_stats() {
        let mut app = App::new(seeded(3)).unwrap();
        let mut writer = StatsWriter::new(Vec::new(), 25);
        let summary = app.run_headless(100, Some(&mut writer)).unwrap();
        assert!(!app.running);
        if summary.extinct {
            assert!(summary.ticks <= 100);
        } else {
            assert_eq!(summary.ticks, 100);
            assert_eq!(writer.written(), 4);
            assert!(summary.elder_genome.is_some());
        }
    }

    #[test]
    fn test_run_headless_stops_on_extinction() {
        let mut config = seeded(4);
        config.world.initial_population = 0;
        let mut app = App::new(config).unwrap();
        let summary = app.run_headless::<Vec<u8>>(50, None).unwrap();
        assert_eq!(summary.ticks, 0);
        assert!(summary.extinct);
        assert_eq!(app.env.time, 0);
    }

    #[test]
    fn test_event_log_is_bounded() {
        let mut app = App::new(seeded(5)).unwrap();
        for _ in 0..2000 {
            app.step();
        }
        assert!(app.event_log.len() <= EVENT_LOG_CAPACITY);
    }
}
