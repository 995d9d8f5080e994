//! Runtime counters and structured logging for the tick loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Tick counters shared with whoever drives the world.
pub struct Metrics {
    tick_count: AtomicU64,
    births: AtomicU64,
    deaths: AtomicU64,
    log_interval: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Metrics {
    /// `log_interval` of 0 disables the periodic log line.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            births: AtomicU64::new(0),
            deaths: AtomicU64::new(0),
            log_interval,
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, population: usize, food: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;

        if self.log_interval > 0 && tick.is_multiple_of(self.log_interval) {
            tracing::info!(
                tick = tick,
                population = population,
                food = food,
                births = self.births(),
                deaths = self.deaths(),
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn record_births(&self, count: usize) {
        self.births.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_deaths(&self, count: usize) {
        self.deaths.fetch_add(count as u64, Ordering::Relaxed);
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn deaths(&self) -> u64 {
        self.deaths.load(Ordering::Relaxed)
    }
}

/// Installs a plain fmt subscriber at INFO. Does nothing if a global
/// subscriber is already set.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}
