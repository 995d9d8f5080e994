use super::error::Result;
use evolve_data::PopulationStats;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Writes population statistics as JSON lines, one object per report.
pub struct StatsWriter<W: Write> {
    out: W,
    every: u64,
    written: usize,
}

impl<W: Write> StatsWriter<W> {
    /// `every` of 0 is treated as 1.
    pub fn new(out: W, every: u64) -> Self {
        Self {
            out,
            every: every.max(1),
            written: 0,
        }
    }

    /// Writes `stats` when its tick falls on the reporting interval.
    pub fn observe(&mut self, stats: &PopulationStats) -> Result<bool> {
        if !stats.tick.is_multiple_of(self.every) {
            return Ok(false);
        }
        self.write(stats)?;
        Ok(true)
    }

    pub fn write(&mut self, stats: &PopulationStats) -> Result<()> {
        serde_json::to_writer(&mut self.out, stats)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Outcome of a headless run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub extinct: bool,
    pub population: usize,
    pub species_count: usize,
    pub total_born: u64,
    pub total_died: u64,
    pub generation: u64,
    pub max_lineage_depth: u32,
    /// Hex-encoded genome of the oldest survivor, if any.
    pub elder_genome: Option<String>,
}
