use serde::{Deserialize, Serialize};

/// One heritable trait of a [`Genome`].
///
/// The set is closed: mutation, clamping and crossover match over it
/// exhaustively so every gene has a defined policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gene {
    /// Body radius. Drives metabolic cost and eat radius.
    Size,
    /// Steering authority and top speed.
    Speed,
    /// Divisor applied to per-tick energy consumption.
    EnergyEfficiency,
    /// Fraction of max energy required before reproducing.
    ReproductionThreshold,
    /// Divisor applied to the base reproduction cooldown.
    ReproductionSpeed,
    /// Maximum age in ticks.
    Lifespan,
    /// Tendency to pursue other species (0.0-1.0).
    Aggressiveness,
    /// Tendency to flock with the same species (0.0-1.0).
    Sociability,
    /// Fraction of toxin damage ignored.
    ToxinResistance,
    /// Perception radius.
    SensorRange,
    /// Display colour in degrees. No simulation effect.
    Hue,
}

impl Gene {
    /// Every gene, in declaration order.
    pub const ALL: [Gene; 11] = [
        Gene::Size,
        Gene::Speed,
        Gene::EnergyEfficiency,
        Gene::ReproductionThreshold,
        Gene::ReproductionSpeed,
        Gene::Lifespan,
        Gene::Aggressiveness,
        Gene::Sociability,
        Gene::ToxinResistance,
        Gene::SensorRange,
        Gene::Hue,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Gene::Size => "size",
            Gene::Speed => "speed",
            Gene::EnergyEfficiency => "energy_efficiency",
            Gene::ReproductionThreshold => "reproduction_threshold",
            Gene::ReproductionSpeed => "reproduction_speed",
            Gene::Lifespan => "lifespan",
            Gene::Aggressiveness => "aggressiveness",
            Gene::Sociability => "sociability",
            Gene::ToxinResistance => "toxin_resistance",
            Gene::SensorRange => "sensor_range",
            Gene::Hue => "hue",
        }
    }
}

/// Complete heritable trait set of an organism.
///
/// A genome is a plain value: cloning is a deep copy and nothing is shared
/// between parent and child.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Genome {
    pub size: f64,
    pub speed: f64,
    pub energy_efficiency: f64,
    pub reproduction_threshold: f64,
    pub reproduction_speed: f64,
    pub lifespan: f64,
    pub aggressiveness: f64,
    pub sociability: f64,
    pub toxin_resistance: f64,
    pub sensor_range: f64,
    pub hue: f64,
}

impl Genome {
    #[must_use]
    pub fn get(&self, gene: Gene) -> f64 {
        match gene {
            Gene::Size => self.size,
            Gene::Speed => self.speed,
            Gene::EnergyEfficiency => self.energy_efficiency,
            Gene::ReproductionThreshold => self.reproduction_threshold,
            Gene::ReproductionSpeed => self.reproduction_speed,
            Gene::Lifespan => self.lifespan,
            Gene::Aggressiveness => self.aggressiveness,
            Gene::Sociability => self.sociability,
            Gene::ToxinResistance => self.toxin_resistance,
            Gene::SensorRange => self.sensor_range,
            Gene::Hue => self.hue,
        }
    }

    pub fn set(&mut self, gene: Gene, value: f64) {
        let slot = match gene {
            Gene::Size => &mut self.size,
            Gene::Speed => &mut self.speed,
            Gene::EnergyEfficiency => &mut self.energy_efficiency,
            Gene::ReproductionThreshold => &mut self.reproduction_threshold,
            Gene::ReproductionSpeed => &mut self.reproduction_speed,
            Gene::Lifespan => &mut self.lifespan,
            Gene::Aggressiveness => &mut self.aggressiveness,
            Gene::Sociability => &mut self.sociability,
            Gene::ToxinResistance => &mut self.toxin_resistance,
            Gene::SensorRange => &mut self.sensor_range,
            Gene::Hue => &mut self.hue,
        };
        *slot = value;
    }

    /// Serialize genome to hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(bytes)
    }

    /// Deserialize genome from hex string.
    pub fn from_hex(hex_str: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(hex_str)?;
        let genome = serde_json::from_slice(&bytes)?;
        Ok(genome)
    }
}
