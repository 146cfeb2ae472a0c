use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub mod validation;
pub use validation::SettingsError;

pub const DEFAULT_PHASE_POINTS: usize = 200;
pub const DEFAULT_MAX_CYCLES: usize = 100;
pub const DEFAULT_AMPLITUDE_BINS: usize = 100;
pub const DEFAULT_RECONCILE_INTERVAL: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phase_axis: PhaseAxis,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub display_range: DisplayRange,
}

impl Default for ChartDefinition {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            description: String::new(),
            phase_axis: PhaseAxis::default(),
            engine: EngineSettings::default(),
            display_range: DisplayRange::default(),
        }
    }
}

/// Phase (x) axis of the chart, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseAxis {
    pub phase_min: f64,
    pub phase_max: f64,
    pub point_count: usize,
}

impl Default for PhaseAxis {
    fn default() -> Self {
        Self {
            phase_min: 0.0,
            phase_max: 360.0,
            point_count: DEFAULT_PHASE_POINTS,
        }
    }
}

impl PhaseAxis {
    /// Phase value of the sample at `index`; the last sample sits one step before `phase_max`.
    pub fn phase_at(&self, index: usize) -> f64 {
        let count = self.point_count.max(1) as f64;
        self.phase_min + (self.phase_max - self.phase_min) * index as f64 / count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaxFrequencyMode {
    /// Raised on insert, rescanned every `reconcile_interval` cycles.
    #[default]
    Periodic,
    /// Always the highest populated frequency.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub max_cycles: usize,
    pub amplitude_bins: usize,
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval: u64,
    #[serde(default)]
    pub max_frequency_mode: MaxFrequencyMode,
    #[serde(default = "default_plot_length")]
    pub plot_width: f64,
    #[serde(default = "default_plot_length")]
    pub plot_height: f64,
    #[serde(default = "default_point_scale")]
    pub point_scale: f64,
}

fn default_reconcile_interval() -> u64 {
    DEFAULT_RECONCILE_INTERVAL
}

fn default_plot_length() -> f64 {
    10.0
}

fn default_point_scale() -> f64 {
    1.0
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
            amplitude_bins: DEFAULT_AMPLITUDE_BINS,
            reconcile_interval: DEFAULT_RECONCILE_INTERVAL,
            max_frequency_mode: MaxFrequencyMode::Periodic,
            plot_width: default_plot_length(),
            plot_height: default_plot_length(),
            point_scale: default_point_scale(),
        }
    }
}

/// Amplitude window used for binning and plotting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRange {
    pub min: f64,
    pub max: f64,
}

impl Default for DisplayRange {
    fn default() -> Self {
        Self {
            min: -75.0,
            max: -30.0,
        }
    }
}

impl DisplayRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Bitwise comparison of both bounds, so a NaN bound matches itself.
    pub fn same_bounds(&self, other: &DisplayRange) -> bool {
        self.min.to_bits() == other.min.to_bits() && self.max.to_bits() == other.max.to_bits()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DefinitionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("toml write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("invalid definition: {0}")]
    Invalid(#[from] SettingsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Toml,
}

fn format_for(path: &Path) -> FileFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => FileFormat::Toml,
        _ => FileFormat::Json,
    }
}

impl ChartDefinition {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.phase_axis.validate()?;
        self.engine.validate()?;
        validation::validate_range(&self.display_range)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DefinitionError> {
        let path = path.as_ref();
        let data = match format_for(path) {
            FileFormat::Json => serde_json::to_vec_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?.into_bytes(),
        };
        fs::write(path, data)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let definition: ChartDefinition = match format_for(path) {
            FileFormat::Json => serde_json::from_slice(&fs::read(path)?)?,
            FileFormat::Toml => toml::from_str(&fs::read_to_string(path)?)?,
        };
        definition.validate()?;
        Ok(definition)
    }
}
