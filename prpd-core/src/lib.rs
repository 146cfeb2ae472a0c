pub mod amplitude;
pub mod batches;
pub mod color;
pub mod cycle_buffer;
pub mod engine;
pub mod feed;
pub mod frequency;
mod histogram;
pub mod range;

pub use amplitude::{bin_center_amplitude, bin_index_of, AmplitudeMapper, BinIndex, Transform};
pub use batches::BatchDraw;
pub use color::{color_for, Rgba};
pub use engine::PrpdEngine;
pub use feed::{ChartMessage, DrainReport};
pub use frequency::Cell;
pub use range::{AmplitudeRangeProvider, FixedRange};

pub use prpd_config::{ChartDefinition, DisplayRange, EngineSettings, MaxFrequencyMode, PhaseAxis};

use prpd_config::SettingsError;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    #[error("cycle has {actual} samples, expected {expected}")]
    InvalidLength { expected: usize, actual: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Cycle(#[from] CycleError),
}
