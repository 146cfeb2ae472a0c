use crate::{DisplayRange, EngineSettings, PhaseAxis};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("phase axis needs at least one point")]
    NoPhasePoints,
    #[error("phase span must be positive (min {min}, max {max})")]
    EmptyPhaseSpan { min: f64, max: f64 },
    #[error("cycle window must hold at least one cycle")]
    NoCycles,
    #[error("amplitude axis needs at least one bin")]
    NoAmplitudeBins,
    #[error("reconcile interval must be at least one cycle")]
    NoReconcileInterval,
    #[error("plot extent must be positive and finite")]
    InvalidPlotExtent,
    #[error("display range bounds must be finite (min {min}, max {max})")]
    NonFiniteRange { min: f64, max: f64 },
}

impl PhaseAxis {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.point_count == 0 {
            return Err(SettingsError::NoPhasePoints);
        }
        let finite = self.phase_min.is_finite() && self.phase_max.is_finite();
        if !finite || self.phase_max <= self.phase_min {
            return Err(SettingsError::EmptyPhaseSpan {
                min: self.phase_min,
                max: self.phase_max,
            });
        }
        Ok(())
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_cycles == 0 {
            return Err(SettingsError::NoCycles);
        }
        if self.amplitude_bins == 0 {
            return Err(SettingsError::NoAmplitudeBins);
        }
        if self.reconcile_interval == 0 {
            return Err(SettingsError::NoReconcileInterval);
        }
        let extents = [self.plot_width, self.plot_height, self.point_scale];
        if extents.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(SettingsError::InvalidPlotExtent);
        }
        Ok(())
    }
}

/// A degenerate (zero-width or inverted) range is accepted; only non-finite bounds are rejected.
pub fn validate_range(range: &DisplayRange) -> Result<(), SettingsError> {
    if !range.min.is_finite() || !range.max.is_finite() {
        return Err(SettingsError::NonFiniteRange {
            min: range.min,
            max: range.max,
        });
    }
    Ok(())
}
