use prpd_config::{DisplayRange, EngineSettings, PhaseAxis};
use serde::Serialize;

use crate::frequency::Cell;

/// Spans narrower than this are treated as degenerate.
pub const RANGE_EPSILON: f64 = 1e-9;

pub type BinIndex = usize;

/// Maps `amplitude` onto `[0, bins)` against `[display_min, display_max]`.
///
/// Values at or below the minimum land in bin 0, values at or above the
/// maximum in the last bin. A degenerate (or inverted) range maps everything
/// to the middle bin. NaN lands in bin 0.
pub fn bin_index_of(amplitude: f64, display_min: f64, display_max: f64, bins: usize) -> BinIndex {
    let last = bins.saturating_sub(1);
    let span = display_max - display_min;
    if !(span >= RANGE_EPSILON) {
        return bins / 2;
    }
    if amplitude >= display_max {
        return last;
    }
    if !(amplitude > display_min) {
        return 0;
    }
    let normalized = (amplitude - display_min) / span;
    ((normalized * bins as f64).floor() as usize).min(last)
}

pub fn bin_center_amplitude(bin: BinIndex, display_min: f64, display_max: f64, bins: usize) -> f64 {
    let bins = bins.max(1) as f64;
    display_min + (bin as f64 + 0.5) / bins * (display_max - display_min)
}

/// Position and size of one drawable point instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// Binning and plot-space mapping for one chart configuration.
#[derive(Debug, Clone)]
pub struct AmplitudeMapper {
    axis: PhaseAxis,
    range: DisplayRange,
    bins: usize,
    plot_width: f64,
    plot_height: f64,
    point_scale: f64,
}

impl AmplitudeMapper {
    pub fn new(axis: PhaseAxis, settings: &EngineSettings, range: DisplayRange) -> Self {
        Self {
            axis,
            range,
            bins: settings.amplitude_bins,
            plot_width: settings.plot_width,
            plot_height: settings.plot_height,
            point_scale: settings.point_scale,
        }
    }

    pub fn range(&self) -> DisplayRange {
        self.range
    }

    pub fn set_range(&mut self, range: DisplayRange) {
        self.range = range;
    }

    pub fn axis(&self) -> PhaseAxis {
        self.axis
    }

    pub fn set_axis(&mut self, axis: PhaseAxis) {
        self.axis = axis;
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn bin_index(&self, amplitude: f64) -> BinIndex {
        bin_index_of(amplitude, self.range.min, self.range.max, self.bins)
    }

    pub fn bin_center(&self, bin: BinIndex) -> f64 {
        bin_center_amplitude(bin, self.range.min, self.range.max, self.bins)
    }

    pub fn phase_to_plot_x(&self, phase: f64) -> f64 {
        let span = self.axis.phase_max - self.axis.phase_min;
        if !(span >= RANGE_EPSILON) {
            return 0.0;
        }
        ((phase - self.axis.phase_min) / span).clamp(0.0, 1.0) * self.plot_width
    }

    /// Below-range amplitudes sit on the axis origin, above-range ones on the axis maximum.
    pub fn amplitude_to_plot_y(&self, amplitude: f64) -> f64 {
        let span = self.range.span();
        if !(span >= RANGE_EPSILON) {
            return self.plot_height * 0.5;
        }
        if amplitude >= self.range.max {
            return self.plot_height;
        }
        if !(amplitude > self.range.min) {
            return 0.0;
        }
        (amplitude - self.range.min) / span * self.plot_height
    }

    pub fn cell_transform(&self, cell: Cell) -> Transform {
        let x = self.phase_to_plot_x(self.axis.phase_at(cell.phase));
        let y = self.amplitude_to_plot_y(self.bin_center(cell.bin));
        Transform {
            x: x as f32,
            y: y as f32,
            scale: self.point_scale as f32,
        }
    }
}
