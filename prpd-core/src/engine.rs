use prpd_config::{validation, ChartDefinition, DisplayRange, EngineSettings, PhaseAxis};

use crate::amplitude::{AmplitudeMapper, BinIndex};
use crate::batches::BatchDraw;
use crate::cycle_buffer::CycleBuffer;
use crate::histogram::Histogram;
use crate::range::AmplitudeRangeProvider;
use crate::{CycleError, EngineError};

/// Streaming phase-resolved density accumulator.
///
/// Keeps the last `max_cycles` cycles, a `[phase][bin]` hit table over them
/// and the hit cells grouped by frequency for instanced drawing. Every
/// mutation is synchronous and `O(phase points)`, except for range and
/// phase-axis changes which rebuild from the retained raw samples.
///
/// Not thread-safe by itself; feed it from one thread, e.g. through
/// [`PrpdEngine::drain`](crate::PrpdEngine::drain).
#[derive(Debug)]
pub struct PrpdEngine {
    settings: EngineSettings,
    mapper: AmplitudeMapper,
    buffer: CycleBuffer,
    histogram: Histogram,
}

impl PrpdEngine {
    pub fn new(definition: &ChartDefinition) -> Result<Self, EngineError> {
        definition.validate()?;
        let axis = definition.phase_axis;
        let settings = definition.engine;
        Ok(Self {
            settings,
            mapper: AmplitudeMapper::new(axis, &settings, definition.display_range),
            buffer: CycleBuffer::new(settings.max_cycles, axis.point_count),
            histogram: Histogram::new(
                axis.point_count,
                settings.amplitude_bins,
                settings.max_frequency_mode,
                settings.reconcile_interval,
            ),
        })
    }

    /// Builds an engine whose initial display range comes from `provider`.
    pub fn with_range_provider(
        definition: &ChartDefinition,
        provider: &dyn AmplitudeRangeProvider,
    ) -> Result<Self, EngineError> {
        let mut definition = definition.clone();
        definition.display_range = provider.current_range();
        Self::new(&definition)
    }

    pub fn phase_axis(&self) -> PhaseAxis {
        self.mapper.axis()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn display_range(&self) -> DisplayRange {
        self.mapper.range()
    }

    pub fn cycle_count(&self) -> usize {
        self.buffer.len()
    }

    /// Color-scaling maximum. In periodic mode this may lag the true
    /// maximum after evictions until the next reconciliation.
    pub fn max_frequency(&self) -> u32 {
        self.histogram.max_frequency()
    }

    pub fn batch_count(&self) -> usize {
        self.histogram.batches().len()
    }

    /// Bins `samples` against the current range and adds them as the newest cycle.
    ///
    /// A cycle of the wrong length is rejected and leaves the engine untouched.
    pub fn add_cycle(&mut self, samples: &[f64]) -> Result<(), CycleError> {
        let expected = self.buffer.phase_points();
        if samples.len() != expected {
            log::warn!(
                "rejecting cycle with {} samples (expected {expected})",
                samples.len()
            );
            return Err(CycleError::InvalidLength {
                expected,
                actual: samples.len(),
            });
        }

        let bins: Vec<BinIndex> = samples
            .iter()
            .map(|&amplitude| self.mapper.bin_index(amplitude))
            .collect();
        let evicted = self.buffer.push(samples.to_vec(), bins)?;

        if let Some(old) = evicted {
            self.histogram.evict_cycle(old.bins(), &self.mapper);
        }
        if let Some(newest) = self.buffer.newest() {
            self.histogram.insert_cycle(newest.bins(), &self.mapper);
        }
        Ok(())
    }

    /// Drops every cycle, count and batch.
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.histogram.reset();
        log::info!("density chart reset");
    }

    /// Switches to a new amplitude window and rebuilds from the retained cycles.
    pub fn set_display_range(&mut self, min: f64, max: f64) {
        let range = DisplayRange::new(min, max);
        if let Err(err) = validation::validate_range(&range) {
            log::warn!("{err}; degenerate binning will apply");
        }
        self.mapper.set_range(range);
        self.rebuild();
    }

    /// Applies the provider's range if it differs from the current one.
    /// Returns whether a rebuild happened.
    ///
    /// Bounds are compared bitwise, so a provider stuck on a NaN bound
    /// triggers one rebuild rather than one per poll.
    pub fn sync_range(&mut self, provider: &dyn AmplitudeRangeProvider) -> bool {
        let range = provider.current_range();
        let current = self.mapper.range();
        if range == current || range.same_bounds(&current) {
            return false;
        }
        self.set_display_range(range.min, range.max);
        true
    }

    /// Reconfigures the phase axis.
    ///
    /// Same point count: retained cycles are kept and re-laid out. A different
    /// point count changes the table shape, so retained cycles are dropped.
    pub fn set_phase_axis(&mut self, axis: PhaseAxis) -> Result<(), EngineError> {
        axis.validate()?;
        let current = self.mapper.axis();
        self.mapper.set_axis(axis);
        if axis.point_count == current.point_count {
            self.rebuild();
            return Ok(());
        }

        log::info!(
            "phase points changed {} -> {}; discarding {} retained cycles",
            current.point_count,
            axis.point_count,
            self.buffer.len()
        );
        self.buffer = CycleBuffer::new(self.settings.max_cycles, axis.point_count);
        self.histogram = Histogram::new(
            axis.point_count,
            self.settings.amplitude_bins,
            self.settings.max_frequency_mode,
            self.settings.reconcile_interval,
        );
        Ok(())
    }

    /// Re-bins every retained cycle against the current range and recounts
    /// the table and batches from scratch.
    pub fn rebuild(&mut self) {
        let mapper = &self.mapper;
        self.buffer.rebin_all(|raw| mapper.bin_index(raw));
        self.histogram
            .rebuild(self.buffer.iter().map(|cycle| cycle.bins()), &self.mapper);
        log::debug!(
            "rebuilt density from {} cycles into {} batches",
            self.buffer.len(),
            self.histogram.batches().len()
        );
    }

    /// Visits each frequency batch with its color and flat transform list.
    ///
    /// Nothing is visited while the chart is empty.
    pub fn for_each_render_batch<F>(&mut self, visitor: F)
    where
        F: FnMut(BatchDraw<'_>),
    {
        self.histogram.for_each_batch(visitor);
    }
}
