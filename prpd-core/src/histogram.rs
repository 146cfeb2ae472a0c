use prpd_config::MaxFrequencyMode;

use crate::amplitude::{AmplitudeMapper, BinIndex};
use crate::batches::{BatchDraw, RenderBatchMap};
use crate::frequency::{Cell, FrequencyTable};

/// Frequency table and render batches kept in step, one cycle at a time.
#[derive(Debug)]
pub(crate) struct Histogram {
    table: FrequencyTable,
    batches: RenderBatchMap,
    max_frequency: u32,
    mode: MaxFrequencyMode,
    reconcile_interval: u64,
    inserted: u64,
}

impl Histogram {
    pub(crate) fn new(
        phase_points: usize,
        bins: usize,
        mode: MaxFrequencyMode,
        reconcile_interval: u64,
    ) -> Self {
        Self {
            table: FrequencyTable::new(phase_points, bins),
            batches: RenderBatchMap::new(),
            max_frequency: 0,
            mode,
            reconcile_interval: reconcile_interval.max(1),
            inserted: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub(crate) fn batches(&self) -> &RenderBatchMap {
        &self.batches
    }

    pub(crate) fn max_frequency(&self) -> u32 {
        match self.mode {
            MaxFrequencyMode::Periodic => self.max_frequency,
            MaxFrequencyMode::Exact => self.batches.highest_frequency().unwrap_or(0),
        }
    }

    pub(crate) fn evict_cycle(&mut self, bins: &[BinIndex], mapper: &AmplitudeMapper) {
        for (phase, &bin) in bins.iter().enumerate() {
            let cell = Cell { phase, bin };
            let count = self.table.decrement(cell);
            self.batches
                .move_cell(cell, count + 1, count, mapper.cell_transform(cell));
        }
    }

    pub(crate) fn insert_cycle(&mut self, bins: &[BinIndex], mapper: &AmplitudeMapper) {
        for (phase, &bin) in bins.iter().enumerate() {
            let cell = Cell { phase, bin };
            let count = self.table.increment(cell);
            self.batches
                .move_cell(cell, count - 1, count, mapper.cell_transform(cell));
            self.max_frequency = self.max_frequency.max(count);
        }
        self.inserted += 1;
        if self.inserted % self.reconcile_interval == 0 {
            self.reconcile();
        }
    }

    /// Replaces the tracked maximum with the exact one.
    pub(crate) fn reconcile(&mut self) {
        let exact = self.table.scan_max();
        if exact != self.max_frequency {
            log::debug!(
                "max frequency reconciled {} -> {exact}",
                self.max_frequency
            );
        }
        self.max_frequency = exact;
    }

    /// Recounts everything from the given cycles' bin indices.
    pub(crate) fn rebuild<'a, I>(&mut self, cycles: I, mapper: &AmplitudeMapper)
    where
        I: IntoIterator<Item = &'a [BinIndex]>,
    {
        self.table.clear();
        self.batches.clear();
        for bins in cycles {
            for (phase, &bin) in bins.iter().enumerate() {
                self.table.increment(Cell { phase, bin });
            }
        }
        for (cell, count) in self.table.iter_hits() {
            self.batches
                .move_cell(cell, 0, count, mapper.cell_transform(cell));
        }
        self.max_frequency = self.table.scan_max();
    }

    pub(crate) fn reset(&mut self) {
        self.table.clear();
        self.batches.clear();
        self.max_frequency = 0;
        self.inserted = 0;
    }

    pub(crate) fn for_each_batch<F>(&mut self, visitor: F)
    where
        F: FnMut(BatchDraw<'_>),
    {
        let max_frequency = self.max_frequency();
        self.batches.for_each_batch(max_frequency, visitor);
    }
}
