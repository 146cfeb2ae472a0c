use serde::Serialize;

/// One histogram bucket: a phase index paired with an amplitude bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cell {
    pub phase: usize,
    pub bin: usize,
}

/// Dense `[phase][bin]` hit counter.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    phase_points: usize,
    bins: usize,
    counts: Vec<u32>,
}

impl FrequencyTable {
    pub fn new(phase_points: usize, bins: usize) -> Self {
        Self {
            phase_points,
            bins,
            counts: vec![0; phase_points * bins],
        }
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        debug_assert!(cell.phase < self.phase_points && cell.bin < self.bins);
        cell.phase * self.bins + cell.bin
    }

    pub fn get(&self, cell: Cell) -> u32 {
        self.counts[self.index(cell)]
    }

    /// Returns the new count.
    pub fn increment(&mut self, cell: Cell) -> u32 {
        let idx = self.index(cell);
        self.counts[idx] += 1;
        self.counts[idx]
    }

    /// Returns the new count. Decrementing an empty cell is a bookkeeping bug.
    pub fn decrement(&mut self, cell: Cell) -> u32 {
        let idx = self.index(cell);
        debug_assert!(self.counts[idx] > 0, "decrement of empty cell {cell:?}");
        self.counts[idx] = self.counts[idx].saturating_sub(1);
        self.counts[idx]
    }

    pub fn scan_max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    /// Cells with a non-zero count, in phase-major order.
    pub fn iter_hits(&self) -> impl Iterator<Item = (Cell, u32)> + '_ {
        let bins = self.bins.max(1);
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(move |(idx, &count)| {
                (
                    Cell {
                        phase: idx / bins,
                        bin: idx % bins,
                    },
                    count,
                )
            })
    }
}
