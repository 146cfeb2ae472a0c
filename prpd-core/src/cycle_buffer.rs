use crate::amplitude::BinIndex;
use crate::CycleError;

/// One retained cycle: raw samples plus the bin index each sample fell into.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCycle {
    raw: Vec<f64>,
    bins: Vec<BinIndex>,
}

impl StoredCycle {
    pub fn raw(&self) -> &[f64] {
        &self.raw
    }

    pub fn bins(&self) -> &[BinIndex] {
        &self.bins
    }
}

/// Fixed-capacity ring of cycles; once full, each push overwrites the oldest slot.
#[derive(Debug)]
pub struct CycleBuffer {
    slots: Vec<StoredCycle>,
    capacity: usize,
    phase_points: usize,
    write_index: usize,
    full: bool,
}

impl CycleBuffer {
    pub fn new(capacity: usize, phase_points: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            phase_points,
            write_index: 0,
            full: false,
        }
    }

    pub fn phase_points(&self) -> usize {
        self.phase_points
    }

    pub fn len(&self) -> usize {
        if self.full {
            self.capacity
        } else {
            self.write_index
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Stores a cycle and returns the one it displaced, if the buffer was already full.
    pub fn push(
        &mut self,
        raw: Vec<f64>,
        bins: Vec<BinIndex>,
    ) -> Result<Option<StoredCycle>, CycleError> {
        if raw.len() != self.phase_points {
            return Err(CycleError::InvalidLength {
                expected: self.phase_points,
                actual: raw.len(),
            });
        }
        if bins.len() != self.phase_points {
            return Err(CycleError::InvalidLength {
                expected: self.phase_points,
                actual: bins.len(),
            });
        }

        let cycle = StoredCycle { raw, bins };
        let evicted = if self.full {
            Some(std::mem::replace(&mut self.slots[self.write_index], cycle))
        } else {
            debug_assert_eq!(self.write_index, self.slots.len());
            self.slots.push(cycle);
            None
        };

        self.write_index = (self.write_index + 1) % self.capacity;
        if self.write_index == 0 {
            self.full = true;
        }
        Ok(evicted)
    }

    /// Most recently pushed cycle.
    pub fn newest(&self) -> Option<&StoredCycle> {
        if self.is_empty() {
            return None;
        }
        let idx = (self.write_index + self.capacity - 1) % self.capacity;
        self.slots.get(idx)
    }

    /// Retained cycles, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &StoredCycle> + '_ {
        let (start, len) = if self.full {
            (self.write_index, self.capacity)
        } else {
            (0, self.write_index)
        };
        (0..len).filter_map(move |i| self.slots.get((start + i) % self.capacity))
    }

    /// Recomputes every retained cycle's bin indices from its raw samples.
    pub fn rebin_all<F>(&mut self, mut bin_of: F)
    where
        F: FnMut(f64) -> BinIndex,
    {
        let len = self.len();
        for cycle in self.slots.iter_mut().take(len) {
            for (bin, raw) in cycle.bins.iter_mut().zip(cycle.raw.iter()) {
                *bin = bin_of(*raw);
            }
        }
    }

    pub fn reset(&mut self) {
        self.slots.clear();
        self.write_index = 0;
        self.full = false;
    }
}
