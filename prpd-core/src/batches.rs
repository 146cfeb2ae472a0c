use std::collections::BTreeMap;

use crate::amplitude::Transform;
use crate::color::{color_for, Rgba};
use crate::frequency::Cell;

/// Cells currently sharing one frequency.
///
/// `transforms` is the flat, instancing-ready copy of `cells` in cell order;
/// it is only refreshed when the batch is visited while `dirty`.
#[derive(Debug, Default)]
struct RenderBatch {
    cells: BTreeMap<Cell, Transform>,
    transforms: Vec<Transform>,
    dirty: bool,
}

impl RenderBatch {
    fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.transforms.clear();
        self.transforms.extend(self.cells.values().copied());
        self.dirty = false;
    }
}

/// What a draw-time visitor receives for one batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchDraw<'a> {
    pub frequency: u32,
    pub color: Rgba,
    pub transforms: &'a [Transform],
}

/// Partition of all hit cells keyed by their current frequency.
///
/// Frequency 0 stands for "in no batch" in `move_cell`.
#[derive(Debug, Default)]
pub struct RenderBatchMap {
    batches: BTreeMap<u32, RenderBatch>,
}

impl RenderBatchMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }

    /// Highest populated frequency; exact at all times.
    pub fn highest_frequency(&self) -> Option<u32> {
        self.batches.keys().next_back().copied()
    }

    fn remove(&mut self, cell: Cell, frequency: u32) -> Option<Transform> {
        let batch = self.batches.get_mut(&frequency)?;
        let removed = batch.cells.remove(&cell);
        if batch.cells.is_empty() {
            self.batches.remove(&frequency);
        } else if removed.is_some() {
            batch.dirty = true;
        }
        removed
    }

    fn insert(&mut self, cell: Cell, frequency: u32, transform: Transform) {
        let batch = self.batches.entry(frequency).or_default();
        batch.cells.insert(cell, transform);
        batch.dirty = true;
    }

    /// Moves `cell` from the `old_frequency` batch to the `new_frequency` batch.
    pub fn move_cell(
        &mut self,
        cell: Cell,
        old_frequency: u32,
        new_frequency: u32,
        transform: Transform,
    ) {
        if old_frequency > 0 {
            let removed = self.remove(cell, old_frequency);
            debug_assert!(
                removed.is_some(),
                "cell {cell:?} missing from batch {old_frequency}"
            );
        }
        if new_frequency > 0 {
            self.insert(cell, new_frequency, transform);
        }
    }

    /// Visits every non-empty batch in ascending frequency order.
    pub fn for_each_batch<F>(&mut self, max_frequency: u32, mut visitor: F)
    where
        F: FnMut(BatchDraw<'_>),
    {
        if max_frequency == 0 {
            return;
        }
        for (&frequency, batch) in self.batches.iter_mut() {
            batch.refresh();
            visitor(BatchDraw {
                frequency,
                color: color_for(frequency, max_frequency),
                transforms: &batch.transforms,
            });
        }
    }

    /// Every (cell, frequency) membership, sorted by cell.
    pub fn assignments(&self) -> Vec<(Cell, u32)> {
        let mut out: Vec<(Cell, u32)> = self
            .batches
            .iter()
            .flat_map(|(&frequency, batch)| batch.cells.keys().map(move |&cell| (cell, frequency)))
            .collect();
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(x: f32) -> Transform {
        Transform {
            x,
            y: 0.0,
            scale: 1.0,
        }
    }

    #[test]
    fn move_cell_creates_and_deletes_partitions() {
        let mut map = RenderBatchMap::new();
        let a = Cell { phase: 0, bin: 0 };
        let b = Cell { phase: 1, bin: 0 };

        map.move_cell(a, 0, 1, t(0.0));
        map.move_cell(b, 0, 1, t(1.0));
        assert_eq!(map.len(), 1);

        map.move_cell(a, 1, 2, t(0.0));
        assert_eq!(map.len(), 2);
        assert_eq!(map.highest_frequency(), Some(2));

        map.move_cell(a, 2, 0, t(0.0));
        assert_eq!(map.len(), 1);
        assert_eq!(map.assignments(), vec![(b, 1)]);

        map.move_cell(b, 1, 0, t(1.0));
        assert!(map.is_empty());
    }

    #[test]
    fn flat_list_follows_cell_order_not_insertion_order() {
        let cells = [
            Cell { phase: 7, bin: 2 },
            Cell { phase: 0, bin: 9 },
            Cell { phase: 3, bin: 0 },
            Cell { phase: 0, bin: 1 },
        ];
        let mut forward = RenderBatchMap::new();
        let mut backward = RenderBatchMap::new();
        for &cell in &cells {
            forward.move_cell(cell, 0, 1, t((cell.phase * 10 + cell.bin) as f32));
        }
        for &cell in cells.iter().rev() {
            backward.move_cell(cell, 0, 1, t((cell.phase * 10 + cell.bin) as f32));
        }

        let mut a = Vec::new();
        let mut b = Vec::new();
        forward.for_each_batch(1, |batch| a.extend(batch.transforms.iter().map(|t| t.x)));
        backward.for_each_batch(1, |batch| b.extend(batch.transforms.iter().map(|t| t.x)));
        assert_eq!(a, b);
        assert_eq!(a, vec![1.0, 9.0, 30.0, 72.0]);
    }

    #[test]
    fn dirty_batches_rebuild_their_flat_list() {
        let mut map = RenderBatchMap::new();
        let a = Cell { phase: 0, bin: 0 };
        let b = Cell { phase: 1, bin: 0 };
        map.move_cell(a, 0, 1, t(0.0));

        let mut seen = Vec::new();
        map.for_each_batch(1, |batch| seen.push(batch.transforms.len()));
        assert_eq!(seen, vec![1]);

        map.move_cell(b, 0, 1, t(1.0));
        seen.clear();
        map.for_each_batch(1, |batch| seen.push(batch.transforms.len()));
        assert_eq!(seen, vec![2]);
    }

    #[test]
    fn zero_max_skips_iteration() {
        let mut map = RenderBatchMap::new();
        map.move_cell(Cell { phase: 0, bin: 0 }, 0, 1, t(0.0));
        let mut visits = 0;
        map.for_each_batch(0, |_| visits += 1);
        assert_eq!(visits, 0);
    }

    #[test]
    fn batches_are_visited_coldest_first_with_scaled_color() {
        let mut map = RenderBatchMap::new();
        map.move_cell(Cell { phase: 0, bin: 0 }, 0, 4, t(0.0));
        map.move_cell(Cell { phase: 1, bin: 0 }, 0, 1, t(1.0));
        let mut seen = Vec::new();
        map.for_each_batch(4, |batch| seen.push((batch.frequency, batch.color)));
        assert_eq!(seen[0], (1, color_for(1, 4)));
        assert_eq!(seen[1], (4, color_for(4, 4)));
    }
}
