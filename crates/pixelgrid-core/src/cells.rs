#![forbid(unsafe_code)]

//! Lit-cell bookkeeping for the fixed 3×3 grid.
//!
//! Cell `i` sits at row `i / 3`, column `i % 3`. Bit `i` of a [`CellMask`]
//! is set while that cell is in the "on" visual state.

use bitflags::bitflags;

use crate::preset::CELL_COUNT;

bitflags! {
    /// Set of lit cells, one bit per cell index.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellMask: u16 {
        const CELL_0 = 1 << 0;
        const CELL_1 = 1 << 1;
        const CELL_2 = 1 << 2;
        const CELL_3 = 1 << 3;
        const CELL_4 = 1 << 4;
        const CELL_5 = 1 << 5;
        const CELL_6 = 1 << 6;
        const CELL_7 = 1 << 7;
        const CELL_8 = 1 << 8;
    }
}

impl CellMask {
    /// Mask for a single cell. Indices past the grid produce an empty mask.
    #[must_use]
    pub fn cell(index: usize) -> Self {
        if index >= CELL_COUNT {
            return Self::empty();
        }
        Self::from_bits_truncate(1 << index)
    }

    /// Whether cell `index` is lit.
    #[must_use]
    pub fn is_lit(self, index: usize) -> bool {
        index < CELL_COUNT && self.contains(Self::cell(index))
    }

    /// Number of lit cells.
    #[must_use]
    pub fn lit_count(self) -> usize {
        self.bits().count_ones() as usize
    }

    /// Indices of lit cells in ascending order.
    pub fn lit_indices(self) -> impl Iterator<Item = usize> {
        (0..CELL_COUNT).filter(move |&i| self.is_lit(i))
    }
}
