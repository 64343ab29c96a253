//! Per-tick output handed to renderers and drivers

use crate::core_types::{CellState, TerrainKind};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// State codes for every grid cell at one tick
///
/// Codes: 0..=3 burning stages, 4 burnt, 5 grass, 6 brush, 7 tree, 8 water,
/// 9 empty border.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateGrid {
    nx: usize,
    ny: usize,
    /// Row-major order: `[y * nx + x]`, `ny` rows of `nx` codes
    codes: Vec<u8>,
}

impl StateGrid {
    pub(crate) fn new(nx: usize, ny: usize, codes: Vec<u8>) -> Self {
        debug_assert_eq!(codes.len(), nx * ny);
        StateGrid { nx, ny, codes }
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Code at `(x, y)`, `None` outside the grid
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.nx && y < self.ny).then(|| self.codes[y * self.nx + x])
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.codes
    }

    /// Rows of `nx` codes, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.codes.chunks(self.nx.max(1))
    }
}

/// Aggregate fire statistics at one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FireStats {
    /// Ticks stepped so far
    pub tick: u64,
    /// Cells currently in the fire frontier
    pub burning: usize,
    /// Cells burnt out
    pub burnt: usize,
    /// Flammable cells not yet reached by the fire
    pub unburnt: usize,
    /// Burnt cells keyed by the terrain kind they started as
    pub burnt_by_kind: FxHashMap<TerrainKind, usize>,
}

impl FireStats {
    /// No cell is burning, so no further change can happen
    pub fn is_extinguished(&self) -> bool {
        self.burning == 0
    }

    /// Share of flammable cells burning or burnt
    pub fn affected_fraction(&self) -> f32 {
        let total = self.burning + self.burnt + self.unburnt;
        if total == 0 {
            return 0.0;
        }
        (self.burning + self.burnt) as f32 / total as f32
    }

    pub(crate) fn record(&mut self, kind: TerrainKind, state: CellState) {
        match state {
            CellState::Burning(_) => self.burning += 1,
            CellState::Burnt => {
                self.burnt += 1;
                *self.burnt_by_kind.entry(kind).or_default() += 1;
            }
            CellState::Alive(alive) if alive.is_flammable() => self.unburnt += 1,
            CellState::Alive(_) => {}
        }
    }
}
