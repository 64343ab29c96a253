//! Terrain classification grid
//!
//! Row-major `nx × ny` array of [`TerrainKind`]s. The outer ring of cells is
//! permanently [`TerrainKind::Empty`] and acts as a firebreak; only the interior
//! `[1, nx-2] × [1, ny-2]` carries vegetation or water.

use crate::core_types::TerrainKind;
use serde::{Deserialize, Serialize};

/// Displacements from a cell to its eight nearest neighbours, in evaluation order
pub const NEIGHBOURHOOD: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Terrain kinds for a whole grid, border included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainGrid {
    nx: usize,
    ny: usize,
    /// Row-major order: `[y * nx + x]`
    kinds: Vec<TerrainKind>,
}

impl TerrainGrid {
    /// Grid with every cell Empty
    pub fn empty(nx: usize, ny: usize) -> Self {
        TerrainGrid {
            nx,
            ny,
            kinds: vec![TerrainKind::Empty; nx * ny],
        }
    }

    /// Grid whose interior is filled with a single kind
    pub fn filled(nx: usize, ny: usize, kind: TerrainKind) -> Self {
        let mut grid = Self::empty(nx, ny);
        for (x, y) in grid.interior() {
            grid.set(x, y, kind);
        }
        grid
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Kinds in row-major order
    #[inline]
    pub fn as_slice(&self) -> &[TerrainKind] {
        &self.kinds
    }

    /// Kind at `(x, y)`, Empty outside the grid
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> TerrainKind {
        if x < self.nx && y < self.ny {
            self.kinds[y * self.nx + x]
        } else {
            TerrainKind::Empty
        }
    }

    /// Set the kind of an interior cell; border writes are ignored
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, kind: TerrainKind) {
        if self.is_interior(x, y) {
            self.kinds[y * self.nx + x] = kind;
        }
    }

    /// Whether `(x, y)` lies inside the border ring
    #[inline]
    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        x >= 1 && y >= 1 && x + 1 < self.nx && y + 1 < self.ny
    }

    /// Interior coordinates in row-major order
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize)> {
        let (nx, ny) = (self.nx, self.ny);
        (1..ny.saturating_sub(1)).flat_map(move |y| (1..nx.saturating_sub(1)).map(move |x| (x, y)))
    }

    /// Count of `kind` among the eight neighbours of `(x, y)`
    pub fn count_neighbours(&self, x: usize, y: usize, kind: TerrainKind) -> usize {
        NEIGHBOURHOOD
            .iter()
            .filter_map(|&(dx, dy)| offset(x, y, dx, dy))
            .filter(|&(cx, cy)| self.get(cx, cy) == kind)
            .count()
    }

    /// Number of interior cells of `kind`
    pub fn count(&self, kind: TerrainKind) -> usize {
        self.kinds.iter().filter(|&&k| k == kind).count()
    }
}

/// `(x + dx, y + dy)` if it does not underflow
#[inline]
pub fn offset(x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
    Some((x.checked_add_signed(dx)?, y.checked_add_signed(dy)?))
}
