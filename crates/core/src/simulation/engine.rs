//! Stochastic fire spread over an 8-neighbourhood grid
//!
//! The engine owns one [`Cell`] per interior coordinate and a frontier of
//! burning cells. Each [`FireSpreadEngine::step`]:
//!
//! 1. drops frontier entries that have burnt out,
//! 2. lets every frontier cell try to ignite each unburned flammable
//!    neighbour with probability `base(source, neighbour) × intensity(source)`,
//!    then advances the source by one tick,
//! 3. appends the newly ignited cells to the frontier.
//!
//! Cells ignited during a sweep only join the frontier after it, so fire moves
//! at most one cell per tick. The border ring is never instantiated and acts as
//! a firebreak.

use super::snapshot::{FireStats, StateGrid};
use crate::config::{WindConfig, MIN_GRID_SIDE};
use crate::core_types::{CellState, TerrainKind};
use crate::error::{ConfigError, InvariantViolation};
use crate::grid::{offset, Cell, TerrainGrid, NEIGHBOURHOOD};
use rand::Rng;
use std::ops::Index;
use tracing::{debug, info, warn};

/// Cellular fire automaton
#[derive(Debug, Clone)]
pub struct FireSpreadEngine<R: Rng> {
    nx: usize,
    ny: usize,
    /// Interior cells, row-major: `[(y - 1) * (nx - 2) + (x - 1)]`
    cells: Vec<Cell>,
    /// Indices into `cells` of the burning cells, in ignition order
    frontier: Vec<usize>,
    wind: WindConfig,
    rng: R,
    tick: u64,
}

impl<R: Rng> FireSpreadEngine<R> {
    /// Build the engine and ignite one random flammable interior cell
    ///
    /// # Errors
    ///
    /// [`ConfigError::GridTooSmall`] if the terrain has no interior.
    pub fn new(terrain: &TerrainGrid, wind: WindConfig, rng: R) -> Result<Self, ConfigError> {
        let mut engine = Self::from_terrain(terrain, wind, rng)?;
        engine.ignite_random();
        Ok(engine)
    }

    /// Build the engine without igniting anything
    ///
    /// # Errors
    ///
    /// [`ConfigError::GridTooSmall`] if the terrain has no interior.
    pub fn from_terrain(
        terrain: &TerrainGrid,
        wind: WindConfig,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let (nx, ny) = (terrain.nx(), terrain.ny());
        if nx < MIN_GRID_SIDE || ny < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall {
                nx,
                ny,
                min: MIN_GRID_SIDE,
            });
        }

        let cells: Vec<Cell> = terrain
            .interior()
            .map(|(x, y)| Cell::new(terrain.get(x, y), x, y))
            .collect();

        info!(
            "Fire engine initialized: {}x{} grid, {} cells, \
             wind {:.1} km/h from {:.0} deg (not applied to spread)",
            nx,
            ny,
            cells.len(),
            wind.speed,
            wind.bearing
        );

        Ok(Self {
            nx,
            ny,
            cells,
            frontier: Vec::new(),
            wind,
            rng,
            tick: 0,
        })
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Ticks stepped so far
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Wind the engine was configured with; carried but not applied to spread
    #[inline]
    pub fn wind(&self) -> WindConfig {
        self.wind
    }

    /// Index of an interior coordinate, `None` for the border and beyond
    #[inline]
    fn slot(&self, x: usize, y: usize) -> Option<usize> {
        let inner = self.nx - 2;
        (x >= 1 && y >= 1 && x <= inner && y + 1 < self.ny).then(|| (y - 1) * inner + (x - 1))
    }

    /// Cell at `(x, y)`, `None` on the border
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.slot(x, y).map(|i| &self.cells[i])
    }

    /// Index of a coordinate the caller guarantees is interior
    fn interior_slot(&self, x: usize, y: usize) -> usize {
        let Some(i) = self.slot(x, y) else {
            panic!(
                "{}",
                InvariantViolation::OutOfInterior {
                    x,
                    y,
                    nx: self.nx,
                    ny: self.ny,
                }
            );
        };
        i
    }

    /// All instantiated cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// State at `(x, y)`; border and out-of-range coordinates are Empty
    pub fn state_at(&self, x: usize, y: usize) -> CellState {
        self.cell(x, y)
            .map_or(CellState::Alive(TerrainKind::Empty), Cell::get_state)
    }

    /// Burning cells, in the order they will be swept
    pub fn frontier(&self) -> impl Iterator<Item = &Cell> {
        self.frontier.iter().map(|&i| &self.cells[i])
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// No cell is burning
    pub fn is_extinguished(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Ignite the cell at `(x, y)`
    ///
    /// Returns `false`, leaving the grid untouched, if the cell is on the
    /// border, is not flammable or is already burning or burnt.
    pub fn ignite_at(&mut self, x: usize, y: usize) -> bool {
        let Some(i) = self.slot(x, y) else {
            warn!("Ignoring ignition at ({}, {}): outside the interior", x, y);
            return false;
        };
        if !self.cells[i].get_state().is_ignitable() {
            warn!(
                "Ignoring ignition at ({}, {}): cell is {:?}",
                x,
                y,
                self.cells[i].get_state()
            );
            return false;
        }

        self.cells[i].burn();
        self.frontier.push(i);
        info!("Ignited fire at ({}, {})", x, y);
        true
    }

    /// Ignite one flammable interior cell chosen uniformly at random
    ///
    /// Returns the ignited position, or `None` if nothing can burn.
    pub fn ignite_random(&mut self) -> Option<(usize, usize)> {
        let candidates: Vec<usize> = (0..self.cells.len())
            .filter(|&i| self.cells[i].get_state().is_ignitable())
            .collect();
        if candidates.is_empty() {
            warn!("No flammable cell to ignite");
            return None;
        }

        let i = candidates[self.rng.random_range(0..candidates.len())];
        let (x, y) = self.cells[i].position();
        self.ignite_at(x, y).then_some((x, y))
    }

    /// Advance the fire by one tick
    ///
    /// Returns the number of cells ignited during the tick.
    pub fn step(&mut self) -> usize {
        // Lagged removal of cells that burnt out on the previous tick
        let cells = &self.cells;
        self.frontier.retain(|&i| cells[i].get_state().is_burning());

        let mut ignited = Vec::new();
        for f in 0..self.frontier.len() {
            let source = self.frontier[f];
            let (sx, sy) = self.cells[source].position();

            for &(dx, dy) in &NEIGHBOURHOOD {
                let Some(n) = offset(sx, sy, dx, dy).and_then(|(x, y)| self.slot(x, y)) else {
                    continue;
                };
                // Burning, burnt, water and empty neighbours are never drawn for
                let kind = match self.cells[n].get_state() {
                    CellState::Alive(kind) if kind.is_flammable() => kind,
                    _ => continue,
                };

                let u: f64 = self.rng.random();
                let p = self.cells[source].get_prob(kind);
                if u <= f64::from(p) {
                    self.cells[n].burn();
                    ignited.push(n);
                }
            }

            self.cells[source].burn();
        }

        let count = ignited.len();
        self.frontier.extend(ignited);
        // Cells that burnt out this tick leave now so observers see a closed frontier
        let cells = &self.cells;
        self.frontier.retain(|&i| cells[i].get_state().is_burning());
        self.tick += 1;

        debug!(
            "Tick {}: {} ignitions, {} cells burning",
            self.tick,
            count,
            self.frontier.len()
        );
        count
    }

    /// Step until the frontier empties or `max_ticks` have run
    ///
    /// Returns the number of ticks stepped.
    pub fn run_until_extinguished(&mut self, max_ticks: u64) -> u64 {
        let start = self.tick;
        while !self.is_extinguished() && self.tick - start < max_ticks {
            self.step();
        }
        self.tick - start
    }

    /// State codes for the whole grid, border included
    pub fn snapshot(&self) -> StateGrid {
        let mut codes = vec![TerrainKind::Empty.code(); self.nx * self.ny];
        for cell in &self.cells {
            codes[cell.y() * self.nx + cell.x()] = cell.get_state().code();
        }
        StateGrid::new(self.nx, self.ny, codes)
    }

    pub fn stats(&self) -> FireStats {
        let mut stats = FireStats {
            tick: self.tick,
            ..Default::default()
        };
        for cell in &self.cells {
            stats.record(cell.kind(), cell.get_state());
        }
        stats
    }

    /// Whether the frontier holds exactly the burning cells, each once
    pub fn frontier_is_closed(&self) -> bool {
        let burning = self.cells.iter().filter(|c| c.get_state().is_burning()).count();
        let mut seen = vec![false; self.cells.len()];
        for &i in &self.frontier {
            match self.cells.get(i) {
                Some(cell) if !seen[i] && cell.get_state().is_burning() => seen[i] = true,
                _ => return false,
            }
        }
        burning == self.frontier.len()
    }
}

/// Cell at an interior `(x, y)`
///
/// # Panics
///
/// Panics with [`InvariantViolation::OutOfInterior`] on the border or beyond;
/// use [`FireSpreadEngine::cell`] for a checked lookup.
impl<R: Rng> Index<(usize, usize)> for FireSpreadEngine<R> {
    type Output = Cell;

    fn index(&self, (x, y): (usize, usize)) -> &Cell {
        &self.cells[self.interior_slot(x, y)]
    }
}
