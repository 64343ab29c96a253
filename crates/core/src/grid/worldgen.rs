//! Procedural terrain generation
//!
//! Builds a [`TerrainGrid`] in three phases:
//!
//! 1. **Seeding** - every interior cell independently draws Tree, Brush or
//!    Grass from the configured densities. The result is uncorrelated noise.
//! 2. **Vegetation smoothing** - repeated majority-neighbour passes with
//!    hysteresis (4 neighbours to persist, 5 to convert) grow the noise into
//!    clustered patches.
//! 3. **Water carving** - non-overlapping body centres are rejection sampled,
//!    each body is filled as a sparse random disk, and edge-rounding passes with
//!    the same hysteresis close the disks into irregular lakes.
//!
//! Passes update the grid in place in row-major order, so later cells in a pass
//! see the earlier cells' new kinds.
//!
//! All randomness comes from the generator passed to [`TerrainGenerator::new`].

use super::terrain::TerrainGrid;
use crate::config::{within_radius, TerrainConfig};
use crate::core_types::TerrainKind;
use crate::error::{FireSimError, LayoutError};
use rand::Rng;
use tracing::{debug, info, trace};

/// Neighbours needed for a cell to keep its kind during smoothing
const PERSIST_THRESHOLD: usize = 4;
/// Neighbours needed for a cell to convert to a kind during smoothing
const CONVERT_THRESHOLD: usize = PERSIST_THRESHOLD + 1;

/// Candidate positions tried per water body centre
pub const MAX_CENTRE_ATTEMPTS: usize = 10_000;
/// Offset samples allowed per requested water cell
const FILL_ATTEMPTS_PER_CELL: usize = 200;
/// Lower bound on the blob fill sample budget
const MIN_FILL_ATTEMPTS: usize = 10_000;

/// Terrain generator driven by an injected random source
#[derive(Debug, Clone)]
pub struct TerrainGenerator<R: Rng> {
    config: TerrainConfig,
    rng: R,
}

impl<R: Rng> TerrainGenerator<R> {
    pub fn new(config: TerrainConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Give back the random source, e.g. to continue its stream elsewhere
    pub fn into_rng(self) -> R {
        self.rng
    }

    /// Generate an `nx × ny` terrain grid
    ///
    /// `iterations` is the number of vegetation smoothing passes. The
    /// configuration is validated against the grid size before any random draw.
    ///
    /// # Errors
    ///
    /// [`FireSimError::Config`] if the parameters do not fit the grid,
    /// [`FireSimError::Layout`] if water bodies cannot be placed or filled within
    /// their retry budgets.
    pub fn generate(
        &mut self,
        nx: usize,
        ny: usize,
        iterations: usize,
    ) -> Result<TerrainGrid, FireSimError> {
        self.config.validate(nx, ny)?;

        info!(
            "Generating {}x{} terrain: tree={:.3}, brush={:.3}, \
             {} smoothing passes, {} water bodies",
            nx,
            ny,
            self.config.tree_density,
            self.config.brush_density,
            iterations,
            self.config.water_bodies
        );

        let mut grid = TerrainGrid::empty(nx, ny);
        self.seed_vegetation(&mut grid);
        smooth_vegetation(&mut grid, iterations);
        debug!(
            "Vegetation after smoothing: grass={}, brush={}, tree={}",
            grid.count(TerrainKind::Grass),
            grid.count(TerrainKind::Brush),
            grid.count(TerrainKind::Tree)
        );

        self.carve_water(&mut grid)?;

        Ok(grid)
    }

    /// Fill the interior with an even mix of Grass, Brush and Tree
    ///
    /// No clustering and no water: each cell picks one of the three kinds with
    /// equal probability.
    ///
    /// # Errors
    ///
    /// [`FireSimError::Config`] if the grid has no interior.
    pub fn populate_uniform(&mut self, nx: usize, ny: usize) -> Result<TerrainGrid, FireSimError> {
        TerrainConfig::dry().validate(nx, ny)?;

        let mut grid = TerrainGrid::empty(nx, ny);
        for y in 1..ny - 1 {
            for x in 1..nx - 1 {
                let pick = self.rng.random_range(0..TerrainKind::FLAMMABLE.len());
                grid.set(x, y, TerrainKind::FLAMMABLE[pick]);
            }
        }
        debug!("Populated {}x{} terrain uniformly", nx, ny);
        Ok(grid)
    }

    /// Independent per-cell draw against the cumulative densities
    pub fn seed_vegetation(&mut self, grid: &mut TerrainGrid) {
        let tree = self.config.tree_density;
        let brush = tree + self.config.brush_density;

        for y in 1..grid.ny().saturating_sub(1) {
            for x in 1..grid.nx().saturating_sub(1) {
                let u: f32 = self.rng.random();
                let kind = if u <= tree {
                    TerrainKind::Tree
                } else if u <= brush {
                    TerrainKind::Brush
                } else {
                    TerrainKind::Grass
                };
                grid.set(x, y, kind);
            }
        }
    }

    /// Convert sparse random disks of water around non-overlapping centres, then
    /// round their edges
    ///
    /// Returns the accepted centres.
    ///
    /// # Errors
    ///
    /// [`LayoutError`] when a retry budget runs out.
    pub fn carve_water(
        &mut self,
        grid: &mut TerrainGrid,
    ) -> Result<Vec<(usize, usize)>, LayoutError> {
        if self.config.water_bodies == 0 {
            return Ok(Vec::new());
        }

        let underlying = grid.clone();
        let centres = self.place_centres(grid.nx(), grid.ny())?;
        for &centre in &centres {
            self.fill_blob(grid, centre)?;
        }
        round_water_edges(grid, &underlying, self.config.water_smoothing_passes);

        debug!(
            "Carved {} water bodies, {} water cells",
            centres.len(),
            grid.count(TerrainKind::Water)
        );
        Ok(centres)
    }

    /// Rejection-sample body centres at least one radius apart
    ///
    /// Centres keep one radius of margin from the border ring so every blob cell
    /// lands in the interior.
    ///
    /// # Errors
    ///
    /// [`LayoutError::CentrePlacementExhausted`] if any centre needs more than
    /// [`MAX_CENTRE_ATTEMPTS`] candidates.
    pub fn place_centres(
        &mut self,
        nx: usize,
        ny: usize,
    ) -> Result<Vec<(usize, usize)>, LayoutError> {
        let requested = self.config.water_bodies;
        let radius = self.config.water_radius();
        let margin = 1 + radius.floor() as usize;

        let mut centres: Vec<(usize, usize)> = Vec::with_capacity(requested);
        if nx < 2 * margin + 1 || ny < 2 * margin + 1 {
            return Err(LayoutError::CentrePlacementExhausted {
                placed: 0,
                requested,
                attempts: 0,
            });
        }
        let x_range = margin..=nx - 1 - margin;
        let y_range = margin..=ny - 1 - margin;

        while centres.len() < requested {
            let accepted = (0..MAX_CENTRE_ATTEMPTS).find_map(|_| {
                let candidate = (
                    self.rng.random_range(x_range.clone()),
                    self.rng.random_range(y_range.clone()),
                );
                centres
                    .iter()
                    .all(|&other| distance(candidate, other) >= f64::from(radius))
                    .then_some(candidate)
            });

            match accepted {
                Some(centre) => {
                    trace!("Water body centre at ({}, {})", centre.0, centre.1);
                    centres.push(centre);
                }
                None => {
                    return Err(LayoutError::CentrePlacementExhausted {
                        placed: centres.len(),
                        requested,
                        attempts: MAX_CENTRE_ATTEMPTS,
                    });
                }
            }
        }

        Ok(centres)
    }

    /// Convert random cells within one radius of `centre` to water until the
    /// fill target is reached
    ///
    /// Returns the number of cells converted.
    ///
    /// # Errors
    ///
    /// [`LayoutError::BlobFillExhausted`] if the target is not reached within
    /// the sample budget.
    pub fn fill_blob(
        &mut self,
        grid: &mut TerrainGrid,
        centre: (usize, usize),
    ) -> Result<usize, LayoutError> {
        let target = self.config.water_fill_target();
        let radius = self.config.water_radius();
        let reach = radius.floor() as i64;
        let budget = (target * FILL_ATTEMPTS_PER_CELL).max(MIN_FILL_ATTEMPTS);

        let mut filled = 0;
        let mut attempts = 0;
        while filled < target {
            if attempts == budget {
                return Err(LayoutError::BlobFillExhausted {
                    centre,
                    filled,
                    target,
                    attempts,
                });
            }
            attempts += 1;

            let dx = self.rng.random_range(-reach..=reach);
            let dy = self.rng.random_range(-reach..=reach);
            if !within_radius(dx, dy, radius) {
                continue;
            }
            let (Some(x), Some(y)) = (
                centre.0.checked_add_signed(dx as isize),
                centre.1.checked_add_signed(dy as isize),
            ) else {
                continue;
            };
            if !grid.is_interior(x, y) || grid.get(x, y) == TerrainKind::Water {
                continue;
            }

            grid.set(x, y, TerrainKind::Water);
            filled += 1;
        }

        trace!(
            "Filled water body at ({}, {}) with {} cells in {} samples",
            centre.0,
            centre.1,
            filled,
            attempts
        );
        Ok(filled)
    }
}

/// Majority-neighbour smoothing of vegetation, `iterations` passes
///
/// Per cell, in priority order: Tree if it is Tree with at least 4 tree
/// neighbours or has at least 5; otherwise Brush under the same rule; otherwise
/// Grass. Water cells are left alone.
pub fn smooth_vegetation(grid: &mut TerrainGrid, iterations: usize) {
    for pass in 0..iterations {
        let mut changed = 0usize;
        for y in 1..grid.ny().saturating_sub(1) {
            for x in 1..grid.nx().saturating_sub(1) {
                let current = grid.get(x, y);
                if current == TerrainKind::Water {
                    continue;
                }

                let trees = grid.count_neighbours(x, y, TerrainKind::Tree);
                let brush = grid.count_neighbours(x, y, TerrainKind::Brush);
                let next = if holds(current, TerrainKind::Tree, trees) {
                    TerrainKind::Tree
                } else if holds(current, TerrainKind::Brush, brush) {
                    TerrainKind::Brush
                } else {
                    TerrainKind::Grass
                };

                if next != current {
                    grid.set(x, y, next);
                    changed += 1;
                }
            }
        }
        debug!("Vegetation smoothing pass {}: {} cells changed", pass + 1, changed);
    }
}

/// Edge rounding of water bodies, `passes` passes
///
/// Non-water cells with at least 5 water neighbours flood. Water cells with at
/// least 4 water neighbours persist, as do cells between the thresholds; a
/// water cell with no water neighbour at all is an isolated puddle and reverts
/// to its kind in `underlying`.
pub fn round_water_edges(grid: &mut TerrainGrid, underlying: &TerrainGrid, passes: usize) {
    for _ in 0..passes {
        for y in 1..grid.ny().saturating_sub(1) {
            for x in 1..grid.nx().saturating_sub(1) {
                let current = grid.get(x, y);
                let water = grid.count_neighbours(x, y, TerrainKind::Water);

                if holds(current, TerrainKind::Water, water) {
                    grid.set(x, y, TerrainKind::Water);
                } else if current == TerrainKind::Water && water == 0 {
                    grid.set(x, y, underlying.get(x, y));
                }
            }
        }
    }
}

/// Hysteresis rule: keep `kind` with 4 like neighbours, convert to it with 5
#[inline]
fn holds(current: TerrainKind, kind: TerrainKind, neighbours: usize) -> bool {
    if current == kind {
        neighbours >= PERSIST_THRESHOLD
    } else {
        neighbours >= CONVERT_THRESHOLD
    }
}

#[inline]
fn distance(a: (usize, usize), b: (usize, usize)) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    dx.hypot(dy)
}
