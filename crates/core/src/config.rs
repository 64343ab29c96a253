//! Simulation configuration
//!
//! Plain serde-friendly structs with reference defaults. Override single
//! fields with struct update syntax:
//!
//! ```rust
//! use wildfire_core::{SimulationConfig, TerrainConfig};
//!
//! let config = SimulationConfig {
//!     nx: 120,
//!     ny: 80,
//!     terrain: TerrainConfig {
//!         water_bodies: 1,
//!         water_size: 400.0,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Smallest grid side: one interior cell inside the border ring
pub const MIN_GRID_SIDE: usize = 3;

/// Whether the offset `(dx, dy)` lies within `radius` of its origin
#[inline]
pub fn within_radius(dx: i64, dy: i64, radius: f32) -> bool {
    ((dx * dx + dy * dy) as f32).sqrt() <= radius
}

/// Terrain generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Probability that a seeded cell starts as Tree
    pub tree_density: f32,
    /// Probability that a seeded cell starts as Brush
    pub brush_density: f32,
    /// Number of water bodies to carve
    pub water_bodies: usize,
    /// Nominal area of each water body in cells
    ///
    /// Determines the body radius, `sqrt(water_size / π)`, which is also the
    /// minimum distance between body centres.
    pub water_size: f32,
    /// Fraction of `water_size` converted to water before edge rounding
    pub water_fill_fraction: f32,
    /// Vegetation smoothing passes
    pub smoothing_iterations: usize,
    /// Water edge rounding passes
    pub water_smoothing_passes: usize,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            tree_density: 0.525,
            brush_density: 0.425,
            water_bodies: 3,
            water_size: 3000.0,
            water_fill_fraction: 0.45,
            smoothing_iterations: 9,
            water_smoothing_passes: 4,
        }
    }
}

impl TerrainConfig {
    /// Terrain without water bodies
    pub fn dry() -> Self {
        TerrainConfig {
            water_bodies: 0,
            ..Default::default()
        }
    }

    /// Radius of each water body in cells
    pub fn water_radius(&self) -> f32 {
        (self.water_size / std::f32::consts::PI).sqrt()
    }

    /// Number of lattice offsets a single water body can cover
    pub fn blob_capacity(&self) -> usize {
        let radius = self.water_radius();
        let reach = radius.floor() as i64;
        (-reach..=reach)
            .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| within_radius(dx, dy, radius))
            .count()
    }

    /// Target number of water cells per body before edge rounding
    pub fn water_fill_target(&self) -> usize {
        (self.water_size * self.water_fill_fraction).floor() as usize
    }

    /// Check the parameters against a grid of `nx × ny`
    ///
    /// # Errors
    ///
    /// The first [`ConfigError`] found: grid size, then densities, then water
    /// body parameters (only when `water_bodies > 0`).
    pub fn validate(&self, nx: usize, ny: usize) -> Result<(), ConfigError> {
        if nx < MIN_GRID_SIDE || ny < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall {
                nx,
                ny,
                min: MIN_GRID_SIDE,
            });
        }

        for (name, value) in [
            ("tree_density", self.tree_density),
            ("brush_density", self.brush_density),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidDensity { name, value });
            }
        }
        if self.tree_density + self.brush_density > 1.0 + f32::EPSILON {
            return Err(ConfigError::DensitySumExceeded {
                tree: self.tree_density,
                brush: self.brush_density,
            });
        }

        if self.water_bodies == 0 {
            return Ok(());
        }

        if !self.water_size.is_finite() || self.water_size <= 0.0 {
            return Err(ConfigError::InvalidWaterSize(self.water_size));
        }
        if !self.water_fill_fraction.is_finite()
            || self.water_fill_fraction <= 0.0
            || self.water_fill_fraction > 1.0
        {
            return Err(ConfigError::InvalidFillFraction(self.water_fill_fraction));
        }

        // Body centres sit at least one radius inside the border ring
        let radius = self.water_radius();
        let min = 2 * radius.floor() as usize + MIN_GRID_SIDE;
        if nx < min || ny < min {
            return Err(ConfigError::WaterBodyTooLarge { nx, ny, radius, min });
        }

        let target = self.water_fill_target();
        let capacity = self.blob_capacity();
        if target > capacity {
            return Err(ConfigError::WaterFillUnreachable { target, capacity });
        }

        Ok(())
    }
}

/// Wind conditions
///
/// Accepted and carried with the simulation for drivers and renderers, but not
/// consumed by fire spread: ignition probabilities have no directional bias.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindConfig {
    /// Wind speed in km/h
    pub speed: f32,
    /// Direction the wind blows from, degrees clockwise from north
    pub bearing: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        WindConfig {
            speed: 15.0,
            bearing: 45.0,
        }
    }
}

/// Complete parameters for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid width in cells, border included
    pub nx: usize,
    /// Grid height in cells, border included
    pub ny: usize,
    /// Seed for every random draw in the run
    pub seed: u64,
    pub terrain: TerrainConfig,
    pub wind: WindConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            nx: 300,
            ny: 300,
            seed: 42,
            terrain: TerrainConfig::default(),
            wind: WindConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Check the terrain parameters against the grid size
    ///
    /// # Errors
    ///
    /// See [`TerrainConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.terrain.validate(self.nx, self.ny)
    }
}
