//! Error types for terrain generation and fire simulation
//!
//! Configuration and layout failures are reported before the first tick runs.
//! Once a simulation is stepping there are no recoverable errors; broken
//! invariants are programming faults and panic with an [`InvariantViolation`].

use crate::core_types::TerrainKind;

/// Invalid construction parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid cannot hold an interior ring of cells
    GridTooSmall { nx: usize, ny: usize, min: usize },
    /// A vegetation density is outside [0, 1] or not finite
    InvalidDensity { name: &'static str, value: f32 },
    /// Tree and brush densities together exceed 1
    DensitySumExceeded { tree: f32, brush: f32 },
    /// Water body area is zero, negative or not finite
    InvalidWaterSize(f32),
    /// Water fill fraction is outside (0, 1]
    InvalidFillFraction(f32),
    /// Grid is too small to place a water body of the requested radius
    WaterBodyTooLarge {
        nx: usize,
        ny: usize,
        radius: f32,
        min: usize,
    },
    /// Fill target exceeds the cells one water body can cover
    WaterFillUnreachable { target: usize, capacity: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::GridTooSmall { nx, ny, min } => {
                write!(f, "Grid {nx}x{ny} is too small, each side must be at least {min}")
            }
            ConfigError::InvalidDensity { name, value } => {
                write!(f, "Density '{name}' must be within [0, 1], got {value}")
            }
            ConfigError::DensitySumExceeded { tree, brush } => {
                write!(f, "Tree density {tree} plus brush density {brush} exceeds 1")
            }
            ConfigError::InvalidWaterSize(size) => {
                write!(f, "Water body size must be positive, got {size}")
            }
            ConfigError::InvalidFillFraction(fraction) => {
                write!(f, "Water fill fraction must be within (0, 1], got {fraction}")
            }
            ConfigError::WaterBodyTooLarge { nx, ny, radius, min } => write!(
                f,
                "Grid {nx}x{ny} cannot hold a water body of radius {radius:.2}, \
                 each side must be at least {min}"
            ),
            ConfigError::WaterFillUnreachable { target, capacity } => write!(
                f,
                "Water fill target of {target} cells exceeds the {capacity} cells a body can cover"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Water carving could not complete within its retry budget
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// No non-overlapping position found for a water body centre
    CentrePlacementExhausted {
        placed: usize,
        requested: usize,
        attempts: usize,
    },
    /// A water body could not reach its target cell count
    BlobFillExhausted {
        centre: (usize, usize),
        filled: usize,
        target: usize,
        attempts: usize,
    },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::CentrePlacementExhausted {
                placed,
                requested,
                attempts,
            } => write!(
                f,
                "Placed {placed} of {requested} water bodies, \
                 no free position after {attempts} attempts"
            ),
            LayoutError::BlobFillExhausted {
                centre,
                filled,
                target,
                attempts,
            } => write!(
                f,
                "Water body at ({}, {}) filled {filled} of {target} cells in {attempts} attempts",
                centre.0, centre.1
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// A broken engine invariant
///
/// Never returned; used as the message of a panic when engine code reaches a
/// state the configuration checks should have made impossible.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// Ignition probability requested from a cell that never had vegetation
    NotFlammable { x: usize, y: usize, kind: TerrainKind },
    /// Cell lookup that must land inside the `nx × ny` grid's interior did not
    OutOfInterior { x: usize, y: usize, nx: usize, ny: usize },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantViolation::NotFlammable { x, y, kind } => write!(
                f,
                "Ignition probability requested from non-flammable {kind} cell at ({x}, {y})"
            ),
            InvariantViolation::OutOfInterior { x, y, nx, ny } => write!(
                f,
                "Cell ({x}, {y}) is outside the interior of a {nx}x{ny} grid"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Any failure that stops a simulation from starting
#[derive(Debug, Clone, PartialEq)]
pub enum FireSimError {
    Config(ConfigError),
    Layout(LayoutError),
}

impl std::fmt::Display for FireSimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FireSimError::Config(err) => write!(f, "Invalid configuration: {err}"),
            FireSimError::Layout(err) => write!(f, "Terrain layout failed: {err}"),
        }
    }
}

impl std::error::Error for FireSimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FireSimError::Config(err) => Some(err),
            FireSimError::Layout(err) => Some(err),
        }
    }
}

impl From<ConfigError> for FireSimError {
    fn from(err: ConfigError) -> Self {
        FireSimError::Config(err)
    }
}

impl From<LayoutError> for FireSimError {
    fn from(err: LayoutError) -> Self {
        FireSimError::Layout(err)
    }
}
