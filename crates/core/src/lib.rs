//! Wildfire Spread Simulation Core
//!
//! Procedurally generates a landscape of grass, brush, trees and water, then
//! spreads fire across it with a probabilistic cellular automaton.
//!
//! ## Pipeline
//!
//! - [`TerrainGenerator`] seeds vegetation, clusters it with hysteresis
//!   smoothing and carves non-overlapping water bodies
//! - [`FireSpreadEngine`] builds one [`Cell`] per interior coordinate, ignites
//!   a cell and advances the fire one tick per [`FireSpreadEngine::step`]
//! - Drivers read a [`StateGrid`] of state codes after each tick
//!
//! Every random draw comes from an explicitly injected generator, so runs are
//! reproducible from a seed.
//!
//! ```rust
//! use wildfire_core::{Simulation, SimulationConfig, TerrainConfig};
//!
//! let config = SimulationConfig {
//!     nx: 64,
//!     ny: 64,
//!     terrain: TerrainConfig::dry(),
//!     ..Default::default()
//! };
//! let mut sim = Simulation::new(config)?;
//! sim.step();
//! let frame = sim.snapshot();
//! assert_eq!(frame.nx(), 64);
//! # Ok::<(), wildfire_core::FireSimError>(())
//! ```

pub mod config;
pub mod core_types;
pub mod error;
pub mod grid;
pub mod simulation;

// Re-export core types
pub use core_types::{BurnStage, CellState, TerrainKind};

pub use config::{SimulationConfig, TerrainConfig, WindConfig};
pub use error::{ConfigError, FireSimError, InvariantViolation, LayoutError};
pub use grid::{Cell, IgnitionTable, TerrainGenerator, TerrainGrid};
pub use simulation::{seeded_rng, FireSpreadEngine, FireStats, Simulation, StateGrid};
