//! Seeded simulation runs
//!
//! [`Simulation`] wires terrain generation and the fire engine together from a
//! single [`SimulationConfig`]. One seed drives two independent random streams,
//! one for terrain and one for fire, so each is reproducible on its own.

pub mod engine;
pub mod snapshot;

pub use engine::FireSpreadEngine;
pub use snapshot::{FireStats, StateGrid};

use crate::config::SimulationConfig;
use crate::error::FireSimError;
use crate::grid::{TerrainGenerator, TerrainGrid};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Stream used for terrain draws
pub const TERRAIN_STREAM: u64 = 0;
/// Stream used for ignition draws
pub const FIRE_STREAM: u64 = 1;

/// Deterministic generator for one stream of a seeded run
pub fn seeded_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// A complete run: generated terrain plus the fire burning over it
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    terrain: TerrainGrid,
    engine: FireSpreadEngine<ChaCha8Rng>,
}

impl Simulation {
    /// Generate terrain and ignite one random cell
    ///
    /// # Errors
    ///
    /// [`FireSimError::Config`] for invalid parameters and
    /// [`FireSimError::Layout`] if water bodies cannot be carved. Both are
    /// reported before any tick runs.
    pub fn new(config: SimulationConfig) -> Result<Self, FireSimError> {
        config.validate()?;

        let mut generator =
            TerrainGenerator::new(config.terrain.clone(), seeded_rng(config.seed, TERRAIN_STREAM));
        let terrain =
            generator.generate(config.nx, config.ny, config.terrain.smoothing_iterations)?;
        let fire_rng = seeded_rng(config.seed, FIRE_STREAM);
        let engine = FireSpreadEngine::new(&terrain, config.wind, fire_rng)?;

        info!(
            "Simulation ready: {}x{} grid, seed {}, {} burning",
            config.nx,
            config.ny,
            config.seed,
            engine.frontier_len()
        );

        Ok(Self {
            config,
            terrain,
            engine,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Terrain as generated, before any fire
    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    pub fn engine(&self) -> &FireSpreadEngine<ChaCha8Rng> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FireSpreadEngine<ChaCha8Rng> {
        &mut self.engine
    }

    /// Advance one tick, returning the number of new ignitions
    pub fn step(&mut self) -> usize {
        self.engine.step()
    }

    pub fn snapshot(&self) -> StateGrid {
        self.engine.snapshot()
    }

    pub fn stats(&self) -> FireStats {
        self.engine.stats()
    }

    pub fn is_extinguished(&self) -> bool {
        self.engine.is_extinguished()
    }

    /// Step until no cell burns or `max_ticks` have run; returns ticks stepped
    pub fn run_until_extinguished(&mut self, max_ticks: u64) -> u64 {
        self.engine.run_until_extinguished(max_ticks)
    }
}
