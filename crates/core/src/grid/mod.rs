//! Grid model: terrain classification, cells and terrain generation

pub mod cell;
pub mod terrain;
pub mod worldgen;

// Re-export main types
pub use cell::{Cell, IgnitionTable};
pub use terrain::{offset, TerrainGrid, NEIGHBOURHOOD};
pub use worldgen::{round_water_edges, smooth_vegetation, TerrainGenerator, MAX_CENTRE_ATTEMPTS};
