//! Core types shared by terrain generation and the fire engine

pub mod state;
pub mod terrain;

pub use state::{BurnStage, CellState, BURNT_CODE};
pub use terrain::TerrainKind;
