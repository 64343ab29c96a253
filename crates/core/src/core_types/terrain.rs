//! Terrain kinds and their fuel loads
//!
//! A terrain kind is the static classification of an unburned cell. Fuel load
//! is measured in ticks: a cell burns for exactly `fuel_load` ticks before it is
//! exhausted.

use serde::{Deserialize, Serialize};

/// Static classification of an unburned cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Fast-burning, low fuel
    Grass,
    /// Scrub and shrubs
    Brush,
    /// Dense canopy, long burning
    Tree,
    /// Never ignites
    Water,
    /// Border ring outside the instantiated interior
    Empty,
}

impl TerrainKind {
    /// Kinds that can be ignited
    pub const FLAMMABLE: [TerrainKind; 3] =
        [TerrainKind::Grass, TerrainKind::Brush, TerrainKind::Tree];

    /// Fuel load in burning ticks
    ///
    /// Water carries a nominal load of 1 so that a cell built from it still has a
    /// well-defined burnt fraction, but water is never ignited. Empty is never
    /// instantiated as a cell and reports 0.
    pub fn fuel_load(self) -> u32 {
        match self {
            TerrainKind::Grass => 5,
            TerrainKind::Brush => 7,
            TerrainKind::Tree => 20,
            TerrainKind::Water => 1,
            TerrainKind::Empty => 0,
        }
    }

    /// Whether a cell of this kind can catch fire
    #[inline]
    pub fn is_flammable(self) -> bool {
        matches!(self, TerrainKind::Grass | TerrainKind::Brush | TerrainKind::Tree)
    }

    /// State code handed to renderers
    pub fn code(self) -> u8 {
        match self {
            TerrainKind::Grass => 5,
            TerrainKind::Brush => 6,
            TerrainKind::Tree => 7,
            TerrainKind::Water => 8,
            TerrainKind::Empty => 9,
        }
    }

    /// Single-character glyph for text output
    pub fn glyph(self) -> char {
        match self {
            TerrainKind::Grass => '.',
            TerrainKind::Brush => ':',
            TerrainKind::Tree => 'T',
            TerrainKind::Water => '~',
            TerrainKind::Empty => ' ',
        }
    }

    /// Get terrain kind name
    pub fn name(self) -> &'static str {
        match self {
            TerrainKind::Grass => "Grass",
            TerrainKind::Brush => "Brush",
            TerrainKind::Tree => "Tree",
            TerrainKind::Water => "Water",
            TerrainKind::Empty => "Empty",
        }
    }
}

impl std::fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}
