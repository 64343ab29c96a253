//! Unified cell state
//!
//! A cell is in exactly one of three phases: alive with its terrain kind,
//! burning at one of four stages, or burnt out. The phases are a single
//! tagged enum so no two of them can be confused.

use super::terrain::TerrainKind;
use serde::{Deserialize, Serialize};

/// State code for a burnt-out cell
pub const BURNT_CODE: u8 = 4;

/// Progress of an actively burning cell
///
/// Derived from the burnt fraction: stage `k` covers fractions in `[k/4, (k+1)/4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BurnStage {
    Stage0,
    Stage1,
    Stage2,
    Stage3,
}

impl BurnStage {
    /// Stage for a cell that has burned `burning_time` ticks of `fuel`
    ///
    /// Returns `None` once the fuel is exhausted. Integer arithmetic keeps the
    /// quarter boundaries exact.
    pub fn from_progress(burning_time: u32, fuel: u32) -> Option<BurnStage> {
        if fuel == 0 || burning_time >= fuel {
            return None;
        }
        match (u64::from(burning_time) * 4) / u64::from(fuel) {
            0 => Some(BurnStage::Stage0),
            1 => Some(BurnStage::Stage1),
            2 => Some(BurnStage::Stage2),
            _ => Some(BurnStage::Stage3),
        }
    }

    /// Ordinal 0..=3, which is also the renderer state code
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Everything a cell can be at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Unburned terrain
    Alive(TerrainKind),
    /// On fire
    Burning(BurnStage),
    /// Fuel exhausted (terminal)
    Burnt,
}

impl CellState {
    #[inline]
    pub fn is_burning(self) -> bool {
        matches!(self, CellState::Burning(_))
    }

    #[inline]
    pub fn is_burnt(self) -> bool {
        matches!(self, CellState::Burnt)
    }

    /// Terrain kind if the cell has not caught fire yet
    #[inline]
    pub fn alive_kind(self) -> Option<TerrainKind> {
        match self {
            CellState::Alive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Whether the cell can still be ignited by a neighbour
    #[inline]
    pub fn is_ignitable(self) -> bool {
        self.alive_kind().is_some_and(TerrainKind::is_flammable)
    }

    /// Renderer state code: 0..=3 burning, 4 burnt, 5..=9 terrain
    pub fn code(self) -> u8 {
        match self {
            CellState::Alive(kind) => kind.code(),
            CellState::Burning(stage) => stage.index(),
            CellState::Burnt => BURNT_CODE,
        }
    }

    /// Single-character glyph for text output
    pub fn glyph(self) -> char {
        match self {
            CellState::Alive(kind) => kind.glyph(),
            CellState::Burning(BurnStage::Stage0) => '*',
            CellState::Burning(BurnStage::Stage1) => '#',
            CellState::Burning(BurnStage::Stage2) => '%',
            CellState::Burning(BurnStage::Stage3) => '+',
            CellState::Burnt => ',',
        }
    }
}

impl From<TerrainKind> for CellState {
    fn from(kind: TerrainKind) -> Self {
        CellState::Alive(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_quarters_for_tree_fuel() {
        assert_eq!(BurnStage::from_progress(1, 20), Some(BurnStage::Stage0));
        assert_eq!(BurnStage::from_progress(4, 20), Some(BurnStage::Stage0));
        assert_eq!(BurnStage::from_progress(5, 20), Some(BurnStage::Stage1));
        assert_eq!(BurnStage::from_progress(10, 20), Some(BurnStage::Stage2));
        assert_eq!(BurnStage::from_progress(19, 20), Some(BurnStage::Stage3));
        assert_eq!(BurnStage::from_progress(20, 20), None);
    }

    #[test]
    fn test_grass_skips_stages() {
        // fuel 5: fractions 0.2, 0.4, 0.6, 0.8 -> stages 0, 1, 2, 3
        let stages: Vec<_> = (1..5).filter_map(|t| BurnStage::from_progress(t, 5)).collect();
        assert_eq!(
            stages,
            vec![BurnStage::Stage0, BurnStage::Stage1, BurnStage::Stage2, BurnStage::Stage3]
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(CellState::Burning(BurnStage::Stage0).code(), 0);
        assert_eq!(CellState::Burning(BurnStage::Stage3).code(), 3);
        assert_eq!(CellState::Burnt.code(), BURNT_CODE);
        assert_eq!(CellState::Alive(TerrainKind::Water).code(), 8);
    }

    #[test]
    fn test_water_is_not_ignitable() {
        assert!(!CellState::Alive(TerrainKind::Water).is_ignitable());
        assert!(CellState::Alive(TerrainKind::Brush).is_ignitable());
        assert!(!CellState::Burnt.is_ignitable());
    }
}
