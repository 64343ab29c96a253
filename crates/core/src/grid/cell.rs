//! Per-cell fire state and ignition probabilities
//!
//! A [`Cell`] is created once from its terrain kind. Its fuel load never
//! changes; burning advances a tick counter and the burn stage is recomputed
//! from the burnt fraction after every tick.

use crate::core_types::{BurnStage, CellState, TerrainKind};
use crate::error::InvariantViolation;
use serde::{Deserialize, Serialize};

/// Base probability that a burning cell ignites each kind of unburned neighbour
///
/// Fixed per source kind at cell construction. Values are scaled by the
/// source's fire intensity at the time of the draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IgnitionTable {
    pub grass: f32,
    pub brush: f32,
    pub tree: f32,
}

impl IgnitionTable {
    /// Burning grass: spreads readily to grass, rarely climbs into tree crowns
    pub const GRASS: IgnitionTable = IgnitionTable {
        grass: 0.25,
        brush: 0.15,
        tree: 0.075,
    };

    /// Burning trees
    pub const TREE: IgnitionTable = IgnitionTable {
        grass: 0.225,
        brush: 0.125,
        tree: 0.05,
    };

    /// Burning brush: acts as ladder fuel into trees
    pub const BRUSH: IgnitionTable = IgnitionTable {
        grass: 0.225,
        brush: 0.15,
        tree: 0.125,
    };

    /// Table for a source of the given kind, `None` for non-vegetation
    pub fn for_kind(kind: TerrainKind) -> Option<IgnitionTable> {
        match kind {
            TerrainKind::Grass => Some(Self::GRASS),
            TerrainKind::Brush => Some(Self::BRUSH),
            TerrainKind::Tree => Some(Self::TREE),
            TerrainKind::Water | TerrainKind::Empty => None,
        }
    }

    /// Base probability for a neighbour kind; zero for anything that cannot burn
    #[inline]
    pub fn base(&self, neighbour: TerrainKind) -> f32 {
        match neighbour {
            TerrainKind::Grass => self.grass,
            TerrainKind::Brush => self.brush,
            TerrainKind::Tree => self.tree,
            TerrainKind::Water | TerrainKind::Empty => 0.0,
        }
    }

    /// Largest entry in the table
    #[cfg(test)]
    fn max(&self) -> f32 {
        self.grass.max(self.brush).max(self.tree)
    }
}

/// One instantiated interior grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    x: usize,
    y: usize,
    state: CellState,
    /// Kind the cell was created with
    kind: TerrainKind,
    /// Ticks of burning this cell can sustain
    fuel: u32,
    /// Ticks burned so far
    burning_time: u32,
    ignition: Option<IgnitionTable>,
}

impl Cell {
    /// Create an unburned cell of the given kind at `(x, y)`
    pub fn new(kind: TerrainKind, x: usize, y: usize) -> Self {
        Cell {
            x,
            y,
            state: CellState::Alive(kind),
            kind,
            fuel: kind.fuel_load(),
            burning_time: 0,
            ignition: IgnitionTable::for_kind(kind),
        }
    }

    #[inline]
    pub fn x(&self) -> usize {
        self.x
    }

    #[inline]
    pub fn y(&self) -> usize {
        self.y
    }

    #[inline]
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    #[inline]
    pub fn get_state(&self) -> CellState {
        self.state
    }

    /// Overwrite the state directly
    ///
    /// Bypasses the burn bookkeeping. Intended for drivers that stage
    /// scenarios; the engine itself only changes state through [`Cell::burn`].
    #[inline]
    pub fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    /// Terrain kind the cell was created with
    #[inline]
    pub fn kind(&self) -> TerrainKind {
        self.kind
    }

    #[inline]
    pub fn fuel(&self) -> u32 {
        self.fuel
    }

    #[inline]
    pub fn burning_time(&self) -> u32 {
        self.burning_time
    }

    /// Ignition table fixed at construction, `None` for water
    #[inline]
    pub fn ignition_table(&self) -> Option<&IgnitionTable> {
        self.ignition.as_ref()
    }

    /// Fraction of the fuel load consumed, in [0, 1]
    pub fn burnt_fraction(&self) -> f32 {
        if self.fuel == 0 {
            return 1.0;
        }
        (self.burning_time as f32 / self.fuel as f32).min(1.0)
    }

    /// Strength of the fire in this cell, decaying linearly as fuel is consumed
    #[inline]
    pub fn fire_intensity(&self) -> f32 {
        1.0 - self.burnt_fraction()
    }

    /// Probability that this cell ignites a neighbour of kind `neighbour` this tick
    ///
    /// # Panics
    ///
    /// Panics if the cell was not created as grass, brush or tree. Water never
    /// burns, so the engine can never ask it for a probability.
    pub fn get_prob(&self, neighbour: TerrainKind) -> f32 {
        let Some(table) = &self.ignition else {
            panic!(
                "{}",
                InvariantViolation::NotFlammable {
                    x: self.x,
                    y: self.y,
                    kind: self.kind,
                }
            );
        };
        table.base(neighbour) * self.fire_intensity()
    }

    /// Advance the fire in this cell by one tick
    ///
    /// Igniting an unburned cell is the first call. Calls on burnt or
    /// non-flammable cells are no-ops.
    pub fn burn(&mut self) {
        let can_burn = match self.state {
            CellState::Alive(kind) => kind.is_flammable(),
            CellState::Burning(_) => true,
            CellState::Burnt => false,
        };
        if !can_burn {
            return;
        }

        self.burning_time += 1;
        self.state = match BurnStage::from_progress(self.burning_time, self.fuel) {
            Some(stage) => CellState::Burning(stage),
            None => CellState::Burnt,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_cell_is_alive_with_fixed_fuel() {
        let cell = Cell::new(TerrainKind::Brush, 3, 4);
        assert_eq!(cell.get_state(), CellState::Alive(TerrainKind::Brush));
        assert_eq!(cell.fuel(), 7);
        assert_eq!(cell.burning_time(), 0);
        assert_eq!(cell.position(), (3, 4));
        assert_relative_eq!(cell.fire_intensity(), 1.0);
    }

    #[test]
    fn test_stage_quantization_for_tree() {
        let mut cell = Cell::new(TerrainKind::Tree, 1, 1);
        for _ in 0..5 {
            cell.burn();
        }
        assert_relative_eq!(cell.burnt_fraction(), 0.25);
        assert_eq!(cell.get_state(), CellState::Burning(BurnStage::Stage1));

        for _ in 5..20 {
            cell.burn();
        }
        assert_eq!(cell.burning_time(), 20);
        assert_eq!(cell.get_state(), CellState::Burnt);
    }

    #[test]
    fn test_burn_after_burnt_is_noop() {
        let mut cell = Cell::new(TerrainKind::Grass, 1, 1);
        for _ in 0..5 {
            cell.burn();
        }
        assert_eq!(cell.get_state(), CellState::Burnt);

        cell.burn();
        cell.burn();
        assert_eq!(cell.get_state(), CellState::Burnt);
        assert_eq!(cell.burning_time(), 5);
        assert_eq!(cell.fuel(), 5);
    }

    #[test]
    fn test_water_never_burns() {
        let mut cell = Cell::new(TerrainKind::Water, 2, 2);
        cell.burn();
        assert_eq!(cell.get_state(), CellState::Alive(TerrainKind::Water));
        assert_eq!(cell.burning_time(), 0);
        assert!(cell.ignition_table().is_none());
    }

    #[test]
    fn test_probability_decays_with_burnt_fraction() {
        let mut cell = Cell::new(TerrainKind::Grass, 1, 1);
        let mut previous = cell.get_prob(TerrainKind::Grass);
        assert_relative_eq!(previous, 0.25);

        while !cell.get_state().is_burnt() {
            cell.burn();
            let p = cell.get_prob(TerrainKind::Grass);
            assert!(p < previous, "probability must strictly decrease: {p} >= {previous}");
            assert!((0.0..=IgnitionTable::GRASS.max()).contains(&p));
            previous = p;
        }
        assert_relative_eq!(previous, 0.0);
    }

    #[test]
    fn test_asymmetric_tables() {
        let grass = Cell::new(TerrainKind::Grass, 1, 1);
        let tree = Cell::new(TerrainKind::Tree, 1, 1);
        let brush = Cell::new(TerrainKind::Brush, 1, 1);

        assert_relative_eq!(grass.get_prob(TerrainKind::Tree), 0.075);
        assert_relative_eq!(tree.get_prob(TerrainKind::Grass), 0.225);
        assert_relative_eq!(brush.get_prob(TerrainKind::Tree), 0.125);
        assert_relative_eq!(tree.get_prob(TerrainKind::Water), 0.0);
    }

    #[test]
    #[should_panic(expected = "non-flammable Water")]
    fn test_prob_from_water_is_an_invariant_violation() {
        let cell = Cell::new(TerrainKind::Water, 1, 1);
        let _ = cell.get_prob(TerrainKind::Grass);
    }
}
