//! Cell model: a fixed-coordinate unit with a binary life state.

use serde::{Deserialize, Serialize};

/// Life state of a single cell.
///
/// An explicit two-value tagged union. Rule selection is a direct mapping
/// from this tag to a rule function (see [`crate::rules::rule_for`]), so no
/// runtime type inspection is ever needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// The cell is alive.
    Alive,
    /// The cell is dead.
    Dead,
}

impl CellState {
    /// The state's name, used as the lookup key in the rule cache.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Alive => "Alive",
            Self::Dead => "Dead",
        }
    }

    /// Whether this state counts toward the population.
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }

    /// The opposite state (the editing-phase toggle).
    pub const fn toggled(self) -> Self {
        match self {
            Self::Alive => Self::Dead,
            Self::Dead => Self::Alive,
        }
    }
}

/// A single cell at a fixed coordinate.
///
/// The coordinate never changes for the lifetime of the unit; rule
/// evaluation that changes a cell's state produces a *new* unit at the
/// same coordinate. The one exception is the pre-simulation editing
/// phase, which toggles `state` on the unit stored in the live board
/// (see [`crate::generation::Generation::toggle`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Column, in `[0, width)`.
    pub x: u32,
    /// Row, in `[0, height)`.
    pub y: u32,
    /// Current life state.
    pub state: CellState,
}

impl Unit {
    /// Create a unit with an explicit state.
    pub const fn new(x: u32, y: u32, state: CellState) -> Self {
        Self { x, y, state }
    }

    /// Create an alive unit.
    pub const fn alive(x: u32, y: u32) -> Self {
        Self::new(x, y, CellState::Alive)
    }

    /// Create a dead unit.
    pub const fn dead(x: u32, y: u32) -> Self {
        Self::new(x, y, CellState::Dead)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn state_names_match_rule_cache_keys() {
        assert_eq!(CellState::Alive.name(), "Alive");
        assert_eq!(CellState::Dead.name(), "Dead");
    }

    #[test]
    fn toggled_flips_both_ways() {
        assert_eq!(CellState::Alive.toggled(), CellState::Dead);
        assert_eq!(CellState::Dead.toggled(), CellState::Alive);
    }

    #[test]
    fn constructors_fix_coordinates_and_state() {
        let unit = Unit::alive(3, 7);
        assert_eq!(unit.x, 3);
        assert_eq!(unit.y, 7);
        assert!(unit.state.is_alive());
        assert!(!Unit::dead(3, 7).state.is_alive());
    }

    #[test]
    fn unit_round_trips_through_serde() {
        let unit = Unit::alive(1, 2);
        let json = serde_json::to_string(&unit).unwrap();
        let back: Unit = serde_json::from_str(&json).unwrap();
        assert_eq!(unit, back);
    }
}
