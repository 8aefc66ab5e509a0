//! Life-rule engine: toroidal neighbor counting and per-state
//! transition rules.
//!
//! The rules are pure: they read only the generation passed in and
//! never mutate it, so the same inputs always produce the same output
//! and cell evaluation order is irrelevant.
//!
//! Neighbor coordinates are computed eagerly as a fixed array of eight
//! wrapped positions. On the torus a coordinate past an edge wraps to
//! the opposite edge, so every cell -- edges and corners included --
//! has exactly eight neighbors.

use std::collections::HashMap;

use crate::generation::{Generation, GridError};
use crate::unit::{CellState, Unit};

/// Signature of a transition rule: given a cell and the generation it
/// lives in, produce the cell's next state as a (possibly new) unit at
/// the same coordinate.
pub type RuleFn = fn(&Unit, &Generation) -> Result<Unit, GridError>;

/// Errors from rule cache lookup.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The key does not name a registered rule. The message text is a
    /// compatibility contract verified by tests.
    #[error("Provided {key} is not present in cache")]
    UnknownKey {
        /// The invalid lookup key.
        key: String,
    },
}

/// Wrap a coordinate one step toward zero: `0` wraps to `border - 1`.
const fn wrap_down(coordinate: u32, border: u32) -> u32 {
    match coordinate.checked_sub(1) {
        Some(previous) => previous,
        None => border.saturating_sub(1),
    }
}

/// Wrap a coordinate one step away from zero: `border - 1` wraps to `0`.
const fn wrap_up(coordinate: u32, border: u32) -> u32 {
    let next = coordinate.saturating_add(1);
    if next >= border { 0 } else { next }
}

/// The eight neighbor coordinates of `(x, y)` on a `width x height`
/// torus, in row-major order.
pub const fn neighbor_coordinates(x: u32, y: u32, width: u32, height: u32) -> [(u32, u32); 8] {
    let left = wrap_down(x, width);
    let right = wrap_up(x, width);
    let up = wrap_down(y, height);
    let down = wrap_up(y, height);
    [
        (left, up),
        (x, up),
        (right, up),
        (left, y),
        (right, y),
        (left, down),
        (x, down),
        (right, down),
    ]
}

/// Count the alive cells among a unit's eight toroidal neighbors.
///
/// # Errors
///
/// Returns [`GridError::OutOfBorders`] if the unit does not belong to
/// the given generation's board (its coordinate is out of range).
pub fn count_alive_neighbors(unit: &Unit, generation: &Generation) -> Result<u8, GridError> {
    let mut alive: u8 = 0;
    for (x, y) in neighbor_coordinates(unit.x, unit.y, generation.width(), generation.height()) {
        if generation.get_unit(x, y)?.state.is_alive() {
            alive = alive.saturating_add(1);
        }
    }
    Ok(alive)
}

/// Transition rule for a live cell: survives with two or three live
/// neighbors (returned unchanged), otherwise dies (a new dead unit at
/// the same coordinate).
///
/// # Errors
///
/// Returns [`GridError::OutOfBorders`] if the unit is outside the
/// generation's board.
pub fn alive_rule(unit: &Unit, generation: &Generation) -> Result<Unit, GridError> {
    let neighbors = count_alive_neighbors(unit, generation)?;
    if matches!(neighbors, 2 | 3) {
        Ok(*unit)
    } else {
        Ok(Unit::dead(unit.x, unit.y))
    }
}

/// Transition rule for a dead cell: born with exactly three live
/// neighbors (a new alive unit), otherwise returned unchanged.
///
/// # Errors
///
/// Returns [`GridError::OutOfBorders`] if the unit is outside the
/// generation's board.
pub fn dead_rule(unit: &Unit, generation: &Generation) -> Result<Unit, GridError> {
    let neighbors = count_alive_neighbors(unit, generation)?;
    if neighbors == 3 {
        Ok(Unit::alive(unit.x, unit.y))
    } else {
        Ok(*unit)
    }
}

/// Direct mapping from a state tag to its rule function.
///
/// There are exactly two variants, so no dispatch machinery beyond a
/// match is needed.
pub const fn rule_for(state: CellState) -> RuleFn {
    match state {
        CellState::Alive => alive_rule,
        CellState::Dead => dead_rule,
    }
}

/// Rule lookup keyed by state name (`"Alive"` / `"Dead"`).
///
/// Built once and never mutated afterwards. Lookups by an unregistered
/// key always fail the same way, with [`RuleError::UnknownKey`].
#[derive(Debug, Clone)]
pub struct RuleCache {
    rules: HashMap<&'static str, RuleFn>,
}

impl RuleCache {
    /// Build the cache with the two singleton rules registered.
    pub fn new() -> Self {
        let mut rules: HashMap<&'static str, RuleFn> = HashMap::new();
        rules.insert(CellState::Alive.name(), rule_for(CellState::Alive));
        rules.insert(CellState::Dead.name(), rule_for(CellState::Dead));
        Self { rules }
    }

    /// Look up a rule by state name.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownKey`] for any key other than
    /// `"Alive"` or `"Dead"`.
    pub fn get(&self, key: &str) -> Result<RuleFn, RuleError> {
        self.rules
            .get(key)
            .copied()
            .ok_or_else(|| RuleError::UnknownKey {
                key: key.to_owned(),
            })
    }
}

impl Default for RuleCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn board_3x3(alive: &[(u32, u32)]) -> Generation {
        let mut generation = Generation::new(3, 3).unwrap();
        for &(x, y) in alive {
            generation.add(Unit::alive(x, y)).unwrap();
        }
        generation
    }

    #[test]
    fn corner_neighbors_wrap_to_opposite_edges() {
        let neighbors = neighbor_coordinates(0, 0, 5, 4);
        assert_eq!(neighbors.len(), 8);
        // The wrap-around positions the torus guarantees.
        assert!(neighbors.contains(&(4, 3)));
        assert!(neighbors.contains(&(4, 0)));
        assert!(neighbors.contains(&(0, 3)));
        // And the ordinary interior ones.
        assert!(neighbors.contains(&(1, 0)));
        assert!(neighbors.contains(&(0, 1)));
        assert!(neighbors.contains(&(1, 1)));
    }

    #[test]
    fn interior_neighbors_are_the_usual_eight() {
        let neighbors = neighbor_coordinates(2, 2, 5, 5);
        let expected = [
            (1, 1),
            (2, 1),
            (3, 1),
            (1, 2),
            (3, 2),
            (1, 3),
            (2, 3),
            (3, 3),
        ];
        assert_eq!(neighbors, expected);
    }

    #[test]
    fn neighbor_count_sees_wrapped_cells() {
        // Alive at the far corner: a neighbor of (0, 0) only via wrap.
        let generation = board_3x3(&[(2, 2)]);
        let origin = generation.get_unit(0, 0).unwrap();
        assert_eq!(count_alive_neighbors(origin, &generation).unwrap(), 1);
    }

    #[test]
    fn alive_rule_survival_band() {
        // (1, 1) with two alive neighbors survives unchanged.
        let generation = board_3x3(&[(1, 1), (0, 0), (2, 2)]);
        let unit = generation.get_unit(1, 1).unwrap();
        let next = alive_rule(unit, &generation).unwrap();
        assert_eq!(next, *unit);

        // A lone cell starves.
        let generation = board_3x3(&[(1, 1)]);
        let unit = generation.get_unit(1, 1).unwrap();
        let next = alive_rule(unit, &generation).unwrap();
        assert_eq!(next, Unit::dead(1, 1));
    }

    #[test]
    fn dead_rule_birth_needs_exactly_three() {
        let generation = board_3x3(&[(0, 0), (1, 0), (0, 1)]);
        let unit = generation.get_unit(1, 1).unwrap();
        let next = dead_rule(unit, &generation).unwrap();
        assert_eq!(next, Unit::alive(1, 1));

        let generation = board_3x3(&[(0, 0), (1, 0)]);
        let unit = generation.get_unit(1, 1).unwrap();
        let next = dead_rule(unit, &generation).unwrap();
        assert_eq!(next, *unit);
    }

    #[test]
    fn rules_are_pure() {
        let generation = board_3x3(&[(0, 1), (1, 1), (1, 0)]);
        let before = generation.clone();

        let unit = generation.get_unit(2, 2).unwrap();
        let first = dead_rule(unit, &generation).unwrap();
        let second = dead_rule(unit, &generation).unwrap();

        assert_eq!(first, second);
        assert_eq!(generation, before);
    }

    #[test]
    fn cache_resolves_both_states() {
        let cache = RuleCache::new();
        let generation = board_3x3(&[(1, 1)]);
        let unit = generation.get_unit(1, 1).unwrap();

        let rule = cache.get("Alive").unwrap();
        assert_eq!(rule(unit, &generation).unwrap(), Unit::dead(1, 1));
        assert!(cache.get("Dead").is_ok());
    }

    #[test]
    fn unknown_key_message_is_exact() {
        let cache = RuleCache::new();
        let error = cache.get("Zombie").unwrap_err();
        assert_eq!(error.to_string(), "Provided Zombie is not present in cache");
    }
}
