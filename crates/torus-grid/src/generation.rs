//! Board snapshot: fixed dimensions, one unit per coordinate, and an
//! incrementally maintained population count.
//!
//! A [`Generation`] maps every coordinate in `[0, width) x [0, height)`
//! to exactly one [`Unit`], stored row-major. The population counter is
//! adjusted on every write, so it always equals the number of alive
//! units on the board without a full rescan.
//!
//! Once a generation has been stored in a game's history it is treated
//! as immutable by the rest of the system; the only sanctioned in-place
//! mutation is [`Generation::toggle`], the pre-simulation editing path.

use serde::{Deserialize, Serialize};

use crate::unit::Unit;

/// Errors from board construction and access.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Coordinate access outside the board. The message text is a
    /// compatibility contract verified by tests.
    #[error("Provided x={x} and y={y} out of board borders")]
    OutOfBorders {
        /// The offending column.
        x: u32,
        /// The offending row.
        y: u32,
    },

    /// Board dimensions must both be positive.
    #[error("invalid board dimensions: {width}x{height}")]
    InvalidDimensions {
        /// The requested width.
        width: u32,
        /// The requested height.
        height: u32,
    },
}

/// A complete board snapshot.
///
/// Equality is cell-by-cell: two generations compare equal when every
/// coordinate holds the same state. The game core uses this to detect
/// a stable board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    width: u32,
    height: u32,
    /// Row-major cell storage: index `y * width + x`.
    units: Vec<Unit>,
    population: u64,
}

impl Generation {
    /// Create a board with every cell dead.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let cell_count = u64::from(width).saturating_mul(u64::from(height));
        let capacity = usize::try_from(cell_count)
            .map_err(|_err| GridError::InvalidDimensions { width, height })?;

        let mut units = Vec::with_capacity(capacity);
        for y in 0..height {
            for x in 0..width {
                units.push(Unit::dead(x, y));
            }
        }

        Ok(Self {
            width,
            height,
            units,
            population: 0,
        })
    }

    /// Board width.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Board height.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of alive units, maintained incrementally on every write.
    pub const fn population(&self) -> u64 {
        self.population
    }

    /// Row-major index for an in-range coordinate.
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let flat = u64::from(y)
            .checked_mul(u64::from(self.width))?
            .checked_add(u64::from(x))?;
        usize::try_from(flat).ok()
    }

    /// Get the unit at a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBorders`] if the coordinate is outside
    /// the board.
    pub fn get_unit(&self, x: u32, y: u32) -> Result<&Unit, GridError> {
        self.index(x, y)
            .and_then(|idx| self.units.get(idx))
            .ok_or(GridError::OutOfBorders { x, y })
    }

    /// Overwrite the cell at the unit's own coordinate.
    ///
    /// O(1). The population counter is adjusted by the signed delta
    /// between the replaced state and the new state; replacing a cell
    /// with the same state is a population no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBorders`] if the unit's coordinate is
    /// outside the board.
    pub fn add(&mut self, unit: Unit) -> Result<(), GridError> {
        let idx = self.index(unit.x, unit.y).ok_or(GridError::OutOfBorders {
            x: unit.x,
            y: unit.y,
        })?;
        let slot = self.units.get_mut(idx).ok_or(GridError::OutOfBorders {
            x: unit.x,
            y: unit.y,
        })?;

        match (slot.state.is_alive(), unit.state.is_alive()) {
            (false, true) => self.population = self.population.saturating_add(1),
            (true, false) => self.population = self.population.saturating_sub(1),
            _ => {}
        }
        *slot = unit;
        Ok(())
    }

    /// Flip the cell at a coordinate in place and return the post-toggle
    /// unit.
    ///
    /// This is the editing-phase exception to the otherwise-immutable
    /// snapshot contract: it is only meaningful before the simulation
    /// starts, while the current generation is still the initial board.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBorders`] if the coordinate is outside
    /// the board.
    pub fn toggle(&mut self, x: u32, y: u32) -> Result<Unit, GridError> {
        let state = self.get_unit(x, y)?.state.toggled();
        let unit = Unit::new(x, y, state);
        self.add(unit)?;
        Ok(unit)
    }

    /// Iterate every unit exactly once in row-major order.
    ///
    /// Each call produces a fresh iterator, so the sequence is
    /// restartable by construction.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }
}
