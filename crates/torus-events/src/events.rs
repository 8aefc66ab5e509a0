//! Every message exchanged over the event bus.
//!
//! Input events come from the view (tile clicks and the four raw
//! trigger events); output events are published by the game core for
//! the view to render. Payload-carrying events clone board snapshots by
//! value, so a handler can never observe a later mutation.

use serde::{Deserialize, Serialize};
use torus_grid::{Generation, Unit};

/// The initial board is ready for editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeGameEvent {
    /// The initial, all-dead or pre-seeded board.
    pub generation: Generation,
}

/// The view clicked a tile during the editing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileClickedEvent {
    /// Clicked column.
    pub x: u32,
    /// Clicked row.
    pub y: u32,
}

/// A single cell's state changed while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitUpdatedEvent {
    /// The post-toggle unit.
    pub unit: Unit,
}

/// A freshly computed generation is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGenerationEvent {
    /// 1-based index of the new generation in the game's history.
    pub number: u64,
    /// The new board snapshot.
    pub generation: Generation,
}

/// Replay of a stored generation while navigating history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalGenerationEvent {
    /// Index of the snapshot in the game's history.
    pub number: u64,
    /// The stored board snapshot.
    pub generation: Generation,
}

/// The simulation reached a terminal condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverEvent {
    /// Human-readable reason, one of the two literal termination
    /// reasons the game core produces.
    pub reason: String,
}

/// The editing phase ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavingNotStartedStateEvent;

/// The view requested the simulation to start (or resume).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStartingEvent;

/// The view requested the simulation to pause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePausingEvent;

/// The view requested one step forward through history (or a fresh
/// generation at the end of it).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextGenerationEvent;

/// The view requested one step backward through history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrevGenerationEvent;
