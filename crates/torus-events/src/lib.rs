//! Event types and the publish/subscribe bus for the Torus Life
//! simulation.
//!
//! The bus decouples the game core and its lifecycle states from the
//! presentation layer: the view raises input events (tile clicks,
//! start/pause/next/prev), the active game state reacts and republishes
//! result events (new generation, historical generation, game over)
//! that the view renders.
//!
//! # Modules
//!
//! - [`aggregator`] -- the synchronous, type-keyed [`EventAggregator`]
//! - [`events`] -- every message exchanged over the bus

pub mod aggregator;
pub mod events;

pub use aggregator::{EventAggregator, SubscriptionToken};
pub use events::{
    GameOverEvent, GamePausingEvent, GameStartingEvent, HistoricalGenerationEvent,
    InitializeGameEvent, LeavingNotStartedStateEvent, NewGenerationEvent, NextGenerationEvent,
    PrevGenerationEvent, TileClickedEvent, UnitUpdatedEvent,
};
