//! Game core and control flow for the Torus Life simulation.
//!
//! This crate owns everything between the board model and the view:
//! the [`Game`] with its append-only generation history and termination
//! detection, the cancellable [`Ticker`] that drives auto-advancement,
//! the three lifecycle states (NotStarted, Running, Paused), and the
//! [`GameFlow`] composition root that wires the event bus and the state
//! machine together.
//!
//! # Modules
//!
//! - [`game`] -- generation history, advancement, game-over classification
//! - [`ticker`] -- cancellable periodic tick scheduling
//! - [`states`] -- the lifecycle states and their apply/dispose discipline
//! - [`flow`] -- the composition root sequencing the states

pub mod flow;
pub mod game;
pub mod states;
pub mod ticker;

pub use flow::GameFlow;
pub use game::{Advance, Game, GameError, GameOverReason, Outcome};
pub use states::{GamePhase, GameState, NotStartedState, PausedState, RunningState, Trigger};
pub use ticker::{ManualTicker, TickFlow, Ticker, TokioTicker};
