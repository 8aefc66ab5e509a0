//! Lifecycle states of the simulation.
//!
//! Each state owns one slice of behavior -- editing the initial board
//! (NotStarted), auto-advancing generations (Running), and navigating
//! history (Paused). A state is activated with [`GameState::apply`] and
//! torn down with [`GameState::dispose`]; both are idempotent. Enter
//! wires bus subscriptions, exit removes them -- only the currently
//! active state mutates the game, by this discipline rather than by
//! locking.

mod not_started;
mod paused;
mod running;

use std::cell::RefCell;
use std::rc::Rc;

use torus_events::{EventAggregator, GameOverEvent, NewGenerationEvent};
use tracing::warn;

use crate::game::{Game, GameError, Outcome};
use crate::ticker::TickFlow;

pub use not_started::NotStartedState;
pub use paused::PausedState;
pub use running::RunningState;

/// Identity of a lifecycle phase, used as the state value in the
/// transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Editing the initial board.
    NotStarted,
    /// Auto-advancing generations on a timer.
    Running,
    /// Navigating stored history, or stepping manually.
    Paused,
}

/// Trigger values driving phase transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Start or resume the simulation.
    Start,
    /// Pause the simulation.
    Pause,
}

/// Behavior slice owned by a lifecycle phase.
pub trait GameState {
    /// Enter the state: wire subscriptions and perform the entry
    /// behavior. Idempotent.
    fn apply(&mut self);

    /// Exit the state: tear down every subscription made in `apply`.
    /// Idempotent.
    fn dispose(&mut self);
}

/// Advance the game once and publish the outcome.
///
/// Shared by the Running state (on apply and on every tick) and the
/// Paused state (when stepping past the end of stored history):
///
/// - continuing -> [`NewGenerationEvent`], keep ticking
/// - game over  -> [`GameOverEvent`], stop
/// - already over -> republish [`GameOverEvent`] so a view that missed
///   the first notification still converges, and stop
pub(crate) fn advance_and_publish(game: &Rc<RefCell<Game>>, bus: &EventAggregator) -> TickFlow {
    let advanced = game.borrow_mut().advance();
    match advanced {
        Ok(advance) => match advance.outcome {
            Outcome::Continuing => {
                bus.publish(&NewGenerationEvent {
                    number: advance.number,
                    generation: advance.generation,
                });
                TickFlow::Continue
            }
            Outcome::GameOver(reason) => {
                bus.publish(&GameOverEvent {
                    reason: reason.to_string(),
                });
                TickFlow::Stop
            }
        },
        Err(GameError::AlreadyOver { reason }) => {
            bus.publish(&GameOverEvent {
                reason: reason.to_string(),
            });
            TickFlow::Stop
        }
        Err(error) => {
            warn!(%error, "generation advance failed");
            TickFlow::Stop
        }
    }
}
