//! Pre-simulation editing phase.

use std::cell::RefCell;
use std::rc::Rc;

use torus_events::{
    EventAggregator, InitializeGameEvent, LeavingNotStartedStateEvent, SubscriptionToken,
    TileClickedEvent, UnitUpdatedEvent,
};
use tracing::warn;

use crate::game::Game;
use crate::states::GameState;

/// Editing phase: the initial board is live and editable one tile at a
/// time.
///
/// On apply, the initial board (`history[0]`) is announced with
/// [`InitializeGameEvent`] and tile clicks start toggling cells in
/// place, each confirmed with a [`UnitUpdatedEvent`]. On dispose the
/// click handler is removed and [`LeavingNotStartedStateEvent`] marks
/// the end of the editing phase.
pub struct NotStartedState {
    game: Rc<RefCell<Game>>,
    bus: Rc<EventAggregator>,
    click_token: Option<SubscriptionToken>,
}

impl NotStartedState {
    /// Create the state over the shared game and bus.
    pub const fn new(game: Rc<RefCell<Game>>, bus: Rc<EventAggregator>) -> Self {
        Self {
            game,
            bus,
            click_token: None,
        }
    }
}

impl GameState for NotStartedState {
    fn apply(&mut self) {
        if self.click_token.is_some() {
            return;
        }

        let initial = self.game.borrow().current().clone();
        self.bus
            .publish(&InitializeGameEvent { generation: initial });

        let game = Rc::clone(&self.game);
        let bus = Rc::clone(&self.bus);
        let token = self.bus.subscribe(move |click: &TileClickedEvent| {
            let toggled = game.borrow_mut().toggle_unit(click.x, click.y);
            match toggled {
                Ok(unit) => bus.publish(&UnitUpdatedEvent { unit }),
                // Coordinate validation is the view's job; a stray
                // click outside the board is dropped, not fatal.
                Err(error) => warn!(x = click.x, y = click.y, %error, "tile click ignored"),
            }
        });
        self.click_token = Some(token);
    }

    fn dispose(&mut self) {
        let Some(token) = self.click_token.take() else {
            return;
        };
        self.bus.unsubscribe(token);
        self.bus.publish(&LeavingNotStartedStateEvent);
    }
}
