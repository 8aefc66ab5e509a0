//! Auto-advancing simulation phase.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use torus_events::EventAggregator;

use crate::game::Game;
use crate::states::{GameState, advance_and_publish};
use crate::ticker::{TickFlow, Ticker};

/// Running phase: advances one generation immediately on entry, then
/// keeps advancing on a fixed interval until paused, disposed, or game
/// over.
///
/// Dispose cancels the outstanding tick schedule -- the system's only
/// cancellation point.
pub struct RunningState {
    game: Rc<RefCell<Game>>,
    bus: Rc<EventAggregator>,
    ticker: Rc<dyn Ticker>,
    period: Duration,
    active: bool,
}

impl RunningState {
    /// Create the state over the shared game, bus, and tick scheduler.
    pub const fn new(
        game: Rc<RefCell<Game>>,
        bus: Rc<EventAggregator>,
        ticker: Rc<dyn Ticker>,
        period: Duration,
    ) -> Self {
        Self {
            game,
            bus,
            ticker,
            period,
            active: false,
        }
    }
}

impl GameState for RunningState {
    fn apply(&mut self) {
        if self.active {
            return;
        }
        self.active = true;

        // One generation right away; the timer covers the rest.
        if advance_and_publish(&self.game, &self.bus) == TickFlow::Stop {
            return;
        }

        let game = Rc::clone(&self.game);
        let bus = Rc::clone(&self.bus);
        self.ticker
            .start(self.period, Box::new(move || advance_and_publish(&game, &bus)));
    }

    fn dispose(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.ticker.cancel();
    }
}
