//! History navigation phase.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use torus_events::{
    EventAggregator, HistoricalGenerationEvent, NextGenerationEvent, PrevGenerationEvent,
    SubscriptionToken,
};

use crate::game::Game;
use crate::states::{GameState, advance_and_publish};
use crate::ticker::TickFlow;

/// Paused phase: steps backward and forward through stored history.
///
/// A cursor tracks the position in the game's history. Stepping forward
/// while stored generations remain ahead replays them as
/// [`HistoricalGenerationEvent`]s; stepping forward at the end of
/// history computes a fresh generation exactly like the Running state.
/// Stepping backward decrements the cursor, never below the initial
/// board.
pub struct PausedState {
    game: Rc<RefCell<Game>>,
    bus: Rc<EventAggregator>,
    cursor: Rc<Cell<u64>>,
    tokens: Vec<SubscriptionToken>,
}

impl PausedState {
    /// Create the state over the shared game and bus.
    pub fn new(game: Rc<RefCell<Game>>, bus: Rc<EventAggregator>) -> Self {
        Self {
            game,
            bus,
            cursor: Rc::new(Cell::new(0)),
            tokens: Vec::new(),
        }
    }
}

/// Publish the stored snapshot at `number`, moving the cursor onto it.
fn replay(
    game: &Rc<RefCell<Game>>,
    bus: &EventAggregator,
    cursor: &Cell<u64>,
    number: u64,
) {
    let snapshot = game.borrow().generation_at(number).cloned();
    if let Some(generation) = snapshot {
        cursor.set(number);
        bus.publish(&HistoricalGenerationEvent { number, generation });
    }
}

impl GameState for PausedState {
    fn apply(&mut self) {
        if !self.tokens.is_empty() {
            return;
        }

        self.cursor.set(self.game.borrow().generation_number());

        let game = Rc::clone(&self.game);
        let bus = Rc::clone(&self.bus);
        let cursor = Rc::clone(&self.cursor);
        let next_token = self.bus.subscribe(move |_: &NextGenerationEvent| {
            let newest = game.borrow().generation_number();
            let at = cursor.get();
            if at < newest {
                // Stored history remains ahead: replay it.
                replay(&game, &bus, &cursor, at.saturating_add(1));
            } else {
                // At the end of history: compute a fresh generation.
                // The cursor follows the newest entry either way, so a
                // later Prev still walks the full history.
                let _flow: TickFlow = advance_and_publish(&game, &bus);
                cursor.set(game.borrow().generation_number());
            }
        });

        let game = Rc::clone(&self.game);
        let bus = Rc::clone(&self.bus);
        let cursor = Rc::clone(&self.cursor);
        let prev_token = self.bus.subscribe(move |_: &PrevGenerationEvent| {
            replay(&game, &bus, &cursor, cursor.get().saturating_sub(1));
        });

        self.tokens = vec![next_token, prev_token];
    }

    fn dispose(&mut self) {
        for token in self.tokens.drain(..) {
            self.bus.unsubscribe(token);
        }
    }
}
