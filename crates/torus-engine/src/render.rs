//! ASCII board rendering over the event bus.
//!
//! The renderer is a pure subscriber: it holds no game handle and only
//! sees what the bus delivers. Boards print as `#` (alive) and `.`
//! (dead) rows through the structured log, so the run's whole visual
//! history lands in the same stream as everything else.

use std::rc::Rc;

use torus_events::{
    EventAggregator, GameOverEvent, HistoricalGenerationEvent, InitializeGameEvent,
    LeavingNotStartedStateEvent, NewGenerationEvent, SubscriptionToken, UnitUpdatedEvent,
};
use torus_grid::Generation;
use tracing::{debug, info};

/// Render a board as newline-separated rows of `#` and `.`.
fn board_text(generation: &Generation) -> String {
    let width = generation.width();
    let mut rows = String::new();
    let mut column = 0u32;
    for unit in generation.units() {
        if column == width {
            rows.push('\n');
            column = 0;
        }
        rows.push(if unit.state.is_alive() { '#' } else { '.' });
        column = column.saturating_add(1);
    }
    rows
}

/// Bus subscriber that logs every board the simulation produces.
pub struct AsciiRenderer {
    bus: Rc<EventAggregator>,
    tokens: Vec<SubscriptionToken>,
}

impl AsciiRenderer {
    /// Create a detached renderer over the bus.
    pub const fn new(bus: Rc<EventAggregator>) -> Self {
        Self {
            bus,
            tokens: Vec::new(),
        }
    }

    /// Subscribe to every output event. Idempotent.
    pub fn attach(&mut self) {
        if !self.tokens.is_empty() {
            return;
        }

        let init = self.bus.subscribe(|event: &InitializeGameEvent| {
            info!(
                width = event.generation.width(),
                height = event.generation.height(),
                population = event.generation.population(),
                board = %board_text(&event.generation),
                "board initialized"
            );
        });
        let unit = self.bus.subscribe(|event: &UnitUpdatedEvent| {
            debug!(
                x = event.unit.x,
                y = event.unit.y,
                state = event.unit.state.name(),
                "unit updated"
            );
        });
        let leaving = self.bus.subscribe(|_: &LeavingNotStartedStateEvent| {
            debug!("editing phase ended");
        });
        let new_gen = self.bus.subscribe(|event: &NewGenerationEvent| {
            info!(
                number = event.number,
                population = event.generation.population(),
                board = %board_text(&event.generation),
                "new generation"
            );
        });
        let historical = self.bus.subscribe(|event: &HistoricalGenerationEvent| {
            info!(
                number = event.number,
                population = event.generation.population(),
                board = %board_text(&event.generation),
                "historical generation"
            );
        });
        let game_over = self.bus.subscribe(|event: &GameOverEvent| {
            info!(reason = %event.reason, "game over");
        });

        self.tokens = vec![init, unit, leaving, new_gen, historical, game_over];
    }

    /// Drop every subscription. Idempotent.
    pub fn detach(&mut self) {
        for token in self.tokens.drain(..) {
            self.bus.unsubscribe(token);
        }
    }
}

impl std::fmt::Debug for AsciiRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsciiRenderer")
            .field("attached", &!self.tokens.is_empty())
            .finish_non_exhaustive()
    }
}
