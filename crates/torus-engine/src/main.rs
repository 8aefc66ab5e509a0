//! Engine binary for the Torus Life simulation.
//!
//! Wires the game core, the event bus, the lifecycle flow, and the
//! ASCII renderer into a bounded headless run: seed the board, start
//! the simulation, and stop on game over or when a run bound is hit.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `torus-config.yaml`
//! 3. Build the event bus, game, and ticker
//! 4. Attach the renderer and the game-over latch
//! 5. Start the game flow and seed the board with tile clicks
//! 6. Publish the start trigger and watch the run bounds
//! 7. Pause, log the final summary, and shut down

mod config;
mod error;
mod render;
mod seed;

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tokio::task::LocalSet;
use torus_events::{
    EventAggregator, GameOverEvent, GamePausingEvent, GameStartingEvent, TileClickedEvent,
};
use torus_game::{Game, GameFlow, Ticker, TokioTicker};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::render::AsciiRenderer;

/// Why the bounded run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndReason {
    /// The game itself terminated (extinction or stable state).
    GameOver,
    /// The configured generation cap was reached.
    MaxGenerations,
    /// The configured wall-clock cap was reached.
    MaxRealTime,
}

/// Application entry point for the engine.
///
/// The whole simulation is single-threaded and cooperative, so the
/// runtime is `current_thread` and the run happens inside a [`LocalSet`]
/// (the ticker spawns local tasks).
///
/// # Errors
///
/// Returns an error if configuration loading or game construction fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), EngineError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("torus-engine starting");

    // 2. Load configuration.
    let config = EngineConfig::load_or_default(Path::new("torus-config.yaml"))?;
    info!(
        width = config.board.width,
        height = config.board.height,
        tick_interval_ms = config.run.tick_interval_ms,
        max_generations = config.run.max_generations,
        max_real_time_seconds = config.run.max_real_time_seconds,
        "Configuration loaded"
    );

    let local = LocalSet::new();
    local.run_until(run(config)).await?;

    info!("torus-engine shutdown complete");
    Ok(())
}

/// Build every subsystem and drive the bounded run.
async fn run(config: EngineConfig) -> Result<(), EngineError> {
    // 3. Build the event bus, game, and ticker.
    let bus = Rc::new(EventAggregator::new());
    let game = Rc::new(RefCell::new(Game::new(
        config.board.width,
        config.board.height,
    )?));
    let ticker: Rc<dyn Ticker> = Rc::new(TokioTicker::new());
    let tick_period = Duration::from_millis(config.run.tick_interval_ms);

    // 4. Attach the renderer and the game-over latch.
    let mut renderer = AsciiRenderer::new(Rc::clone(&bus));
    renderer.attach();

    let game_over = Rc::new(Cell::new(false));
    let latch = Rc::clone(&game_over);
    let latch_token = bus.subscribe(move |_: &GameOverEvent| latch.set(true));

    // 5. Start the game flow and seed the board.
    let mut flow = GameFlow::new(Rc::clone(&game), Rc::clone(&bus), ticker, tick_period);
    flow.start();

    let cells = seed::seed_cells(&config);
    info!(cell_count = cells.len(), "Seeding the board");
    for (x, y) in cells {
        bus.publish(&TileClickedEvent { x, y });
    }

    // 6. Publish the start trigger and watch the run bounds.
    let started_at = Instant::now();
    let max_real_time = Duration::from_secs(config.run.max_real_time_seconds);
    bus.publish(&GameStartingEvent);

    let end_reason = loop {
        tokio::time::sleep(tick_period).await;

        if game_over.get() {
            break EndReason::GameOver;
        }
        if config.run.max_generations > 0
            && game.borrow().generation_number() >= config.run.max_generations
        {
            break EndReason::MaxGenerations;
        }
        if config.run.max_real_time_seconds > 0 && started_at.elapsed() >= max_real_time {
            break EndReason::MaxRealTime;
        }
    };

    // 7. Pause, log the final summary, and shut down.
    bus.publish(&GamePausingEvent);

    {
        let game = game.borrow();
        info!(
            ?end_reason,
            generations = game.generation_number(),
            population = game.current().population(),
            "Run finished"
        );
        let snapshot = serde_json::to_string(game.current())?;
        debug!(%snapshot, "Final board snapshot");
    }

    flow.shutdown();
    renderer.detach();
    bus.unsubscribe(latch_token);

    Ok(())
}
