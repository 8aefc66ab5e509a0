//! End-to-end control flow: editing, running, pausing, history
//! navigation, and resuming, all driven through the event bus.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use torus_events::{
    EventAggregator, GameOverEvent, GamePausingEvent, GameStartingEvent,
    HistoricalGenerationEvent, InitializeGameEvent, LeavingNotStartedStateEvent,
    NewGenerationEvent, NextGenerationEvent, PrevGenerationEvent, TileClickedEvent,
    UnitUpdatedEvent,
};
use torus_game::{Game, GameFlow, GamePhase, ManualTicker, Ticker};

struct Harness {
    bus: Rc<EventAggregator>,
    game: Rc<RefCell<Game>>,
    ticker: Rc<ManualTicker>,
    flow: GameFlow,
    log: Rc<RefCell<Vec<String>>>,
}

/// Build a 5x5 flow with a manual ticker and a recorder subscribed to
/// every output event, in the role of the view.
fn harness() -> Harness {
    let bus = Rc::new(EventAggregator::new());
    let game = Rc::new(RefCell::new(Game::new(5, 5).unwrap()));
    let ticker = Rc::new(ManualTicker::new());
    let log = Rc::new(RefCell::new(Vec::new()));

    let entries = Rc::clone(&log);
    let _t = bus.subscribe(move |event: &InitializeGameEvent| {
        entries
            .borrow_mut()
            .push(format!("init pop={}", event.generation.population()));
    });
    let entries = Rc::clone(&log);
    let _t = bus.subscribe(move |event: &UnitUpdatedEvent| {
        entries
            .borrow_mut()
            .push(format!("unit ({},{})", event.unit.x, event.unit.y));
    });
    let entries = Rc::clone(&log);
    let _t = bus.subscribe(move |_: &LeavingNotStartedStateEvent| {
        entries.borrow_mut().push(String::from("leaving-edit"));
    });
    let entries = Rc::clone(&log);
    let _t = bus.subscribe(move |event: &NewGenerationEvent| {
        entries.borrow_mut().push(format!("new-{}", event.number));
    });
    let entries = Rc::clone(&log);
    let _t = bus.subscribe(move |event: &HistoricalGenerationEvent| {
        entries.borrow_mut().push(format!("hist-{}", event.number));
    });
    let entries = Rc::clone(&log);
    let _t = bus.subscribe(move |event: &GameOverEvent| {
        entries.borrow_mut().push(format!("over: {}", event.reason));
    });

    let flow = GameFlow::new(
        Rc::clone(&game),
        Rc::clone(&bus),
        Rc::clone(&ticker) as Rc<dyn Ticker>,
        Duration::from_millis(100),
    );

    Harness {
        bus,
        game,
        ticker,
        flow,
        log,
    }
}

#[test]
fn full_session_edit_run_pause_navigate_resume() {
    let mut hx = harness();

    // Entering the flow announces the empty board for editing.
    hx.flow.start();
    assert_eq!(hx.flow.current_phase(), GamePhase::NotStarted);
    assert_eq!(*hx.log.borrow(), vec!["init pop=0"]);

    // Seed a blinker through tile clicks.
    for (x, y) in [(1, 2), (2, 2), (3, 2)] {
        hx.bus.publish(&TileClickedEvent { x, y });
    }
    assert_eq!(hx.game.borrow().current().population(), 3);
    assert_eq!(
        *hx.log.borrow(),
        vec!["init pop=0", "unit (1,2)", "unit (2,2)", "unit (3,2)"]
    );
    hx.log.borrow_mut().clear();

    // Start: the editing phase is torn down before Running advances.
    hx.bus.publish(&GameStartingEvent);
    assert_eq!(hx.flow.current_phase(), GamePhase::Running);
    assert_eq!(*hx.log.borrow(), vec!["leaving-edit", "new-1"]);
    assert!(hx.ticker.is_active());

    // Clicks no longer edit the board.
    hx.bus.publish(&TileClickedEvent { x: 0, y: 0 });
    assert_eq!(hx.game.borrow().current().population(), 3);

    // The scheduler drives further generations.
    let _ = hx.ticker.fire();
    assert_eq!(*hx.log.borrow(), vec!["leaving-edit", "new-1", "new-2"]);

    // Pause: the ticker is cancelled, history navigation takes over.
    hx.bus.publish(&GamePausingEvent);
    assert_eq!(hx.flow.current_phase(), GamePhase::Paused);
    assert!(!hx.ticker.is_active());
    assert_eq!(hx.ticker.fire(), None);
    hx.log.borrow_mut().clear();

    // Walk backward through stored snapshots, flooring at the initial
    // board, then forward again.
    hx.bus.publish(&PrevGenerationEvent);
    hx.bus.publish(&PrevGenerationEvent);
    hx.bus.publish(&PrevGenerationEvent);
    hx.bus.publish(&NextGenerationEvent);
    hx.bus.publish(&NextGenerationEvent);
    assert_eq!(
        *hx.log.borrow(),
        vec!["hist-1", "hist-0", "hist-0", "hist-1", "hist-2"]
    );

    // Forward past the end of history computes a fresh generation.
    hx.bus.publish(&NextGenerationEvent);
    assert_eq!(hx.log.borrow().last().unwrap(), "new-3");
    assert_eq!(hx.game.borrow().history_len(), 4);
    hx.log.borrow_mut().clear();

    // Resume: Paused handlers are gone, Running picks up immediately.
    hx.bus.publish(&GameStartingEvent);
    assert_eq!(hx.flow.current_phase(), GamePhase::Running);
    assert_eq!(*hx.log.borrow(), vec!["new-4"]);
    assert!(hx.ticker.is_active());
    hx.bus.publish(&NextGenerationEvent);
    assert_eq!(*hx.log.borrow(), vec!["new-4"]);

    // Shutdown tears the active state down.
    hx.flow.shutdown();
    assert!(!hx.ticker.is_active());
}

#[test]
fn stable_board_ends_the_game_while_running() {
    let mut hx = harness();
    hx.flow.start();

    // An L-tromino becomes a block (gen 1), which is then stable.
    for (x, y) in [(2, 2), (3, 2), (2, 3)] {
        hx.bus.publish(&TileClickedEvent { x, y });
    }
    hx.log.borrow_mut().clear();

    hx.bus.publish(&GameStartingEvent);
    assert_eq!(*hx.log.borrow(), vec!["leaving-edit", "new-1"]);

    let _ = hx.ticker.fire();
    assert_eq!(
        hx.log.borrow().last().unwrap(),
        "over: The game came to a stable state"
    );
    assert!(!hx.ticker.is_active() || hx.ticker.fire().is_none());

    // Pausing afterwards still allows replaying what happened.
    hx.bus.publish(&GamePausingEvent);
    hx.log.borrow_mut().clear();
    hx.bus.publish(&PrevGenerationEvent);
    assert_eq!(*hx.log.borrow(), vec!["hist-1"]);

    // Stepping forward at the end republishes the terminal reason.
    hx.bus.publish(&NextGenerationEvent);
    hx.bus.publish(&NextGenerationEvent);
    assert_eq!(
        hx.log.borrow().last().unwrap(),
        "over: The game came to a stable state"
    );

    hx.flow.shutdown();
}

#[test]
fn a_handler_may_pause_in_reaction_to_a_new_generation() {
    let mut hx = harness();
    hx.flow.start();
    for (x, y) in [(1, 2), (2, 2), (3, 2)] {
        hx.bus.publish(&TileClickedEvent { x, y });
    }

    // A view that pauses as soon as it sees a generation: the pause
    // trigger is raised from inside the start transition's own event
    // delivery.
    let bus = Rc::clone(&hx.bus);
    let _t = hx
        .bus
        .subscribe(move |_: &NewGenerationEvent| bus.publish(&GamePausingEvent));

    hx.bus.publish(&GameStartingEvent);
    assert_eq!(hx.flow.current_phase(), GamePhase::Paused);
    assert!(!hx.ticker.is_active());

    // History navigation is live immediately.
    hx.bus.publish(&PrevGenerationEvent);
    assert_eq!(hx.log.borrow().last().unwrap(), "hist-0");

    hx.flow.shutdown();
}

#[test]
fn shutdown_returns_the_flow_to_the_initial_phase() {
    let mut hx = harness();
    hx.flow.start();
    for (x, y) in [(1, 2), (2, 2), (3, 2)] {
        hx.bus.publish(&TileClickedEvent { x, y });
    }
    hx.bus.publish(&GameStartingEvent);
    assert_eq!(hx.flow.current_phase(), GamePhase::Running);

    hx.flow.shutdown();
    assert_eq!(hx.flow.current_phase(), GamePhase::NotStarted);
    assert!(!hx.ticker.is_active());

    // A fresh start announces the board again and editing resumes.
    hx.log.borrow_mut().clear();
    hx.flow.start();
    assert_eq!(*hx.log.borrow(), vec!["init pop=3"]);
    hx.bus.publish(&TileClickedEvent { x: 0, y: 0 });
    assert_eq!(hx.game.borrow().current().population(), 4);

    hx.flow.shutdown();
}

#[test]
fn triggers_without_a_transition_are_ignored() {
    let mut hx = harness();
    hx.flow.start();

    // Pausing before starting does nothing: no transition from
    // NotStarted on Pause.
    hx.bus.publish(&GamePausingEvent);
    assert_eq!(hx.flow.current_phase(), GamePhase::NotStarted);
    assert_eq!(*hx.log.borrow(), vec!["init pop=0"]);

    // Editing still works.
    hx.bus.publish(&TileClickedEvent { x: 0, y: 0 });
    assert_eq!(hx.game.borrow().current().population(), 1);

    hx.flow.shutdown();
}
