//! Composition root wiring the bus, the state machine, and the game
//! states together.
//!
//! The machine's transition table sequences the lifecycle:
//!
//! ```text
//! NotStarted --Start--> Running --Pause--> Paused --Start--> Running
//! ```
//!
//! Its pre-transition hooks dispose the outgoing phase's state object
//! and its post-transition hooks apply the incoming one, so exactly one
//! state is wired to the bus at any time. The raw trigger events from
//! the view ([`GameStartingEvent`], [`GamePausingEvent`]) are fed into
//! the machine by the flow's own subscriptions.
//!
//! Triggers go through a small queue rather than straight into the
//! machine: hooks publish output events mid-transition, and a handler
//! of those events may raise the next trigger re-entrantly (a view that
//! pauses on seeing a generation, say). The queued trigger is dispatched
//! right after the in-flight transition completes, which keeps the
//! depth-first publish contract without re-entering the machine.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use torus_events::{EventAggregator, GamePausingEvent, GameStartingEvent, SubscriptionToken};
use torus_fsm::StateMachine;
use tracing::info;

use crate::game::Game;
use crate::states::{GamePhase, GameState, NotStartedState, PausedState, RunningState, Trigger};
use crate::ticker::Ticker;

type SharedState = Rc<RefCell<dyn GameState>>;
type SharedMachine = Rc<RefCell<StateMachine<GamePhase, Trigger>>>;

/// Feed queued triggers into the machine until none remain.
///
/// No-op while a dispatch is already running higher up the stack; the
/// outermost dispatch drains everything queued beneath it.
fn drain_triggers(
    machine: &RefCell<StateMachine<GamePhase, Trigger>>,
    pending: &RefCell<VecDeque<Trigger>>,
    dispatching: &Cell<bool>,
) {
    if dispatching.get() {
        return;
    }

    dispatching.set(true);
    loop {
        let next = pending.borrow_mut().pop_front();
        let Some(next) = next else {
            break;
        };
        let _ = machine.borrow_mut().next_state(next);
    }
    dispatching.set(false);
}

/// Queue a trigger and dispatch it unless a transition is in flight.
fn feed_trigger(
    machine: &RefCell<StateMachine<GamePhase, Trigger>>,
    pending: &RefCell<VecDeque<Trigger>>,
    dispatching: &Cell<bool>,
    trigger: Trigger,
) {
    pending.borrow_mut().push_back(trigger);
    drain_triggers(machine, pending, dispatching);
}

/// Owns the lifecycle states and the machine that sequences them.
pub struct GameFlow {
    bus: Rc<EventAggregator>,
    machine: SharedMachine,
    states: HashMap<GamePhase, SharedState>,
    pending: Rc<RefCell<VecDeque<Trigger>>>,
    dispatching: Rc<Cell<bool>>,
    trigger_tokens: Vec<SubscriptionToken>,
}

impl GameFlow {
    /// Build the flow over a shared game, bus, and tick scheduler.
    ///
    /// `tick_period` is the Running state's auto-advance interval; it
    /// must be non-zero.
    pub fn new(
        game: Rc<RefCell<Game>>,
        bus: Rc<EventAggregator>,
        ticker: Rc<dyn Ticker>,
        tick_period: Duration,
    ) -> Self {
        let mut states: HashMap<GamePhase, SharedState> = HashMap::new();
        states.insert(
            GamePhase::NotStarted,
            Rc::new(RefCell::new(NotStartedState::new(
                Rc::clone(&game),
                Rc::clone(&bus),
            ))),
        );
        states.insert(
            GamePhase::Running,
            Rc::new(RefCell::new(RunningState::new(
                Rc::clone(&game),
                Rc::clone(&bus),
                ticker,
                tick_period,
            ))),
        );
        states.insert(
            GamePhase::Paused,
            Rc::new(RefCell::new(PausedState::new(game, Rc::clone(&bus)))),
        );

        let mut machine = StateMachine::new(GamePhase::NotStarted);
        machine.add_transition(GamePhase::NotStarted, Trigger::Start, GamePhase::Running);
        machine.add_transition(GamePhase::Running, Trigger::Pause, GamePhase::Paused);
        machine.add_transition(GamePhase::Paused, Trigger::Start, GamePhase::Running);

        for (phase, state) in &states {
            let leaving = Rc::clone(state);
            machine.on_transiting(*phase, move |_| leaving.borrow_mut().dispose());
            let entering = Rc::clone(state);
            machine.on_transited(*phase, move |_| entering.borrow_mut().apply());
        }

        Self {
            bus,
            machine: Rc::new(RefCell::new(machine)),
            states,
            pending: Rc::new(RefCell::new(VecDeque::new())),
            dispatching: Rc::new(Cell::new(false)),
            trigger_tokens: Vec::new(),
        }
    }

    /// Subscribe the machine to its raw trigger events and enter the
    /// NotStarted phase. Idempotent.
    pub fn start(&mut self) {
        if !self.trigger_tokens.is_empty() {
            return;
        }

        let machine = Rc::clone(&self.machine);
        let pending = Rc::clone(&self.pending);
        let dispatching = Rc::clone(&self.dispatching);
        let start_token = self.bus.subscribe(move |_: &GameStartingEvent| {
            feed_trigger(&machine, &pending, &dispatching, Trigger::Start);
        });
        let machine = Rc::clone(&self.machine);
        let pending = Rc::clone(&self.pending);
        let dispatching = Rc::clone(&self.dispatching);
        let pause_token = self.bus.subscribe(move |_: &GamePausingEvent| {
            feed_trigger(&machine, &pending, &dispatching, Trigger::Pause);
        });
        self.trigger_tokens = vec![start_token, pause_token];

        // The initial phase is entered directly; every later phase
        // change goes through the machine's hooks. The dispatch flag is
        // held so a trigger raised while entering queues instead of
        // disposing the state mid-apply.
        self.dispatching.set(true);
        if let Some(state) = self.states.get(&GamePhase::NotStarted) {
            state.borrow_mut().apply();
        }
        self.dispatching.set(false);
        drain_triggers(&self.machine, &self.pending, &self.dispatching);
        info!("game flow started");
    }

    /// The phase the machine currently rests in.
    pub fn current_phase(&self) -> GamePhase {
        *self.machine.borrow().current()
    }

    /// Dispose the active state, stop listening for triggers, and
    /// return the machine to the NotStarted phase so [`Self::start`]
    /// can run the flow again. Idempotent.
    pub fn shutdown(&mut self) {
        for token in self.trigger_tokens.drain(..) {
            self.bus.unsubscribe(token);
        }
        self.pending.borrow_mut().clear();

        let phase = self.current_phase();
        if let Some(state) = self.states.get(&phase) {
            state.borrow_mut().dispose();
        }
        self.machine.borrow_mut().reset(GamePhase::NotStarted);
        info!(?phase, "game flow shut down");
    }
}

impl std::fmt::Debug for GameFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameFlow")
            .field("phase", &self.current_phase())
            .finish_non_exhaustive()
    }
}
