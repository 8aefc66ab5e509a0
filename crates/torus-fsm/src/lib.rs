//! Generic table-driven finite-state machine with transition hooks.
//!
//! States and triggers are opaque values: a transition is looked up by
//! the pair `(current state, trigger)`, never by subclassed behavior.
//! Two hook maps surround a transition -- pre-transition hooks keyed by
//! the state being left, post-transition hooks keyed by the state being
//! entered -- which is exactly the seam a caller needs to tear down the
//! outgoing state and activate the incoming one.
//!
//! A trigger with no configured transition leaves the machine where it
//! is: the current state is returned unchanged and no hooks fire.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

/// Callback invoked around a transition, receiving the state it is
/// keyed by.
type Hook<S> = Box<dyn FnMut(&S)>;

/// Table-driven transition engine over opaque state and trigger values.
pub struct StateMachine<S, T> {
    current: S,
    transitions: HashMap<(S, T), S>,
    transiting_hooks: HashMap<S, Hook<S>>,
    transited_hooks: HashMap<S, Hook<S>>,
}

impl<S, T> StateMachine<S, T>
where
    S: Clone + Eq + Hash + Debug,
    T: Eq + Hash + Debug,
{
    /// Create a machine resting in `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            transitions: HashMap::new(),
            transiting_hooks: HashMap::new(),
            transited_hooks: HashMap::new(),
        }
    }

    /// The state the machine currently rests in.
    pub const fn current(&self) -> &S {
        &self.current
    }

    /// Register a transition: while in `from`, `trigger` moves the
    /// machine to `to`. A later registration for the same pair
    /// overwrites the earlier one.
    pub fn add_transition(&mut self, from: S, trigger: T, to: S) {
        self.transitions.insert((from, trigger), to);
    }

    /// Register the pre-transition hook for `state`, invoked whenever a
    /// transition leaves that state, before the current state changes.
    pub fn on_transiting(&mut self, state: S, hook: impl FnMut(&S) + 'static) {
        self.transiting_hooks.insert(state, Box::new(hook));
    }

    /// Register the post-transition hook for `state`, invoked whenever
    /// a transition enters that state, after the current state changed.
    pub fn on_transited(&mut self, state: S, hook: impl FnMut(&S) + 'static) {
        self.transited_hooks.insert(state, Box::new(hook));
    }

    /// Force the machine into `state` without consulting the
    /// transition table. No hooks fire; this is a teardown path, not a
    /// transition.
    pub fn reset(&mut self, state: S) {
        debug!(from = ?self.current, to = ?state, "reset");
        self.current = state;
    }

    /// Feed a trigger to the machine and return the resulting state.
    ///
    /// If the table has no entry for `(current, trigger)`, the current
    /// state is returned unchanged and no hooks fire. Otherwise the
    /// pre-transition hook bound to the outgoing state runs first, then
    /// the current state is updated, then the post-transition hook
    /// bound to the incoming state runs.
    pub fn next_state(&mut self, trigger: T) -> S {
        let key = (self.current.clone(), trigger);
        let Some(target) = self.transitions.get(&key).cloned() else {
            debug!(current = ?self.current, trigger = ?key.1, "no transition, staying");
            return self.current.clone();
        };

        debug!(from = ?self.current, to = ?target, trigger = ?key.1, "transition");

        let leaving = self.current.clone();
        if let Some(hook) = self.transiting_hooks.get_mut(&leaving) {
            hook(&leaving);
        }

        self.current = target.clone();

        if let Some(hook) = self.transited_hooks.get_mut(&target) {
            hook(&target);
        }

        target
    }
}

impl<S: Debug, T> Debug for StateMachine<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("transitions", &self.transitions.len())
            .finish_non_exhaustive()
    }
}
