//! Cancellable periodic tick scheduling for the Running state.
//!
//! The Running state's auto-advance is the system's only cancellation
//! point: pausing or disposing it must stop further ticks. Rather than
//! a self-rescheduling callback chain, scheduling goes through the
//! explicit [`Ticker`] seam -- [`TokioTicker`] runs the real interval
//! task, and [`ManualTicker`] fires ticks on demand in tests.

use std::cell::RefCell;
use std::fmt;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Whether the periodic callback wants further ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    /// Keep ticking.
    Continue,
    /// Stop the schedule; no further ticks will fire.
    Stop,
}

/// Callback fired once per scheduled tick.
pub type TickCallback = Box<dyn FnMut() -> TickFlow>;

/// Periodic tick scheduler.
///
/// `start` replaces any outstanding schedule; `cancel` stops it and is
/// idempotent. Implementations are single-threaded and shared by `Rc`,
/// so both methods take `&self`.
pub trait Ticker {
    /// Begin firing `tick` every `period`, starting one period from
    /// now. `period` must be non-zero.
    fn start(&self, period: Duration, tick: TickCallback);

    /// Stop the outstanding schedule, if any.
    fn cancel(&self);
}

/// Ticker backed by a tokio task on the current thread's `LocalSet`.
#[derive(Default)]
pub struct TokioTicker {
    handle: RefCell<Option<JoinHandle<()>>>,
}

impl TokioTicker {
    /// Create an idle ticker.
    pub const fn new() -> Self {
        Self {
            handle: RefCell::new(None),
        }
    }
}

impl fmt::Debug for TokioTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioTicker")
            .field("active", &self.handle.borrow().is_some())
            .finish()
    }
}

impl Ticker for TokioTicker {
    fn start(&self, period: Duration, mut tick: TickCallback) {
        self.cancel();
        let task = tokio::task::spawn_local(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval completes immediately;
            // the Running state already advanced on apply, so swallow it.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tick() == TickFlow::Stop {
                    break;
                }
            }
        });
        *self.handle.borrow_mut() = Some(task);
        debug!(period_ms = period.as_millis(), "ticker started");
    }

    fn cancel(&self) {
        if let Some(task) = self.handle.borrow_mut().take() {
            task.abort();
            debug!("ticker cancelled");
        }
    }
}

/// Test double: holds the callback and fires ticks on demand, no
/// runtime required.
#[derive(Default)]
pub struct ManualTicker {
    tick: RefCell<Option<TickCallback>>,
}

impl ManualTicker {
    /// Create an idle ticker.
    pub const fn new() -> Self {
        Self {
            tick: RefCell::new(None),
        }
    }

    /// Whether a schedule is outstanding.
    pub fn is_active(&self) -> bool {
        self.tick.borrow().is_some()
    }

    /// Fire one tick. Returns the callback's flow decision, or `None`
    /// when nothing is scheduled. A callback returning
    /// [`TickFlow::Stop`] is dropped, as the real interval task would
    /// stop running it.
    pub fn fire(&self) -> Option<TickFlow> {
        // Take the callback out so it can re-enter the ticker (e.g. a
        // dispose path calling cancel) without a double borrow.
        let mut tick = self.tick.borrow_mut().take()?;
        let flow = tick();
        if flow == TickFlow::Continue {
            let mut slot = self.tick.borrow_mut();
            if slot.is_none() {
                *slot = Some(tick);
            }
        }
        Some(flow)
    }
}

impl fmt::Debug for ManualTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTicker")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Ticker for ManualTicker {
    fn start(&self, _period: Duration, tick: TickCallback) {
        *self.tick.borrow_mut() = Some(tick);
    }

    fn cancel(&self) {
        self.tick.borrow_mut().take();
    }
}
