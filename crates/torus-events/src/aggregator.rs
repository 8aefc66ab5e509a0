//! Synchronous, type-keyed publish/subscribe bus.
//!
//! The aggregator is an explicit value owned by the composition root
//! and handed to every collaborator that needs it -- there is no hidden
//! global. Delivery is synchronous and in subscription order; a handler
//! may publish further events, which run depth-first before the outer
//! publish returns. The whole system is single-threaded by design, so
//! handlers are `Rc`-shared and the subscription table lives behind a
//! `RefCell`.
//!
//! Subscription lifetime is explicit: a handler keeps firing until its
//! token is passed to [`EventAggregator::unsubscribe`]. A state that
//! forgets to unsubscribe leaks a handler that outlives its `dispose`.

use std::any::{Any, TypeId, type_name};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

/// Type-erased handler stored in the subscription table.
type BoxedHandler = Rc<dyn Fn(&dyn Any)>;

/// Opaque handle identifying a single subscription.
///
/// Returned by [`EventAggregator::subscribe`]; pass it back to
/// [`EventAggregator::unsubscribe`] to remove exactly that registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    type_id: TypeId,
    id: u64,
}

/// Synchronous, type-keyed publish/subscribe bus.
#[derive(Default)]
pub struct EventAggregator {
    next_id: Cell<u64>,
    subscriptions: RefCell<HashMap<TypeId, Vec<(SubscriptionToken, BoxedHandler)>>>,
}

impl fmt::Debug for EventAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventAggregator")
            .field("event_types", &self.subscriptions.borrow().len())
            .finish_non_exhaustive()
    }
}

impl EventAggregator {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every published event of type `E`.
    ///
    /// Returns the token that identifies this registration for
    /// [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<E: Any>(&self, handler: impl Fn(&E) + 'static) -> SubscriptionToken {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        let token = SubscriptionToken {
            type_id: TypeId::of::<E>(),
            id,
        };

        let erased: BoxedHandler = Rc::new(move |event: &dyn Any| {
            if let Some(typed) = event.downcast_ref::<E>() {
                handler(typed);
            }
        });

        self.subscriptions
            .borrow_mut()
            .entry(TypeId::of::<E>())
            .or_default()
            .push((token, erased));

        debug!(event = type_name::<E>(), id, "subscription added");
        token
    }

    /// Synchronously deliver `event` to every handler registered for
    /// its type, in subscription order.
    ///
    /// The handler list is snapshotted before delivery, so handlers may
    /// publish, subscribe, or unsubscribe re-entrantly; subscription
    /// changes take effect from the next publish onward.
    pub fn publish<E: Any>(&self, event: &E) {
        let handlers: Vec<BoxedHandler> = self
            .subscriptions
            .borrow()
            .get(&TypeId::of::<E>())
            .map(|entries| {
                entries
                    .iter()
                    .map(|(_, handler)| Rc::clone(handler))
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            event = type_name::<E>(),
            subscribers = handlers.len(),
            "publishing event"
        );

        for handler in &handlers {
            handler(event);
        }
    }

    /// Remove a single registration.
    ///
    /// Unsubscribing a token that was never subscribed, or whose event
    /// type has no subscribers, is a silent no-op; teardown stays
    /// idempotent.
    pub fn unsubscribe(&self, token: SubscriptionToken) {
        if let Some(entries) = self.subscriptions.borrow_mut().get_mut(&token.type_id) {
            entries.retain(|(existing, _)| *existing != token);
        }
    }

    /// Number of live subscriptions for event type `E`.
    pub fn subscriber_count<E: Any>(&self) -> usize {
        self.subscriptions
            .borrow()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Ping(u32);

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Pong(u32);

    #[test]
    fn fan_out_delivers_to_every_subscriber_once() {
        let bus = EventAggregator::new();
        let hits = Rc::new(RefCell::new(Vec::new()));

        for label in ["a", "b", "c"] {
            let hits = Rc::clone(&hits);
            let _token = bus.subscribe(move |_: &Ping| hits.borrow_mut().push(label));
        }

        bus.publish(&Ping(1));
        assert_eq!(*hits.borrow(), vec!["a", "b", "c"]);

        bus.publish(&Ping(2));
        assert_eq!(hits.borrow().len(), 6);
    }

    #[test]
    fn payload_of_the_published_instance_is_delivered() {
        let bus = EventAggregator::new();
        let seen = Rc::new(Cell::new(0));

        let seen_by_handler = Rc::clone(&seen);
        let _token = bus.subscribe(move |event: &Ping| seen_by_handler.set(event.0));

        bus.publish(&Ping(42));
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn events_are_keyed_by_type() {
        let bus = EventAggregator::new();
        let pings = Rc::new(Cell::new(0_u32));
        let pongs = Rc::new(Cell::new(0_u32));

        let count = Rc::clone(&pings);
        let _ping_token = bus.subscribe(move |_: &Ping| count.set(count.get().saturating_add(1)));
        let count = Rc::clone(&pongs);
        let _pong_token = bus.subscribe(move |_: &Pong| count.set(count.get().saturating_add(1)));

        bus.publish(&Ping(0));
        bus.publish(&Ping(0));
        bus.publish(&Pong(0));

        assert_eq!(pings.get(), 2);
        assert_eq!(pongs.get(), 1);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_registration() {
        let bus = EventAggregator::new();
        let hits = Rc::new(RefCell::new(Vec::new()));

        let recorder = Rc::clone(&hits);
        let keep = bus.subscribe(move |_: &Ping| recorder.borrow_mut().push("keep"));
        let recorder = Rc::clone(&hits);
        let drop_me = bus.subscribe(move |_: &Ping| recorder.borrow_mut().push("drop"));

        bus.unsubscribe(drop_me);
        bus.publish(&Ping(0));

        assert_eq!(*hits.borrow(), vec!["keep"]);
        assert_eq!(bus.subscriber_count::<Ping>(), 1);

        // Idempotent: unknown and already-removed tokens are no-ops.
        bus.unsubscribe(drop_me);
        bus.unsubscribe(keep);
        bus.unsubscribe(keep);
        assert_eq!(bus.subscriber_count::<Ping>(), 0);
    }

    #[test]
    fn reentrant_publish_runs_depth_first() {
        let bus = Rc::new(EventAggregator::new());
        let order = Rc::new(RefCell::new(Vec::new()));

        let inner_order = Rc::clone(&order);
        let _pong_token = bus.subscribe(move |_: &Pong| inner_order.borrow_mut().push("inner"));

        let outer_order = Rc::clone(&order);
        let inner_bus = Rc::clone(&bus);
        let _ping_token = bus.subscribe(move |_: &Ping| {
            outer_order.borrow_mut().push("outer-before");
            inner_bus.publish(&Pong(0));
            outer_order.borrow_mut().push("outer-after");
        });

        bus.publish(&Ping(0));
        assert_eq!(*order.borrow(), vec!["outer-before", "inner", "outer-after"]);
    }

    #[test]
    fn unsubscribe_during_publish_takes_effect_next_publish() {
        let bus = Rc::new(EventAggregator::new());
        let hits = Rc::new(Cell::new(0_u32));

        let token_slot: Rc<RefCell<Option<SubscriptionToken>>> = Rc::new(RefCell::new(None));
        let count = Rc::clone(&hits);
        let self_bus = Rc::clone(&bus);
        let self_slot = Rc::clone(&token_slot);
        let token = bus.subscribe(move |_: &Ping| {
            count.set(count.get().saturating_add(1));
            if let Some(own) = *self_slot.borrow() {
                self_bus.unsubscribe(own);
            }
        });
        *token_slot.borrow_mut() = Some(token);

        // Fires once (and removes itself mid-delivery without panicking).
        bus.publish(&Ping(0));
        assert_eq!(hits.get(), 1);

        // Gone on the next publish.
        bus.publish(&Ping(0));
        assert_eq!(hits.get(), 1);
    }
}
