//! Synchronous typed message bus.
//!
//! The [`MessageBus`] maps a message type to the ordered list of handlers
//! subscribed to it. [`MessageBus::publish`] runs every handler of that type
//! before it returns. Nothing is queued at this layer; subscribers that must
//! not act mid-frame (the world's add/destroy queues, the systems' tracking
//! lists) buffer the message themselves.
//!
//! Handlers receive the bus, so they may publish further messages. Delivery is
//! depth-first: a nested publish completes before the outer publish moves on
//! to its next handler.
//!
//! Every publish works on a snapshot of the subscriber list. Subscribing or
//! unsubscribing from inside a handler only affects later publishes. A handler
//! may be re-entered by a nested publish of its own message type, so handlers
//! are `Fn` and keep their mutable state behind `Cell`/`RefCell`, releasing any
//! borrow before they publish.
//!
//! Subscriptions are identified by the [`SubscriptionToken`] returned from
//! [`MessageBus::subscribe`], which is how a system detaches its handlers when
//! a level is torn down.
//!
//! # Example
//!
//! ```
//! use hopengine::events::bus::MessageBus;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! struct Ping(u32);
//!
//! let bus = MessageBus::new();
//! let seen = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&seen);
//! let token = bus.subscribe::<Ping>(move |ping, _bus| sink.set(ping.0));
//! bus.publish(Ping(7));
//! assert_eq!(seen.get(), 7);
//! assert!(bus.unsubscribe(token));
//! ```

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::trace;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

type Handler = Rc<dyn Fn(&dyn Any, &MessageBus)>;

/// Identifies one subscription for [`MessageBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    type_id: TypeId,
    id: u64,
}

#[derive(Default)]
pub struct MessageBus {
    subscribers: RefCell<FxHashMap<TypeId, Vec<(u64, Handler)>>>,
    next_id: Cell<u64>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for messages of type `M`. Handlers run in
    /// subscription order.
    pub fn subscribe<M: 'static>(
        &self,
        handler: impl Fn(&M, &MessageBus) + 'static,
    ) -> SubscriptionToken {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let erased: Handler = Rc::new(move |message: &dyn Any, bus: &MessageBus| {
            if let Some(message) = message.downcast_ref::<M>() {
                handler(message, bus);
            }
        });
        let type_id = TypeId::of::<M>();
        self.subscribers
            .borrow_mut()
            .entry(type_id)
            .or_default()
            .push((id, erased));
        SubscriptionToken { type_id, id }
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let Some(list) = subscribers.get_mut(&token.type_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != token.id);
        let removed = list.len() != before;
        if list.is_empty() {
            subscribers.remove(&token.type_id);
        }
        removed
    }

    /// Deliver `message` to every current subscriber of `M`.
    pub fn publish<M: 'static>(&self, message: M) {
        trace!("publish {}", std::any::type_name::<M>());
        let handlers: SmallVec<[Handler; 8]> =
            match self.subscribers.borrow().get(&TypeId::of::<M>()) {
                Some(list) => list.iter().map(|(_, handler)| Rc::clone(handler)).collect(),
                None => return,
            };

        for handler in handlers {
            handler(&message, self);
        }
    }

    pub fn subscriber_count<M: 'static>(&self) -> usize {
        self.subscribers
            .borrow()
            .get(&TypeId::of::<M>())
            .map_or(0, Vec::len)
    }
}
