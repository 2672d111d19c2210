#![forbid(unsafe_code)]

//! Document-level key listener registry.
//!
//! The host owns one [`KeyListeners`] and feeds every key event into
//! [`KeyListeners::dispatch`]. Components register interest with
//! [`KeyListeners::subscribe`] and keep the returned [`Subscription`] for as
//! long as they want events.
//!
//! # Invariants
//!
//! 1. Listeners are called in registration order.
//! 2. Dropping a [`Subscription`] removes the listener before the next
//!    dispatch.
//! 3. `dispatch` calls a snapshot taken when it starts: listeners added
//!    during dispatch first see the next event, and listeners removed
//!    during dispatch are still called for the current one if they had not
//!    run yet.
//!
//! # Failure Modes
//!
//! - Listener panic: propagates to the caller of `dispatch`.
//! - Registry dropped while subscriptions are alive: the subscriptions
//!   become inert.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use fmodal_core::event::KeyEvent;

/// Identifier of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

type Listener = Rc<dyn Fn(&KeyEvent)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

/// Shared key listener registry. Clones share the same registry.
#[derive(Clone, Default)]
pub struct KeyListeners {
    inner: Rc<RefCell<Registry>>,
}

impl fmt::Debug for KeyListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyListeners")
            .field("len", &self.len())
            .finish()
    }
}

impl KeyListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` until the returned subscription is dropped.
    #[must_use = "dropping the subscription removes the listener"]
    pub fn subscribe(&self, listener: impl Fn(&KeyEvent) + 'static) -> Subscription {
        let mut registry = self.inner.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((id, Rc::new(listener)));

        tracing::trace!(
            listener = id.0,
            total = registry.listeners.len(),
            "key listener added"
        );

        Subscription {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every registered listener. Returns how many ran.
    pub fn dispatch(&self, event: &KeyEvent) -> usize {
        let snapshot: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn remove_in(registry: &RefCell<Registry>, id: ListenerId) -> bool {
    let removed = {
        let mut registry = registry.borrow_mut();
        let index = registry.listeners.iter().position(|(lid, _)| *lid == id);
        index.map(|i| registry.listeners.remove(i))
    };
    // Listener dropped here, outside the borrow.
    match removed {
        Some(_) => {
            tracing::trace!(listener = id.0, "key listener removed");
            true
        }
        None => false,
    }
}

/// RAII registration of a key listener. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| {
            registry
                .borrow()
                .listeners
                .iter()
                .any(|(lid, _)| *lid == self.id)
        })
    }

    /// Unsubscribe explicitly. Returns `true` if the listener was registered.
    pub fn unsubscribe(self) -> bool {
        self.remove()
    }

    fn remove(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => remove_in(&registry, self.id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}
