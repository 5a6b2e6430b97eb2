//! Observable session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store is the single source of truth for "who is logged in". UI code
//! subscribes to it; the bootstrap and login/logout flows replace its value.
//! A permanent subscriber registered at construction mirrors every value to
//! durable storage, so a reload starts from the last known user.
//!
//! DESIGN
//! ======
//! `SessionStore` is a cheap handle around shared single-threaded state
//! (`Rc` + `RefCell`). Notification runs with no borrow held, so subscribers
//! may call `set` or `subscribe` from inside their callback. A `set` issued
//! during notification is queued and delivered after the current round, so
//! every subscriber observes values in call order. Each `set` carries a
//! version; a subscriber only receives rounds newer than the value it was
//! handed on registration.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::net::types::User;
use crate::util::storage::{SESSION_STORAGE_KEY, SessionStorage, load_json, save_json};

type Callback = Rc<dyn Fn(Option<&User>)>;

struct Inner {
    value: RefCell<Option<User>>,
    resolved: Cell<bool>,
    /// `(id, version seen at registration, callback)`.
    subscribers: RefCell<Vec<(u64, u64, Callback)>>,
    next_id: Cell<u64>,
    version: Cell<u64>,
    notifying: Cell<bool>,
    pending: RefCell<VecDeque<(u64, Option<User>)>>,
}

/// Ends a notification run, even when a subscriber unwinds.
struct NotifyGuard<'a>(&'a Inner);

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.0.notifying.set(false);
        self.0.pending.borrow_mut().clear();
    }
}

/// Holds at most one current [`User`] and notifies subscribers on change.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<Inner>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("value", &self.inner.value.borrow())
            .field("resolved", &self.inner.resolved.get())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl SessionStore {
    /// Seed the store from `storage` and start mirroring changes back to it.
    ///
    /// Absent, corrupted, or incomplete stored values seed "no user". The
    /// mirror runs immediately, so such values are normalized to `null`.
    pub fn new(storage: Rc<dyn SessionStorage>) -> Self {
        let seed = load_json::<Option<User>>(storage.as_ref(), SESSION_STORAGE_KEY).flatten();
        tracing::debug!(seeded = seed.is_some(), "session store seeded");

        let store = Self {
            inner: Rc::new(Inner {
                value: RefCell::new(seed),
                resolved: Cell::new(false),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                version: Cell::new(0),
                notifying: Cell::new(false),
                pending: RefCell::new(VecDeque::new()),
            }),
        };
        store.register(Rc::new(move |user: Option<&User>| {
            save_json(storage.as_ref(), SESSION_STORAGE_KEY, &user);
        }));
        store
    }

    /// Snapshot of the current value.
    #[must_use]
    pub fn get(&self) -> Option<User> {
        self.inner.value.borrow().clone()
    }

    /// `false` until the first [`SessionStore::set`] after construction.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.inner.resolved.get()
    }

    /// Replace the whole value and notify every subscriber in registration order.
    ///
    /// Setting the same value twice notifies twice.
    pub fn set(&self, value: Option<User>) {
        tracing::debug!(user_id = value.as_ref().map(|u| u.id), "session store set");
        let version = self.inner.version.get() + 1;
        self.inner.version.set(version);
        self.inner.value.replace(value.clone());
        self.inner.resolved.set(true);

        if self.inner.notifying.get() {
            self.inner.pending.borrow_mut().push_back((version, value));
            return;
        }

        self.inner.notifying.set(true);
        let _guard = NotifyGuard(&self.inner);
        let mut next = Some((version, value));
        while let Some((version, value)) = next {
            self.notify(version, value.as_ref());
            next = self.inner.pending.borrow_mut().pop_front();
        }
    }

    /// Equivalent to `set(None)`.
    pub fn clear(&self) {
        self.set(None);
    }

    /// Register `callback`; it runs now with the current value and again on every `set`.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&User>) + 'static,
    {
        let id = self.register(Rc::new(callback));
        Subscription { id, store: Rc::downgrade(&self.inner) }
    }

    fn notify(&self, version: u64, value: Option<&User>) {
        let subscribers: Vec<Callback> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .filter(|(_, seen, _)| *seen < version)
            .map(|(_, _, callback)| Rc::clone(callback))
            .collect();
        for callback in subscribers {
            callback(value);
        }
    }

    fn register(&self, callback: Callback) -> u64 {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let seen = self.inner.version.get();
        self.inner.subscribers.borrow_mut().push((id, seen, Rc::clone(&callback)));

        let current = self.get();
        callback(current.as_ref());
        id
    }
}

/// Handle returned by [`SessionStore::subscribe`].
///
/// Dropping the handle keeps the subscription alive; call
/// [`Subscription::unsubscribe`] to stop notifications.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    store: Weak<Inner>,
}

impl Subscription {
    /// Deregister the callback. A no-op once the store is gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner.subscribers.borrow_mut().retain(|(id, _, _)| *id != self.id);
        }
    }
}
