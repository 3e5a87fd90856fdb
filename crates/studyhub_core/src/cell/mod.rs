//! Persistent reactive cell: one observable value bound to one store key.
//!
//! # Responsibility
//! - Hold the in-memory copy of a single persisted value.
//! - Notify synchronous observers on every mutation.
//! - Write every new value through to the store adapter.
//!
//! # Invariants
//! - The initial value is read from the store exactly once, at construction.
//! - Observers are notified after the in-memory value changes and
//!   independently of whether the write-through succeeds.
//! - Two cells bound to the same key converge through last-write-wins; a cell
//!   constructed after a write observes the written value.
//! - Observers must not mutate the cell they observe (single-threaded
//!   re-entrancy guard via `RefCell`).

use crate::store::StoreAdapter;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// A persisted, observable value bound to one storage key.
pub struct PersistedCell<T> {
    key: String,
    store: Rc<StoreAdapter>,
    value: RefCell<T>,
    observers: RefCell<Vec<Box<dyn Fn(&T)>>>,
}

impl<T: Clone + Serialize + DeserializeOwned> PersistedCell<T> {
    /// Creates a cell bound to `key`, seeded from the store.
    ///
    /// Construction is synchronous: the stored value (or `initial` when the
    /// key is absent or corrupt) is available immediately.
    pub fn new(store: Rc<StoreAdapter>, key: impl Into<String>, initial: T) -> Self {
        let key = key.into();
        let value = store.read(&key, initial);
        Self {
            key,
            store,
            value: RefCell::new(value),
            observers: RefCell::new(Vec::new()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns a clone of the current in-memory value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Runs `f` against a borrow of the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Replaces the value, notifies observers, then writes through.
    pub fn set(&self, next: T) {
        *self.value.borrow_mut() = next;
        self.commit();
    }

    /// Functional update form: computes the next value from the previous one.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value.borrow());
        self.set(next);
    }

    /// Registers a synchronous observer invoked with every new value.
    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) {
        self.observers.borrow_mut().push(Box::new(observer));
    }

    fn commit(&self) {
        let value = self.value.borrow();
        for observer in self.observers.borrow().iter() {
            observer(&value);
        }
        // Fire-and-forget: the adapter logs failures and the session keeps
        // running on the in-memory value.
        self.store.write(&self.key, &*value);
    }
}

#[cfg(test)]
mod tests {
    use super::PersistedCell;
    use crate::db::open_db_in_memory;
    use crate::store::{SqliteKvBackend, StoreAdapter};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn memory_store() -> Rc<StoreAdapter> {
        let conn = open_db_in_memory().expect("in-memory db should open");
        let backend = SqliteKvBackend::try_new(conn).expect("backend should initialize");
        Rc::new(StoreAdapter::new(Box::new(backend)))
    }

    #[test]
    fn functional_update_sees_previous_value() {
        let store = memory_store();
        let cell = PersistedCell::new(store, "counter", 1u32);

        cell.update(|prev| prev + 1);
        cell.update(|prev| prev * 10);

        assert_eq!(cell.get(), 20);
    }

    #[test]
    fn observers_run_synchronously_with_the_new_value() {
        let store = memory_store();
        let cell = PersistedCell::new(store, "observed", 0u32);
        let seen: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        cell.subscribe(move |value| sink.borrow_mut().push(*value));

        cell.set(7);
        cell.update(|prev| prev + 1);

        assert_eq!(*seen.borrow(), vec![7, 8]);
    }
}
