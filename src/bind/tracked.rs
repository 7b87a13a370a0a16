use crate::runtime::{Prop, Props};
use crate::store::{Listener, State, Store};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

/// A store handle that records which state keys a render reads.
///
/// Everything except [`TrackedStore::state`] passes through to the plain
/// [`Store`] via `Deref`, so actions like `set_state` work as usual.
#[derive(Clone)]
pub struct TrackedStore {
    store: Store,
    trigger: Listener,
}

impl TrackedStore {
    pub(crate) fn new(store: Store, trigger: Listener) -> Self {
        Self { store, trigger }
    }

    /// The current state, with reads subscribing the render trigger.
    pub fn state(&self) -> TrackedState {
        TrackedState {
            snapshot: self.store.state(),
            store: self.store.clone(),
            trigger: self.trigger.clone(),
        }
    }

    /// The underlying store, without tracking.
    pub fn untracked(&self) -> &Store {
        &self.store
    }

    /// Same store and same render trigger.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.store.ptr_eq(&other.store) && self.trigger == other.trigger
    }
}

impl Deref for TrackedStore {
    type Target = Store;

    fn deref(&self) -> &Store {
        &self.store
    }
}

impl fmt::Debug for TrackedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedStore")
            .field("state", &self.store.state())
            .field("trigger", &self.trigger)
            .finish()
    }
}

/// A state snapshot whose reads subscribe the render trigger.
pub struct TrackedState {
    snapshot: State,
    store: Store,
    trigger: Listener,
}

impl TrackedState {
    /// Read `key`, subscribing the render trigger to it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.store.subscribe(key, &self.trigger);
        self.snapshot.get(key)
    }
}

/// The tracked stores of one render, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct TrackedStores {
    entries: BTreeMap<String, TrackedStore>,
}

impl TrackedStores {
    /// Look up a tracked store by name.
    pub fn get(&self, name: &str) -> Option<&TrackedStore> {
        self.entries.get(name)
    }

    /// Iterate over `(name, store)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TrackedStore)> {
        self.entries.iter().map(|(name, store)| (name.as_str(), store))
    }

    /// Number of stores.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no stores are in scope.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One [`Prop::Store`] per store name.
    pub fn into_props(self) -> Props {
        self.entries
            .into_iter()
            .map(|(name, store)| (name, Prop::Store(store)))
            .collect()
    }
}

impl FromIterator<(String, TrackedStore)> for TrackedStores {
    fn from_iter<I: IntoIterator<Item = (String, TrackedStore)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn only_read_keys_are_subscribed() {
        let store = Store::new([("a", json!(1)), ("b", json!(2))]);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let trigger = Listener::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        let tracked = TrackedStore::new(store.clone(), trigger);

        assert_eq!(tracked.state().get("a"), Some(&json!(1)));

        store.set_state([("b", json!(3))]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        store.set_state([("a", json!(4))]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_key_is_still_tracked() {
        let store = Store::new(State::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let trigger = Listener::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        let tracked = TrackedStore::new(store.clone(), trigger);

        assert_eq!(tracked.state().get("later"), None);

        store.set_state([("later", json!(true))]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn store_methods_pass_through() {
        let store = Store::new([("a", json!(1))]);
        let tracked = TrackedStore::new(store.clone(), Listener::new(|| {}));

        tracked.set_state([("a", json!(2))]);

        assert_eq!(store.state().get("a"), Some(&json!(2)));
        assert_eq!(tracked.listener_count(), 0);
    }
}
