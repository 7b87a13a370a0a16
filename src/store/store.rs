use super::{Listener, ListenerId, State};
use crate::error::StoreError;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

type Registry = HashMap<String, BTreeMap<ListenerId, Listener>>;

/// A shared state container with per-key subscriptions.
///
/// The state is an immutable [`State`] snapshot that is replaced wholesale
/// by [`Store::set_state`]. Listeners subscribe to individual keys and are
/// only called for updates that include one of those keys.
///
/// Cloning a `Store` yields another handle to the same state and listeners.
///
/// # Examples
///
/// ```
/// use duckstore::{json, Listener, Store};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let store = Store::new([("count", json!(0)), ("name", json!("demo"))]);
/// let calls = Arc::new(AtomicUsize::new(0));
/// let listener = Listener::new({
///     let calls = calls.clone();
///     move || {
///         calls.fetch_add(1, Ordering::SeqCst);
///     }
/// });
///
/// store.subscribe("count", &listener);
/// store.set_state([("name", json!("other"))]);
/// assert_eq!(calls.load(Ordering::SeqCst), 0);
///
/// store.set_state([("count", json!(1))]);
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// assert_eq!(store.state().get("count"), Some(&json!(1)));
/// ```
#[derive(Clone)]
pub struct Store {
    state: Arc<RwLock<State>>,
    listeners: Arc<RwLock<Registry>>,
}

impl Store {
    /// Create a new store with the given initial state.
    pub fn new(initial: impl Into<State>) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial.into())),
            listeners: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the current state snapshot.
    pub fn state(&self) -> State {
        self.state.read().clone()
    }

    /// Shallow-merge `partial` into the state and notify listeners.
    ///
    /// Every listener subscribed to at least one key present in `partial`
    /// is called exactly once, whether or not the value actually changed.
    pub fn set_state<I, K, V>(&self, partial: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let partial: Map<String, Value> = partial
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        {
            let mut state = self.state.write();
            let merged = state.merge(&partial);
            *state = merged;
        }

        self.notify(&partial);
    }

    /// Compute a partial update from the current state and apply it.
    ///
    /// ```
    /// use duckstore::{json, Store};
    ///
    /// let store = Store::new([("count", json!(1))]);
    /// store.update(|state| {
    ///     let count = state.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
    ///     [("count", json!(count + 1))]
    /// });
    /// assert_eq!(store.state().get("count"), Some(&json!(2)));
    /// ```
    pub fn update<F, I, K, V>(&self, f: F)
    where
        F: FnOnce(&State) -> I,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let current = self.state();
        self.set_state(f(&current));
    }

    /// Replace the whole state directly.
    ///
    /// Always rejected: the state can only change through
    /// [`Store::set_state`]. The current snapshot is left untouched.
    pub fn assign_state(&self, _state: impl Into<State>) -> Result<(), StoreError> {
        tracing::warn!("rejected direct state assignment");
        Err(StoreError::DirectAssignment)
    }

    /// Subscribe `listener` to changes of `key`.
    ///
    /// Subscribing the same listener to the same key twice is a no-op.
    pub fn subscribe(&self, key: impl Into<String>, listener: &Listener) {
        let key = key.into();
        tracing::trace!(key = %key, listener = ?listener.id(), "subscribe");
        self.listeners
            .write()
            .entry(key)
            .or_default()
            .entry(listener.id())
            .or_insert_with(|| listener.clone());
    }

    /// Remove `listener` from every key it is subscribed to.
    pub fn unsubscribe(&self, listener: &Listener) {
        let mut registry = self.listeners.write();
        registry.retain(|_, set| {
            set.remove(&listener.id());
            !set.is_empty()
        });
    }

    /// Number of distinct listeners currently subscribed.
    pub fn listener_count(&self) -> usize {
        let registry = self.listeners.read();
        let mut ids: Vec<ListenerId> = registry
            .values()
            .flat_map(|set| set.keys().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Whether two handles refer to the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Notify listeners of the keys present in a partial update.
    fn notify(&self, partial: &Map<String, Value>) {
        // Collected up front so no lock is held while callbacks run.
        let pending: BTreeMap<ListenerId, Listener> = {
            let registry = self.listeners.read();
            partial
                .keys()
                .filter_map(|key| registry.get(key))
                .flat_map(|set| set.iter().map(|(id, l)| (*id, l.clone())))
                .collect()
        };

        tracing::debug!(
            keys = ?partial.keys().collect::<Vec<_>>(),
            listeners = pending.len(),
            "state updated"
        );

        for listener in pending.values() {
            listener.call();
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.read())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
