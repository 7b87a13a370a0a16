use serde_json::{Map, Value};
use std::sync::Arc;

/// An immutable snapshot of a store's state.
///
/// Snapshots are cheap to clone and never change once created. A store
/// replaces its snapshot on every update, so anyone still holding an older
/// `State` keeps seeing the values it had when it was taken.
///
/// # Examples
///
/// ```
/// use duckstore::{json, State};
///
/// let state = State::from_iter([("count", json!(0))]);
/// let edited = state.with("count", 1);
///
/// assert_eq!(state.get("count"), Some(&json!(0)));
/// assert_eq!(edited.get("count"), Some(&json!(1)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct State {
    fields: Arc<Map<String, Value>>,
}

impl State {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a single field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterate over field names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the state has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Return a detached copy with one field replaced.
    ///
    /// The original snapshot (and any store it came from) is unaffected.
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fields = Arc::clone(&self.fields);
        Arc::make_mut(&mut fields).insert(key.into(), value.into());
        Self { fields }
    }

    /// Shallow-merge `partial` over this snapshot into a new one.
    pub(crate) fn merge(&self, partial: &Map<String, Value>) -> Self {
        let mut fields = (*self.fields).clone();
        for (key, value) in partial {
            fields.insert(key.clone(), value.clone());
        }
        Self {
            fields: Arc::new(fields),
        }
    }

    /// View the snapshot as a JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Whether two snapshots are the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }
}

impl From<Map<String, Value>> for State {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields: Arc::new(fields),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for State
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(fields: [(K, V); N]) -> Self {
        fields.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for State
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<Map<String, Value>>()
            .into()
    }
}
