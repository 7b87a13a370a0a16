use crate::store::Store;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A named collection of stores shared by a component tree.
///
/// The mapping is immutable once built and cloning it only bumps a
/// reference count, so every descendant sees the very same stores.
///
/// # Examples
///
/// ```
/// use duckstore::{json, Store, Stores};
///
/// let stores = Stores::new()
///     .with("counter", Store::new([("count", json!(0))]))
///     .with("todos", Store::new([("todos", json!([]))]));
///
/// assert_eq!(stores.len(), 2);
/// assert!(stores.get("counter").is_some());
/// ```
#[derive(Clone, Default)]
pub struct Stores {
    inner: Arc<BTreeMap<String, Store>>,
}

impl Stores {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named store while building the mapping.
    pub fn with(mut self, name: impl Into<String>, store: Store) -> Self {
        Arc::make_mut(&mut self.inner).insert(name.into(), store);
        self
    }

    /// Look up a store by name.
    pub fn get(&self, name: &str) -> Option<&Store> {
        self.inner.get(name)
    }

    /// Iterate over `(name, store)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Store)> {
        self.inner.iter().map(|(name, store)| (name.as_str(), store))
    }

    /// Iterate over store names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Number of stores.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the mapping has no stores.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Whether two handles share the same mapping.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<K: Into<String>> FromIterator<(K, Store)> for Stores {
    fn from_iter<I: IntoIterator<Item = (K, Store)>>(iter: I) -> Self {
        Self {
            inner: Arc::new(iter.into_iter().map(|(k, s)| (k.into(), s)).collect()),
        }
    }
}

impl fmt::Debug for Stores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}

/// Render context handed down the component tree.
///
/// Carries the store mapping published by the nearest enclosing
/// [`Root`](crate::Root). A context with no root above it yields an empty
/// mapping.
#[derive(Clone, Debug, Default)]
pub struct Context {
    stores: Option<Stores>,
}

impl Context {
    /// A context outside of any root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a child context that publishes `stores` to its subtree.
    pub fn provide(&self, stores: Stores) -> Self {
        Self {
            stores: Some(stores),
        }
    }

    /// The store mapping in scope, or an empty one outside any root.
    pub fn stores(&self) -> Stores {
        self.stores.clone().unwrap_or_default()
    }

    /// Whether a root has published stores into this context.
    pub fn has_stores(&self) -> bool {
        self.stores.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_context_has_no_stores() {
        let cx = Context::new();

        assert!(!cx.has_stores());
        assert!(cx.stores().is_empty());
    }

    #[test]
    fn provided_stores_are_shared_not_copied() {
        let stores = Stores::new().with("counter", Store::new([("count", json!(0))]));
        let cx = Context::new().provide(stores.clone());
        let nested = cx.clone();

        assert!(nested.stores().ptr_eq(&stores));
        assert!(nested.stores().get("counter").is_some());
    }

    #[test]
    fn inner_provider_shadows_outer() {
        let outer = Stores::new().with("a", Store::new(crate::State::new()));
        let inner = Stores::new().with("b", Store::new(crate::State::new()));
        let cx = Context::new().provide(outer).provide(inner);

        assert_eq!(cx.stores().names().collect::<Vec<_>>(), vec!["b"]);
    }
}
