use super::Context;
use crate::bind::TrackedStore;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A callback passed down as a prop, e.g. a click handler.
pub type Handler = Arc<dyn Fn() + Send + Sync>;

/// Something that renders [`Props`] under a [`Context`].
///
/// Any `Fn(&Props, &Context) -> O` closure is a component.
///
/// ```
/// use duckstore::{Component, Context, Props};
///
/// let label = |props: &Props, _cx: &Context| {
///     format!("count: {}", props.value("count").cloned().unwrap_or_default())
/// };
/// let props = Props::new().with("count", 3);
///
/// assert_eq!(label.render(&props, &Context::new()), "count: 3");
/// ```
pub trait Component: Send + Sync + 'static {
    type Output;

    fn render(&self, props: &Props, cx: &Context) -> Self::Output;
}

impl<F, O> Component for F
where
    F: Fn(&Props, &Context) -> O + Send + Sync + 'static,
{
    type Output = O;

    fn render(&self, props: &Props, cx: &Context) -> O {
        self(props, cx)
    }
}

/// A single property value.
#[derive(Clone)]
pub enum Prop {
    /// Plain data.
    Value(Value),
    /// A store whose state reads are tracked by the rendering container.
    Store(TrackedStore),
    /// A callback.
    Handler(Handler),
}

impl Prop {
    /// Wrap a closure as a [`Prop::Handler`].
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Prop::Handler(Arc::new(f))
    }

    /// The plain value, if this is [`Prop::Value`].
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Prop::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The tracked store, if this is [`Prop::Store`].
    pub fn as_store(&self) -> Option<&TrackedStore> {
        match self {
            Prop::Store(store) => Some(store),
            _ => None,
        }
    }

    /// The callback, if this is [`Prop::Handler`].
    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            Prop::Handler(handler) => Some(handler),
            _ => None,
        }
    }
}

/// Shallow equality: values by content, stores and handlers by identity.
impl PartialEq for Prop {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Prop::Value(a), Prop::Value(b)) => a == b,
            (Prop::Store(a), Prop::Store(b)) => a.ptr_eq(b),
            (Prop::Handler(a), Prop::Handler(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Prop::Store(store) => f.debug_tuple("Store").field(store).finish(),
            Prop::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl From<Value> for Prop {
    fn from(value: Value) -> Self {
        Prop::Value(value)
    }
}

impl From<&str> for Prop {
    fn from(value: &str) -> Self {
        Prop::Value(value.into())
    }
}

impl From<String> for Prop {
    fn from(value: String) -> Self {
        Prop::Value(value.into())
    }
}

impl From<bool> for Prop {
    fn from(value: bool) -> Self {
        Prop::Value(value.into())
    }
}

impl From<i32> for Prop {
    fn from(value: i32) -> Self {
        Prop::Value(value.into())
    }
}

impl From<i64> for Prop {
    fn from(value: i64) -> Self {
        Prop::Value(value.into())
    }
}

impl From<usize> for Prop {
    fn from(value: usize) -> Self {
        Prop::Value(value.into())
    }
}

impl From<TrackedStore> for Prop {
    fn from(store: TrackedStore) -> Self {
        Prop::Store(store)
    }
}

impl From<Handler> for Prop {
    fn from(handler: Handler) -> Self {
        Prop::Handler(handler)
    }
}

/// The properties a component renders with.
///
/// Equality is shallow, see [`Prop`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    entries: BTreeMap<String, Prop>,
}

impl Props {
    /// Create empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, prop: impl Into<Prop>) -> Self {
        self.insert(key, prop);
        self
    }

    /// Insert a prop, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, prop: impl Into<Prop>) -> Option<Prop> {
        self.entries.insert(key.into(), prop.into())
    }

    /// Look up a prop.
    pub fn get(&self, key: &str) -> Option<&Prop> {
        self.entries.get(key)
    }

    /// Look up a plain value prop.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(Prop::as_value)
    }

    /// Look up a store prop.
    pub fn store(&self, key: &str) -> Option<&TrackedStore> {
        self.get(key).and_then(Prop::as_store)
    }

    /// Look up a handler prop.
    pub fn handler(&self, key: &str) -> Option<&Handler> {
        self.get(key).and_then(Prop::as_handler)
    }

    /// Invoke the handler stored under `key`, if any.
    pub fn call(&self, key: &str) -> bool {
        match self.handler(key) {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over prop names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of props.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no props.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lay `own` over these props; entries of `own` win on collision.
    pub fn overlay(mut self, own: &Props) -> Props {
        for (key, prop) in &own.entries {
            self.entries.insert(key.clone(), prop.clone());
        }
        self
    }
}

impl<K: Into<String>, P: Into<Prop>> FromIterator<(K, P)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, p)| (k.into(), p.into()))
                .collect(),
        }
    }
}
