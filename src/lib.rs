//! # Duckstore
//!
//! Keyed-subscription state stores with bindings for component trees.
//!
//! ## Stores
//!
//! - [`Store`] - Shared holder of an immutable [`State`] snapshot
//! - Shallow-merge updates through [`Store::set_state`]
//! - Listeners subscribe per state key and fire once per relevant update
//!
//! ## Bindings
//!
//! - [`root`] - Publishes a named [`Stores`] mapping to everything below it
//! - [`container`] / [`container_with`] - Derive a leaf component's props
//!   from the stores in scope and re-render it when a key it read changes
//!
//! ```
//! use duckstore::{container_with, json, root, Context, Props, Store, Stores};
//!
//! let counter = Store::new([("count", json!(0))]);
//! let display = container_with(
//!     |props: &Props, _cx: &Context| props.value("text").cloned(),
//!     |stores, _own| {
//!         let count = stores
//!             .get("counter")
//!             .and_then(|s| s.state().get("count").cloned())
//!             .unwrap_or_default();
//!         Props::new().with("text", count)
//!     },
//! );
//! let app = root(
//!     move |props: &Props, cx: &Context| display.mount(props.clone(), cx),
//!     Stores::new().with("counter", counter.clone()),
//! );
//!
//! let mounted = app.render_root(&Props::new());
//! counter.update(|state| {
//!     let count = state.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
//!     [("count", json!(count + 1))]
//! });
//!
//! assert_eq!(mounted.output(), Some(Some(json!(1))));
//! ```

pub mod bind;
pub mod error;
pub mod runtime;
pub mod store;

// Re-export main types for convenience
pub use bind::{
    container, container_with, root, Container, ContainerConfig, Mounted, Root, TrackedState,
    TrackedStore, TrackedStores,
};
pub use error::StoreError;
pub use runtime::{Component, Context, Handler, Prop, Props, Stores};
pub use serde_json::{json, Value};
pub use store::{Listener, ListenerId, State, Store};
