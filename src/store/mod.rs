//! State stores with per-key subscriptions.
//!
//! A [`Store`] owns an immutable [`State`] snapshot and a registry of
//! [`Listener`]s keyed by state field. Updates are shallow merges, and only
//! the listeners of the keys named in an update are notified.

mod listener;
mod state;
mod store;

pub use listener::{Listener, ListenerId};
pub use state::State;
pub use store::Store;
