//! Minimal component model the bindings render into.
//!
//! A [`Component`] renders [`Props`] under a [`Context`]; the context is
//! passed explicitly down the tree and carries the [`Stores`] published by
//! the nearest root.

mod component;
mod context;

pub use component::{Component, Handler, Prop, Props};
pub use context::{Context, Stores};
