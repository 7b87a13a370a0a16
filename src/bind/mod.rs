//! Bindings between stores and components.
//!
//! - [`root`] publishes a [`Stores`](crate::Stores) mapping to a subtree.
//! - [`container`] and [`container_with`] derive a leaf's props from the
//!   stores in scope and re-render it when a state key it read changes.

mod container;
mod root;
mod tracked;

pub use container::{container, container_with, Container, ContainerConfig, MapToProps, Mounted};
pub use root::{root, Root};
pub use tracked::{TrackedState, TrackedStore, TrackedStores};
