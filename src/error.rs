//! Error types for store operations.

use thiserror::Error;

/// Errors returned by [`Store`](crate::Store) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The state was assigned wholesale instead of going through `set_state`.
    #[error("use set_state or store actions to mutate the state")]
    DirectAssignment,
}
