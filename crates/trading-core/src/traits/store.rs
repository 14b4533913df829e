//! Order persistence trait.

use crate::error::StorageError;
use crate::types::Order;

/// Durable order storage.
///
/// The engine calls `save_order` synchronously after every order mutation
/// (create, fill, cancel). Implementations must be idempotent: saving the same
/// order ID with the same state twice leaves storage unchanged.
pub trait OrderStore: Send + Sync {
    /// Persist the current state of an order.
    fn save_order(&self, order: &Order) -> Result<(), StorageError>;
}
