//! Persistence boundary for orders and product existence checks.
//!
//! The order service depends only on [`OrderRepository`]; concrete backends
//! live in the submodules.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::order::{Order, OrderFilter};

pub mod memory;
pub mod scylla_store;

pub use memory::InMemoryOrderRepository;
pub use scylla_store::ScyllaOrderRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No order is stored under the requested id.
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    /// An order with this id has already been stored.
    #[error("Order already exists: {0}")]
    AlreadyExists(Uuid),

    /// The stored version differs from the one the caller read.
    #[error("Version conflict for order {order_id}: expected version {expected}")]
    VersionConflict { order_id: Uuid, expected: i64 },

    /// A stored record could not be mapped back into an [`Order`].
    #[error("Corrupt order record: {0}")]
    CorruptRecord(String),

    /// Failure reported by the storage backend.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Contract the order service uses to reach storage.
///
/// `update_order` is version-checked: it only writes when the stored
/// `version` equals `order.version`, and returns the record as stored with
/// its version incremented.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn product_exists(&self, product_id: &str) -> Result<bool, RepositoryError>;

    async fn create_order(&self, order: &Order) -> Result<(), RepositoryError>;

    async fn get_order_by_id(&self, order_id: Uuid) -> Result<Order, RepositoryError>;

    async fn update_order(&self, order: &Order) -> Result<Order, RepositoryError>;

    async fn get_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError>;
}
