use uuid::Uuid;

use super::value_objects::OrderStatus;
use crate::repository::RepositoryError;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Product does not exist: {0}")]
    ProductNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Too late to cancel order in status {0}")]
    TooLateToCancel(OrderStatus),

    #[error("Order products cannot be edited in status {0}")]
    OrderCannotBeEdited(OrderStatus),

    #[error("Order address cannot be edited once the order is done")]
    AddressCannotBeEdited,

    #[error("Order {0} was modified concurrently")]
    ConcurrentModification(Uuid),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl OrderError {
    /// Short label used for metrics and log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::ProductNotFound(_) => "product_not_found",
            OrderError::OrderNotFound(_) => "order_not_found",
            OrderError::InvalidTransition { .. } => "invalid_transition",
            OrderError::TooLateToCancel(_) => "too_late_to_cancel",
            OrderError::OrderCannotBeEdited(_) => "order_cannot_be_edited",
            OrderError::AddressCannotBeEdited => "address_cannot_be_edited",
            OrderError::ConcurrentModification(_) => "concurrent_modification",
            OrderError::Repository(_) => "repository",
        }
    }
}

impl From<RepositoryError> for OrderError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::OrderNotFound(id) => OrderError::OrderNotFound(id),
            RepositoryError::VersionConflict { order_id, .. } => {
                OrderError::ConcurrentModification(order_id)
            }
            other => OrderError::Repository(other),
        }
    }
}
