use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::commands::{CreateOrder, EditOrder};
use super::errors::OrderError;
use super::lifecycle;
use super::value_objects::{DeliveryType, OrderStatus};

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    // Identity
    pub id: Uuid,
    pub version: i64,

    // Ownership and contents
    pub user_id: String,
    pub product_ids: Vec<String>,

    // Audit Trail
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Fulfilment
    pub delivery_deadline: DateTime<Utc>,
    pub price: f64,
    pub delivery_type: DeliveryType,
    pub address: String,
    pub order_status: OrderStatus,
}

impl Order {
    /// Build a fresh order in `Created`. Product existence is the caller's job.
    pub fn create(id: Uuid, request: CreateOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            version: 1,
            user_id: request.user_id,
            product_ids: request.products,
            created_at: now,
            updated_at: now,
            delivery_deadline: now + request.delivery_type.delivery_window(),
            price: request.price,
            delivery_type: request.delivery_type,
            address: request.address_id,
            order_status: OrderStatus::Created,
        }
    }

    /// Move to `requested` if the transition table allows it.
    /// On rejection the order is left untouched.
    pub fn transition_to(
        &mut self,
        requested: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<(), OrderError> {
        lifecycle::check_transition(self.order_status, requested)?;

        self.order_status = requested;
        self.updated_at = now;
        Ok(())
    }

    /// Check an edit against the current status without applying it.
    ///
    /// Product changes stop once delivery starts; address changes are still
    /// accepted during delivery and stop only when the order is done.
    pub fn validate_edit(&self, edit: &EditOrder) -> Result<(), OrderError> {
        if edit.new_products().is_some()
            && matches!(self.order_status, OrderStatus::Delivery | OrderStatus::Done)
        {
            return Err(OrderError::OrderCannotBeEdited(self.order_status));
        }

        if edit.new_address().is_some() && self.order_status == OrderStatus::Done {
            return Err(OrderError::AddressCannotBeEdited);
        }

        Ok(())
    }

    pub fn apply_edit(&mut self, edit: &EditOrder, now: DateTime<Utc>) -> Result<(), OrderError> {
        self.validate_edit(edit)?;

        if let Some(address) = edit.new_address() {
            self.address = address.to_string();
        }

        if let Some(products) = edit.new_products() {
            self.product_ids = products.to_vec();
        }

        self.updated_at = now;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
