use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::DeliveryType;

// ============================================================================
// Order Commands - Represent user intent
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    pub user_id: String,
    pub products: Vec<String>,
    pub price: f64,
    pub delivery_type: DeliveryType,
    pub address_id: String,
}

/// In-place edit of an order. Absent and empty values both leave the field
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditOrder {
    pub order_id: Uuid,
    #[serde(default)]
    pub products: Option<Vec<String>>,
    #[serde(default)]
    pub address: Option<String>,
}

impl EditOrder {
    pub fn new_products(&self) -> Option<&[String]> {
        self.products.as_deref().filter(|products| !products.is_empty())
    }

    pub fn new_address(&self) -> Option<&str> {
        self.address.as_deref().filter(|address| !address.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    #[serde(default)]
    pub user_id: Option<String>,
}

impl OrderFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }
}
