use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

// ============================================================================
// Order Value Objects
// ============================================================================

/// Lifecycle state of an order.
///
/// Serialized with the variant name (`"Created"`, `"Paid"`, ...), which is
/// also the representation stored by the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Created,
    Paid,
    Collect,
    Collected,
    Delivery,
    Done,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Created,
        OrderStatus::Paid,
        OrderStatus::Collect,
        OrderStatus::Collected,
        OrderStatus::Delivery,
        OrderStatus::Done,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::Paid => "Paid",
            OrderStatus::Collect => "Collect",
            OrderStatus::Collected => "Collected",
            OrderStatus::Delivery => "Delivery",
            OrderStatus::Done => "Done",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Done | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseValueError::UnknownStatus(s.to_string()))
    }
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    Standard,
    Express,
    Pickup,
}

impl DeliveryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::Standard => "standard",
            DeliveryType::Express => "express",
            DeliveryType::Pickup => "pickup",
        }
    }

    /// Time allowed between order creation and the delivery deadline.
    pub fn delivery_window(&self) -> Duration {
        match self {
            DeliveryType::Standard => Duration::days(5),
            DeliveryType::Express => Duration::days(1),
            DeliveryType::Pickup => Duration::days(3),
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryType {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(DeliveryType::Standard),
            "express" => Ok(DeliveryType::Express),
            "pickup" => Ok(DeliveryType::Pickup),
            other => Err(ParseValueError::UnknownDeliveryType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseValueError {
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    #[error("Unknown delivery type: {0}")]
    UnknownDeliveryType(String),
}

// ============================================================================
// Unit Tests
// ============================================================================
