// ============================================================================
// Order Domain - Order Lifecycle Engine
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderStatus, DeliveryType)
// - Lifecycle (transition table)
// - Commands (CreateOrder, EditOrder, OrderFilter)
// - Errors (OrderError enum)
// - Aggregate (Order with lifecycle and edit rules)
// - Service (OrderService, orchestrating the repository)
//
// ============================================================================

pub mod value_objects;
pub mod lifecycle;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod service;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use service::*;
