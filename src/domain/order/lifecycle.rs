use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use super::errors::OrderError;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Lifecycle - Transition Table
// ============================================================================
//
//   Created ──> Paid ──> Collect ──> Collected ──> Delivery ──> Done
//      │         │          │            │
//      └─────────┴──────────┴────────────┴──> Cancelled
//
// Any (current, requested) pair missing from the table is rejected.
// Cancelling from Delivery or Done is reported as TooLateToCancel.
//
// ============================================================================

static TRANSITIONS: LazyLock<HashMap<OrderStatus, HashSet<OrderStatus>>> = LazyLock::new(|| {
    use OrderStatus::*;

    HashMap::from([
        (Created, HashSet::from([Paid, Cancelled])),
        (Paid, HashSet::from([Collect, Cancelled])),
        (Collect, HashSet::from([Collected, Cancelled])),
        (Collected, HashSet::from([Delivery, Cancelled])),
        (Delivery, HashSet::from([Done])),
        (Done, HashSet::new()),
        (Cancelled, HashSet::new()),
    ])
});

/// Statuses reachable in one step from `current`.
pub fn allowed_transitions(current: OrderStatus) -> &'static HashSet<OrderStatus> {
    // every status has an entry
    &TRANSITIONS[&current]
}

pub fn can_transition(current: OrderStatus, requested: OrderStatus) -> bool {
    allowed_transitions(current).contains(&requested)
}

/// Validate a requested status change without touching any state.
pub fn check_transition(current: OrderStatus, requested: OrderStatus) -> Result<(), OrderError> {
    if can_transition(current, requested) {
        return Ok(());
    }

    match (current, requested) {
        (OrderStatus::Delivery | OrderStatus::Done, OrderStatus::Cancelled) => {
            Err(OrderError::TooLateToCancel(current))
        }
        _ => Err(OrderError::InvalidTransition {
            from: current,
            to: requested,
        }),
    }
}
