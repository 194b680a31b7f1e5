// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// The order lifecycle engine. Storage is reached only through
// `crate::repository::OrderRepository`; HTTP lives in `crate::http`.
//
// ============================================================================

pub mod order;
