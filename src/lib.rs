//! Order lifecycle service.
//!
//! [`domain::order::OrderService`] owns the order state machine and edit
//! rules; storage is reached through [`repository::OrderRepository`] and
//! HTTP through [`http`].

pub mod config;
pub mod domain;
pub mod http;
pub mod metrics;
pub mod repository;
pub mod utils;
