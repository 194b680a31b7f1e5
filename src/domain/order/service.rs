use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::aggregate::Order;
use super::commands::{CreateOrder, EditOrder, OrderFilter};
use super::errors::OrderError;
use super::value_objects::OrderStatus;
use crate::metrics::Metrics;
use crate::repository::OrderRepository;

// ============================================================================
// Order Service
// ============================================================================
//
// Orchestrates: Request → Repository read → Order rules → Repository write
//
// Every mutating operation performs at most one write. Updates carry the
// version that was read; a concurrent writer makes the update fail with
// ConcurrentModification rather than silently overwriting it. Nothing here
// retries.
//
// ============================================================================

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;
pub type IdGenerator = Arc<dyn Fn() -> Uuid + Send + Sync>;

pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    metrics: Arc<Metrics>,
    clock: Clock,
    new_id: IdGenerator,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>, metrics: Arc<Metrics>) -> Self {
        Self {
            repo,
            metrics,
            clock: Arc::new(Utc::now),
            new_id: Arc::new(Uuid::new_v4),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_id_generator(mut self, new_id: impl Fn() -> Uuid + Send + Sync + 'static) -> Self {
        self.new_id = Arc::new(new_id);
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    fn finish<T>(
        &self,
        operation: &str,
        started: Instant,
        result: Result<T, OrderError>,
    ) -> Result<T, OrderError> {
        self.metrics
            .observe_duration(operation, started.elapsed().as_secs_f64());

        if let Err(err) = &result {
            self.metrics.record_rejection(operation, err.reason());
            tracing::warn!(operation = operation, reason = err.reason(), error = %err, "Order request rejected");
        }

        result
    }

    /// Validate products, then persist a new order in `Created`.
    pub async fn create_order(&self, request: CreateOrder) -> Result<Order, OrderError> {
        let started = Instant::now();
        let result = self.create_order_inner(request).await;
        self.finish("create_order", started, result)
    }

    async fn create_order_inner(&self, request: CreateOrder) -> Result<Order, OrderError> {
        for product_id in &request.products {
            if !self.repo.product_exists(product_id).await? {
                return Err(OrderError::ProductNotFound(product_id.clone()));
            }
        }

        let order = Order::create((self.new_id)(), request, (self.clock)());
        self.repo.create_order(&order).await?;

        self.metrics.orders_created.inc();
        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            product_count = order.product_ids.len(),
            delivery_type = %order.delivery_type,
            "Order created"
        );

        Ok(order)
    }

    /// Move an order to `requested` and persist it.
    pub async fn transition_status(
        &self,
        order_id: Uuid,
        requested: OrderStatus,
    ) -> Result<(), OrderError> {
        let started = Instant::now();
        let result = self.transition_status_inner(order_id, requested).await;
        self.finish("transition_status", started, result)
    }

    async fn transition_status_inner(
        &self,
        order_id: Uuid,
        requested: OrderStatus,
    ) -> Result<(), OrderError> {
        let mut order = self.repo.get_order_by_id(order_id).await?;
        let current = order.order_status;

        tracing::debug!(order_id = %order_id, from = %current, to = %requested, "Status transition requested");

        order.transition_to(requested, (self.clock)())?;
        self.repo.update_order(&order).await?;

        self.metrics.record_transition(current.as_str(), requested.as_str());
        tracing::info!(
            order_id = %order_id,
            from = %current,
            to = %requested,
            terminal = requested.is_terminal(),
            "Order status updated"
        );

        Ok(())
    }

    pub async fn get_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError> {
        let started = Instant::now();
        let result = self.repo.get_orders(&filter).await.map_err(OrderError::from);

        if let Ok(orders) = &result {
            tracing::debug!(user_id = ?filter.user_id, count = orders.len(), "Listed orders");
        }

        self.finish("get_orders", started, result)
    }

    pub async fn get_order(&self, order_id: Uuid) -> Result<Order, OrderError> {
        let started = Instant::now();
        let result = self
            .repo
            .get_order_by_id(order_id)
            .await
            .map_err(OrderError::from);
        self.finish("get_order", started, result)
    }

    /// Change products and/or address while the lifecycle still allows it.
    pub async fn edit_order(&self, edit: EditOrder) -> Result<Order, OrderError> {
        let started = Instant::now();
        let result = self.edit_order_inner(edit).await;
        self.finish("edit_order", started, result)
    }

    async fn edit_order_inner(&self, edit: EditOrder) -> Result<Order, OrderError> {
        let mut order = self.repo.get_order_by_id(edit.order_id).await?;

        // product ids are not re-checked against the catalogue here
        order.apply_edit(&edit, (self.clock)())?;
        let stored = self.repo.update_order(&order).await?;

        self.metrics.order_edits.inc();
        tracing::info!(
            order_id = %stored.id,
            status = %stored.order_status,
            products_changed = edit.new_products().is_some(),
            address_changed = edit.new_address().is_some(),
            "Order edited"
        );

        Ok(stored)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
