use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scylla::client::session::Session;
use scylla::response::query_result::QueryResult;
use scylla::value::{CqlValue, Row};
use uuid::Uuid;

use super::{OrderRepository, RepositoryError};
use crate::domain::order::{Order, OrderFilter};

// ============================================================================
// ScyllaDB Order Repository
// ============================================================================
//
// Tables:
// - orders:   one row per order, `version` guarded by lightweight transactions
// - products: product catalogue, only consulted for existence checks
//
// Updates use `IF version = ?`, so a writer holding a stale copy of the
// order is rejected instead of overwriting a newer status.
//
// ============================================================================

const ORDER_COLUMNS: &str = "id, user_id, product_ids, created_at, updated_at, \
     delivery_deadline, price, delivery_type, address, order_status, version";

type OrderRow = (
    Uuid,
    String,
    Option<Vec<String>>,
    DateTime<Utc>,
    DateTime<Utc>,
    DateTime<Utc>,
    f64,
    String,
    String,
    String,
    i64,
);

fn backend<E: std::fmt::Display>(err: E) -> RepositoryError {
    RepositoryError::Backend(err.to_string())
}

fn order_from_row(row: OrderRow) -> Result<Order, RepositoryError> {
    let (
        id,
        user_id,
        product_ids,
        created_at,
        updated_at,
        delivery_deadline,
        price,
        delivery_type,
        address,
        order_status,
        version,
    ) = row;

    let corrupt = |err: crate::domain::order::ParseValueError| {
        RepositoryError::CorruptRecord(format!("order {}: {}", id, err))
    };

    Ok(Order {
        id,
        version,
        user_id,
        product_ids: product_ids.unwrap_or_default(),
        created_at,
        updated_at,
        delivery_deadline,
        price,
        delivery_type: delivery_type.parse().map_err(corrupt)?,
        address,
        order_status: order_status.parse().map_err(corrupt)?,
    })
}

/// Outcome of a lightweight transaction: `[applied]` plus the first
/// condition column when the write was rejected.
fn lwt_outcome(result: QueryResult) -> Result<(bool, Option<CqlValue>), RepositoryError> {
    let rows = result.into_rows_result().map_err(backend)?;
    let row = rows
        .maybe_first_row::<Row>()
        .map_err(backend)?
        .ok_or_else(|| RepositoryError::Backend("empty lightweight transaction result".to_string()))?;

    let mut columns = row.columns.into_iter();
    match columns.next().flatten() {
        Some(CqlValue::Boolean(applied)) => Ok((applied, columns.next().flatten())),
        other => Err(RepositoryError::Backend(format!(
            "unexpected [applied] column: {:?}",
            other
        ))),
    }
}

pub struct ScyllaOrderRepository {
    session: Arc<Session>,
}

impl ScyllaOrderRepository {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Create keyspace and tables if missing, then switch the session to the keyspace.
    pub async fn ensure_schema(
        &self,
        keyspace: &str,
        replication_factor: u32,
    ) -> anyhow::Result<()> {
        self.session
            .query_unpaged(
                format!(
                    "CREATE KEYSPACE IF NOT EXISTS {} WITH REPLICATION = \
                     {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
                    keyspace, replication_factor
                ),
                &[],
            )
            .await?;

        self.session.use_keyspace(keyspace, false).await?;

        self.session
            .query_unpaged(
                "CREATE TABLE IF NOT EXISTS orders (
                    id uuid PRIMARY KEY,
                    user_id text,
                    product_ids list<text>,
                    created_at timestamp,
                    updated_at timestamp,
                    delivery_deadline timestamp,
                    price double,
                    delivery_type text,
                    address text,
                    order_status text,
                    version bigint
                )",
                &[],
            )
            .await?;

        self.session
            .query_unpaged("CREATE INDEX IF NOT EXISTS orders_user_id_idx ON orders (user_id)", &[])
            .await?;

        self.session
            .query_unpaged(
                "CREATE TABLE IF NOT EXISTS products (id text PRIMARY KEY, name text)",
                &[],
            )
            .await?;

        tracing::info!(keyspace = %keyspace, "Order schema ready");
        Ok(())
    }

    async fn select_orders(
        &self,
        query: String,
        values: impl scylla::serialize::row::SerializeRow,
    ) -> Result<Vec<Order>, RepositoryError> {
        let result = self
            .session
            .query_unpaged(query, values)
            .await
            .map_err(backend)?;

        let rows_result = result.into_rows_result().map_err(backend)?;

        let mut orders = Vec::new();
        for row in rows_result.rows::<OrderRow>().map_err(backend)? {
            orders.push(order_from_row(row.map_err(backend)?)?);
        }

        Ok(orders)
    }
}

#[async_trait]
impl OrderRepository for ScyllaOrderRepository {
    async fn product_exists(&self, product_id: &str) -> Result<bool, RepositoryError> {
        let result = self
            .session
            .query_unpaged("SELECT id FROM products WHERE id = ?", (product_id,))
            .await
            .map_err(backend)?;

        let rows_result = result.into_rows_result().map_err(backend)?;
        let row = rows_result.maybe_first_row::<(String,)>().map_err(backend)?;

        Ok(row.is_some())
    }

    async fn create_order(&self, order: &Order) -> Result<(), RepositoryError> {
        let result = self
            .session
            .query_unpaged(
                format!(
                    "INSERT INTO orders ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) IF NOT EXISTS",
                    ORDER_COLUMNS
                ),
                (
                    order.id,
                    &order.user_id,
                    &order.product_ids,
                    order.created_at,
                    order.updated_at,
                    order.delivery_deadline,
                    order.price,
                    order.delivery_type.as_str(),
                    &order.address,
                    order.order_status.as_str(),
                    order.version,
                ),
            )
            .await
            .map_err(backend)?;

        let (applied, _) = lwt_outcome(result)?;
        if !applied {
            return Err(RepositoryError::AlreadyExists(order.id));
        }

        tracing::debug!(order_id = %order.id, "Inserted order row");
        Ok(())
    }

    async fn get_order_by_id(&self, order_id: Uuid) -> Result<Order, RepositoryError> {
        self.select_orders(
            format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS),
            (order_id,),
        )
        .await?
        .into_iter()
        .next()
        .ok_or(RepositoryError::OrderNotFound(order_id))
    }

    async fn update_order(&self, order: &Order) -> Result<Order, RepositoryError> {
        let next_version = order.version + 1;

        let result = self
            .session
            .query_unpaged(
                "UPDATE orders
                 SET product_ids = ?, updated_at = ?, address = ?, order_status = ?, version = ?
                 WHERE id = ?
                 IF version = ?",
                (
                    &order.product_ids,
                    order.updated_at,
                    &order.address,
                    order.order_status.as_str(),
                    next_version,
                    order.id,
                    order.version,
                ),
            )
            .await
            .map_err(backend)?;

        match lwt_outcome(result)? {
            (true, _) => {
                let mut stored = order.clone();
                stored.version = next_version;
                Ok(stored)
            }
            // no current version means the row does not exist
            (false, None) => Err(RepositoryError::OrderNotFound(order.id)),
            (false, Some(current)) => {
                tracing::debug!(
                    order_id = %order.id,
                    expected = order.version,
                    current = ?current,
                    "Rejected stale order update"
                );
                Err(RepositoryError::VersionConflict {
                    order_id: order.id,
                    expected: order.version,
                })
            }
        }
    }

    async fn get_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        match &filter.user_id {
            Some(user_id) => {
                self.select_orders(
                    format!("SELECT {} FROM orders WHERE user_id = ?", ORDER_COLUMNS),
                    (user_id,),
                )
                .await
            }
            // unpaged full scan; every order is read into memory
            None => {
                self.select_orders(format!("SELECT {} FROM orders", ORDER_COLUMNS), ())
                    .await
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
//
// Queries against a live cluster are not exercised here; these tests cover
// the mapping between stored rows and orders.
//
// ============================================================================
