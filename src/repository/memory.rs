//! In-memory repository backend.
//!
//! Useful for tests and local development where persistence is not
//! required. Version checks happen under the write lock, so concurrent
//! updates of the same order behave like the Scylla backend.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{OrderRepository, RepositoryError};
use crate::domain::order::{Order, OrderFilter};

#[derive(Default)]
struct Store {
    orders: HashMap<Uuid, Order>,
    products: HashSet<String>,
}

#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository that already knows the given products.
    pub fn with_products<I, S>(products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Store {
            orders: HashMap::new(),
            products: products.into_iter().map(Into::into).collect(),
        };

        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn add_product(&self, product_id: impl Into<String>) {
        self.store.write().await.products.insert(product_id.into());
    }

    /// Store an order as-is, bypassing lifecycle checks. Intended for seeding.
    pub async fn insert_order(&self, order: Order) {
        self.store.write().await.orders.insert(order.id, order);
    }

    pub async fn order_count(&self) -> usize {
        self.store.read().await.orders.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn product_exists(&self, product_id: &str) -> Result<bool, RepositoryError> {
        Ok(self.store.read().await.products.contains(product_id))
    }

    async fn create_order(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        if store.orders.contains_key(&order.id) {
            return Err(RepositoryError::AlreadyExists(order.id));
        }

        store.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn get_order_by_id(&self, order_id: Uuid) -> Result<Order, RepositoryError> {
        self.store
            .read()
            .await
            .orders
            .get(&order_id)
            .cloned()
            .ok_or(RepositoryError::OrderNotFound(order_id))
    }

    async fn update_order(&self, order: &Order) -> Result<Order, RepositoryError> {
        let mut store = self.store.write().await;
        let stored = store
            .orders
            .get_mut(&order.id)
            .ok_or(RepositoryError::OrderNotFound(order.id))?;

        if stored.version != order.version {
            return Err(RepositoryError::VersionConflict {
                order_id: order.id,
                expected: order.version,
            });
        }

        let mut updated = order.clone();
        updated.version += 1;
        *stored = updated.clone();

        Ok(updated)
    }

    async fn get_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let store = self.store.read().await;
        let mut orders: Vec<Order> = store
            .orders
            .values()
            .filter(|order| match &filter.user_id {
                Some(user_id) => &order.user_id == user_id,
                None => true,
            })
            .cloned()
            .collect();

        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{CreateOrder, DeliveryType};
    use chrono::Utc;

    fn order_for(user_id: &str) -> Order {
        Order::create(
            Uuid::new_v4(),
            CreateOrder {
                user_id: user_id.to_string(),
                products: vec!["p1".to_string()],
                price: 10.0,
                delivery_type: DeliveryType::Pickup,
                address_id: "addr1".to_string(),
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_product_exists() {
        let repo = InMemoryOrderRepository::with_products(["p1"]);

        assert!(repo.product_exists("p1").await.unwrap());
        assert!(!repo.product_exists("p2").await.unwrap());

        repo.add_product("p2").await;
        assert!(repo.product_exists("p2").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryOrderRepository::new();
        let order = order_for("u1");

        repo.create_order(&order).await.unwrap();
        assert_eq!(repo.get_order_by_id(order.id).await.unwrap(), order);

        let duplicate = repo.create_order(&order).await;
        assert!(matches!(duplicate, Err(RepositoryError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_get_missing_order() {
        let repo = InMemoryOrderRepository::new();
        let result = repo.get_order_by_id(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let repo = InMemoryOrderRepository::new();
        let mut order = order_for("u1");
        repo.create_order(&order).await.unwrap();

        order.address = "addr2".to_string();
        let stored = repo.update_order(&order).await.unwrap();

        assert_eq!(stored.version, 2);
        assert_eq!(repo.get_order_by_id(order.id).await.unwrap().address, "addr2");
    }

    #[tokio::test]
    async fn test_stale_update_is_rejected() {
        let repo = InMemoryOrderRepository::new();
        let order = order_for("u1");
        repo.create_order(&order).await.unwrap();

        let mut first = order.clone();
        first.address = "first".to_string();
        repo.update_order(&first).await.unwrap();

        let mut second = order.clone();
        second.address = "second".to_string();
        let result = repo.update_order(&second).await;

        assert!(matches!(
            result,
            Err(RepositoryError::VersionConflict { expected: 1, .. })
        ));
        assert_eq!(repo.get_order_by_id(order.id).await.unwrap().address, "first");
    }

    #[tokio::test]
    async fn test_filter_by_user() {
        let repo = InMemoryOrderRepository::new();
        repo.create_order(&order_for("u1")).await.unwrap();
        repo.create_order(&order_for("u1")).await.unwrap();
        repo.create_order(&order_for("u2")).await.unwrap();

        let all = repo.get_orders(&OrderFilter::default()).await.unwrap();
        let mine = repo.get_orders(&OrderFilter::for_user("u1")).await.unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|order| order.user_id == "u1"));
    }
}
