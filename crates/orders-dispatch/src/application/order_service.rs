use crate::errors::AppError;
use orders_types::domain::order::{OrderPatch, OrderRow};
use orders_types::ports::order_store::OrderStore;
use serde::Serialize;

pub const ORDER_DELETED: &str = "Order deleted";

/// `{ "order": [...] }`: every row whose id matched, possibly none.
#[derive(Debug, Serialize)]
pub struct MatchingOrders {
    pub order: Vec<OrderRow>,
}

/// `{ "orders": [...] }`
#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<OrderRow>,
}

/// `{ "order": {...} }`: the caller's input, not the stored row.
#[derive(Debug, Serialize)]
pub struct OrderEcho {
    pub order: OrderPatch,
}

#[derive(Debug, Serialize)]
pub struct DeleteStatus {
    pub status: &'static str,
}

/// The five order operations over one request's store handle.
pub struct OrderService<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn fetch_one(&self, id: &str) -> Result<MatchingOrders, AppError> {
        let order = self.store.select_by_id(id).await?;
        Ok(MatchingOrders { order })
    }

    pub async fn fetch_all(&self) -> Result<OrderList, AppError> {
        let orders = self.store.select_all().await?;
        Ok(OrderList { orders })
    }

    pub async fn create(&self, order: OrderPatch) -> Result<OrderEcho, AppError> {
        self.store.insert(&order).await?;
        Ok(OrderEcho { order })
    }

    pub async fn update(&self, id: &str, order: OrderPatch) -> Result<OrderEcho, AppError> {
        self.store.update(id, &order).await?;
        Ok(OrderEcho { order })
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteStatus, AppError> {
        self.store.delete(id).await?;
        Ok(DeleteStatus {
            status: ORDER_DELETED,
        })
    }
}
