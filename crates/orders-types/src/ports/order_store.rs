use async_trait::async_trait;

use crate::domain::order::{OrderPatch, OrderRow};

/// Any failure reported by the backing store. The display text is the store's
/// own message so it can be surfaced to callers verbatim.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The store answered and refused the call (policy denial, constraint, bad query).
    #[error("{message}")]
    Rejected {
        message: String,
        code: Option<String>,
    },
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Decode(String),
}

impl StoreError {
    pub fn rejected(message: impl Into<String>) -> Self {
        StoreError::Rejected {
            message: message.into(),
            code: None,
        }
    }
}

/// Row CRUD over the orders table, scoped to one caller's credential.
///
/// Filters are equality on `id`. Zero matching rows is never an error. Reads
/// return rows as the store produced them.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn select_by_id(&self, id: &str) -> Result<Vec<OrderRow>, StoreError>;
    async fn select_all(&self) -> Result<Vec<OrderRow>, StoreError>;
    async fn insert(&self, order: &OrderPatch) -> Result<(), StoreError>;
    async fn update(&self, id: &str, patch: &OrderPatch) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Hands out a store handle per request, carrying that request's `Authorization`
/// header (if any) so the store can apply its access policy.
pub trait StoreConnector: Send + Sync + 'static {
    type Store: OrderStore;

    fn connect(&self, authorization: Option<&str>) -> Result<Self::Store, StoreError>;
}
