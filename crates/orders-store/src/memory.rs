use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use orders_types::domain::order::{OrderPatch, OrderRecord, OrderRow};
use orders_types::ports::order_store::{OrderStore, StoreConnector, StoreError};
use std::sync::Arc;
use uuid::Uuid;

/// Process-local stand-in for the hosted store.
///
/// When a required credential is set, handles connected with any other
/// `Authorization` value are refused the way a row-level policy would.
#[derive(Clone, Default)]
pub struct InMemoryConnector {
    pub rows: Arc<DashMap<String, OrderRecord>>,
    required_credential: Option<Arc<str>>,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required_credential(mut self, authorization: impl Into<String>) -> Self {
        self.required_credential = Some(Arc::from(authorization.into()));
        self
    }
}

impl StoreConnector for InMemoryConnector {
    type Store = InMemoryStore;

    fn connect(&self, authorization: Option<&str>) -> Result<InMemoryStore, StoreError> {
        let allowed = match &self.required_credential {
            Some(required) => authorization == Some(required.as_ref()),
            None => true,
        };
        Ok(InMemoryStore {
            rows: self.rows.clone(),
            allowed,
        })
    }
}

#[derive(Clone)]
pub struct InMemoryStore {
    rows: Arc<DashMap<String, OrderRecord>>,
    allowed: bool,
}

impl InMemoryStore {
    fn check(&self) -> Result<(), StoreError> {
        if self.allowed {
            Ok(())
        } else {
            Err(StoreError::Rejected {
                message: "permission denied".into(),
                code: Some("42501".into()),
            })
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

fn to_rows(records: &[OrderRecord]) -> Result<Vec<OrderRow>, StoreError> {
    records
        .iter()
        .map(|r| r.to_row().map_err(|e| StoreError::Decode(e.to_string())))
        .collect()
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn select_by_id(&self, id: &str) -> Result<Vec<OrderRow>, StoreError> {
        self.check()?;
        let found: Vec<OrderRecord> = self.rows.get(id).map(|r| r.clone()).into_iter().collect();
        to_rows(&found)
    }

    async fn select_all(&self) -> Result<Vec<OrderRow>, StoreError> {
        self.check()?;
        let mut records: Vec<OrderRecord> =
            self.rows.iter().map(|kv| kv.value().clone()).collect();
        records.sort_by(|a, b| (&a.created_at, &a.id).cmp(&(&b.created_at, &b.id)));
        to_rows(&records)
    }

    async fn insert(&self, order: &OrderPatch) -> Result<(), StoreError> {
        self.check()?;
        let id = order
            .id
            .clone()
            .flatten()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        match self.rows.entry(id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Rejected {
                message: "duplicate key value violates unique constraint \"orders_pkey\"".into(),
                code: Some("23505".into()),
            }),
            Entry::Vacant(slot) => {
                slot.insert(OrderRecord::from_patch(id, order, &now()));
                Ok(())
            }
        }
    }

    async fn update(&self, id: &str, patch: &OrderPatch) -> Result<(), StoreError> {
        self.check()?;
        if let Some(mut row) = self.rows.get_mut(id) {
            row.apply(patch, &now());
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        self.rows.remove(id);
        Ok(())
    }
}
