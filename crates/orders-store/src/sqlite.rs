use async_trait::async_trait;
use chrono::Utc;
use orders_types::domain::order::{OrderPatch, OrderRecord, OrderRow};
use orders_types::ports::order_store::{OrderStore, StoreConnector, StoreError};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

/// Local sqlite backend. It has no access policy, so the forwarded credential
/// is accepted and ignored.
#[derive(Clone)]
pub struct SqliteConnector {
    pool: SqlitePool,
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct DbOrder {
    row_json: String,
}

impl DbOrder {
    fn into_record(self) -> Result<OrderRecord, StoreError> {
        serde_json::from_str(&self.row_json).map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn into_row(self) -> Result<OrderRow, StoreError> {
        serde_json::from_str(&self.row_json).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

fn db_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(db) => StoreError::Rejected {
            message: db.message().to_string(),
            code: db.code().map(|c| c.into_owned()),
        },
        other => StoreError::Transport(other.to_string()),
    }
}

fn encode(record: &OrderRecord) -> Result<String, StoreError> {
    serde_json::to_string(record).map_err(|e| StoreError::Decode(e.to_string()))
}

impl SqliteConnector {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_orders.sql");
        sqlx::query(ddl).execute(&pool).await?;

        tracing::debug!(database_url, "sqlite order store ready");
        Ok(Self { pool })
    }
}

impl StoreConnector for SqliteConnector {
    type Store = SqliteStore;

    fn connect(&self, _authorization: Option<&str>) -> Result<SqliteStore, StoreError> {
        Ok(SqliteStore {
            pool: self.pool.clone(),
        })
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn select_by_id(&self, id: &str) -> Result<Vec<OrderRow>, StoreError> {
        let rows: Vec<DbOrder> = sqlx::query_as("SELECT row_json FROM orders WHERE id = ?")
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        rows.into_iter().map(DbOrder::into_row).collect()
    }

    async fn select_all(&self) -> Result<Vec<OrderRow>, StoreError> {
        let rows: Vec<DbOrder> =
            sqlx::query_as("SELECT row_json FROM orders ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;
        rows.into_iter().map(DbOrder::into_row).collect()
    }

    async fn insert(&self, order: &OrderPatch) -> Result<(), StoreError> {
        let id = order
            .id
            .clone()
            .flatten()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let record = OrderRecord::from_patch(id, order, &Utc::now().to_rfc3339());
        sqlx::query("INSERT INTO orders (id, created_at, row_json) VALUES (?, ?, ?)")
            .bind(&record.id)
            .bind(&record.created_at)
            .bind(encode(&record)?)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, id: &str, patch: &OrderPatch) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let row: Option<DbOrder> = sqlx::query_as("SELECT row_json FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;
        let Some(row) = row else {
            return Ok(());
        };

        let mut record = row.into_record()?;
        record.apply(patch, &Utc::now().to_rfc3339());
        sqlx::query("UPDATE orders SET created_at = ?, row_json = ? WHERE id = ?")
            .bind(&record.created_at)
            .bind(encode(&record)?)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        tx.commit().await.map_err(db_error)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
