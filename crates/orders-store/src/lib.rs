#[cfg(not(any(feature = "rest", feature = "memory", feature = "sqlite")))]
compile_error!("Enable a store feature: `rest`, `memory` or `sqlite`.");

use std::env;
use std::str::FromStr;

use async_trait::async_trait;
use orders_types::domain::order::{OrderPatch, OrderRow};
use orders_types::ports::order_store::{OrderStore, StoreConnector, StoreError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "rest")]
pub mod rest;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Rest,
    Memory,
    Sqlite,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" => Ok(Backend::Rest),
            "memory" => Ok(Backend::Memory),
            "sqlite" => Ok(Backend::Sqlite),
            other => anyhow::bail!("unknown store backend `{other}`"),
        }
    }
}

/// Where the orders live, read once at startup.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub backend: Backend,
    pub url: Option<String>,
    pub public_key: Option<String>,
    pub table: String,
    pub database_url: Option<String>,
}

impl StoreSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "rest".into())
            .parse()?;
        let settings = Self {
            backend,
            url: env::var("SUPABASE_URL").ok(),
            public_key: env::var("SUPABASE_ANON_KEY").ok(),
            table: env::var("ORDERS_TABLE").unwrap_or_else(|_| "orders".into()),
            database_url: env::var("DATABASE_URL").ok(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend == Backend::Rest {
            if self.url.as_deref().map_or(true, str::is_empty) {
                anyhow::bail!("SUPABASE_URL is required for the rest store backend");
            }
            if self.public_key.as_deref().map_or(true, str::is_empty) {
                anyhow::bail!("SUPABASE_ANON_KEY is required for the rest store backend");
            }
        }
        Ok(())
    }
}

/// The connector chosen at startup.
#[derive(Clone)]
pub enum Connector {
    #[cfg(feature = "rest")]
    Rest(rest::RestConnector),
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryConnector),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteConnector),
}

pub enum ConnectedStore {
    #[cfg(feature = "rest")]
    Rest(rest::RestStore),
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryStore),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteStore),
}

pub async fn build_connector(settings: &StoreSettings) -> anyhow::Result<Connector> {
    Connector::build(settings).await
}

impl Connector {
    pub async fn build(settings: &StoreSettings) -> anyhow::Result<Self> {
        settings.validate()?;
        tracing::info!(backend = ?settings.backend, table = %settings.table, "building order store");
        match settings.backend {
            #[cfg(feature = "rest")]
            Backend::Rest => {
                let url = settings.url.as_deref().unwrap_or_default();
                let key = settings.public_key.as_deref().unwrap_or_default();
                Ok(Connector::Rest(rest::RestConnector::new(
                    url,
                    key,
                    &settings.table,
                )?))
            }
            #[cfg(feature = "memory")]
            Backend::Memory => Ok(Connector::Memory(memory::InMemoryConnector::new())),
            #[cfg(feature = "sqlite")]
            Backend::Sqlite => {
                let url = settings
                    .database_url
                    .as_deref()
                    .unwrap_or("sqlite://orders.db");
                Ok(Connector::Sqlite(sqlite::SqliteConnector::new(url).await?))
            }
            #[allow(unreachable_patterns)]
            other => anyhow::bail!(
                "store backend {other:?} is not compiled in; enable its cargo feature"
            ),
        }
    }
}

impl StoreConnector for Connector {
    type Store = ConnectedStore;

    fn connect(&self, authorization: Option<&str>) -> Result<ConnectedStore, StoreError> {
        match self {
            #[cfg(feature = "rest")]
            Connector::Rest(c) => c.connect(authorization).map(ConnectedStore::Rest),
            #[cfg(feature = "memory")]
            Connector::Memory(c) => c.connect(authorization).map(ConnectedStore::Memory),
            #[cfg(feature = "sqlite")]
            Connector::Sqlite(c) => c.connect(authorization).map(ConnectedStore::Sqlite),
        }
    }
}

impl ConnectedStore {
    fn inner(&self) -> &dyn OrderStore {
        match self {
            #[cfg(feature = "rest")]
            ConnectedStore::Rest(s) => s,
            #[cfg(feature = "memory")]
            ConnectedStore::Memory(s) => s,
            #[cfg(feature = "sqlite")]
            ConnectedStore::Sqlite(s) => s,
        }
    }
}

#[async_trait]
impl OrderStore for ConnectedStore {
    async fn select_by_id(&self, id: &str) -> Result<Vec<OrderRow>, StoreError> {
        self.inner().select_by_id(id).await
    }

    async fn select_all(&self) -> Result<Vec<OrderRow>, StoreError> {
        self.inner().select_all().await
    }

    async fn insert(&self, order: &OrderPatch) -> Result<(), StoreError> {
        self.inner().insert(order).await
    }

    async fn update(&self, id: &str, patch: &OrderPatch) -> Result<(), StoreError> {
        self.inner().update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner().delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(backend: Backend) -> StoreSettings {
        StoreSettings {
            backend,
            url: None,
            public_key: None,
            table: "orders".into(),
            database_url: None,
        }
    }

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("REST".parse::<Backend>().unwrap(), Backend::Rest);
        assert_eq!(" sqlite ".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert!("postgres".parse::<Backend>().is_err());
    }

    #[test]
    fn rest_backend_needs_url_and_key() {
        let mut s = settings(Backend::Rest);
        assert!(s.validate().is_err());
        s.url = Some("https://db.example.co".into());
        assert!(s.validate().is_err());
        s.public_key = Some("anon".into());
        assert!(s.validate().is_ok());
        assert!(settings(Backend::Memory).validate().is_ok());
    }
}
