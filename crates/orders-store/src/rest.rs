use anyhow::Context;
use async_trait::async_trait;
use orders_types::domain::order::{OrderPatch, OrderRow};
use orders_types::ports::order_store::{OrderStore, StoreConnector, StoreError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

/// Client for a hosted PostgREST-style table endpoint (`{url}/rest/v1/{table}`).
///
/// Holds one connection pool; each `connect` produces a handle carrying the
/// caller's credential so the store's row-level policies apply to that caller.
#[derive(Clone)]
pub struct RestConnector {
    endpoint: Url,
    public_key: String,
    client: reqwest::Client,
}

impl RestConnector {
    pub fn new(store_url: &str, public_key: &str, table: &str) -> anyhow::Result<Self> {
        let base = format!("{}/", store_url.trim_end_matches('/'));
        let endpoint = Url::parse(&base)
            .context("invalid store url")?
            .join(&format!("rest/v1/{table}"))
            .context("invalid table name")?;
        HeaderValue::from_str(public_key).context("invalid store public key")?;
        Ok(Self {
            endpoint,
            public_key: public_key.to_string(),
            client: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl StoreConnector for RestConnector {
    type Store = RestStore;

    fn connect(&self, authorization: Option<&str>) -> Result<RestStore, StoreError> {
        let invalid = |e: reqwest::header::InvalidHeaderValue| StoreError::Transport(e.to_string());
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&self.public_key).map_err(invalid)?);
        // Without a caller credential the store sees the anonymous role.
        let authorization = match authorization {
            Some(value) => HeaderValue::from_str(value),
            None => HeaderValue::from_str(&format!("Bearer {}", self.public_key)),
        }
        .map_err(invalid)?;
        headers.insert(AUTHORIZATION, authorization);

        Ok(RestStore {
            endpoint: self.endpoint.clone(),
            client: self.client.clone(),
            headers,
        })
    }
}

pub struct RestStore {
    endpoint: Url,
    client: reqwest::Client,
    headers: HeaderMap,
}

#[derive(Deserialize)]
struct Rejection {
    message: Option<String>,
    code: Option<String>,
}

fn rejection(status: StatusCode, body: &str) -> StoreError {
    match serde_json::from_str::<Rejection>(body) {
        Ok(Rejection {
            message: Some(message),
            code,
        }) => StoreError::Rejected { message, code },
        _ => StoreError::Rejected {
            message: status
                .canonical_reason()
                .unwrap_or("store request failed")
                .to_string(),
            code: None,
        },
    }
}

fn id_filter(id: &str) -> (&'static str, String) {
    ("id", format!("eq.{id}"))
}

impl RestStore {
    async fn send(&self, req: RequestBuilder) -> Result<Response, StoreError> {
        let res = req
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        tracing::debug!(%status, body = %body, "store rejected request");
        Err(rejection(status, &body))
    }

    async fn rows(&self, req: RequestBuilder) -> Result<Vec<OrderRow>, StoreError> {
        self.send(req)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn write(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("prefer", "return=minimal")
    }
}

#[async_trait]
impl OrderStore for RestStore {
    async fn select_by_id(&self, id: &str) -> Result<Vec<OrderRow>, StoreError> {
        let (column, filter) = id_filter(id);
        let req = self
            .client
            .get(self.endpoint.clone())
            .query(&[("select", "*"), (column, filter.as_str())]);
        self.rows(req).await
    }

    async fn select_all(&self) -> Result<Vec<OrderRow>, StoreError> {
        let req = self
            .client
            .get(self.endpoint.clone())
            .query(&[("select", "*")]);
        self.rows(req).await
    }

    async fn insert(&self, order: &OrderPatch) -> Result<(), StoreError> {
        let req = self.write(self.client.post(self.endpoint.clone()).json(order));
        self.send(req).await?;
        Ok(())
    }

    async fn update(&self, id: &str, patch: &OrderPatch) -> Result<(), StoreError> {
        let req = self.write(
            self.client
                .patch(self.endpoint.clone())
                .query(&[id_filter(id)])
                .json(patch),
        );
        self.send(req).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let req = self.write(
            self.client
                .delete(self.endpoint.clone())
                .query(&[id_filter(id)]),
        );
        self.send(req).await?;
        Ok(())
    }
}
