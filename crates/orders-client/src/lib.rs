use std::time::Duration;

use anyhow::Context;
use orders_types::domain::order::{OrderPatch, OrderRecord};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct OrdersClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

/// Typed client for the orders endpoint. `base_url` points at the route
/// itself, e.g. `https://host/functions/v1/restful-tasks`.
#[derive(Clone)]
pub struct OrdersClient {
    base: Url,
    client: reqwest::Client,
}

impl OrdersClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<OrdersClientBuilder> {
        let base = Url::parse(base_url.trim_end_matches('/')).context("invalid base url")?;
        if base.cannot_be_a_base() {
            anyhow::bail!("base url cannot carry a path: {base_url}");
        }
        Ok(OrdersClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn collection(&self) -> Url {
        self.base.clone()
    }

    fn item(&self, id: &str) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base url cannot carry a path"))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    pub async fn get_order(&self, id: &str) -> anyhow::Result<Vec<OrderRecord>> {
        let res = self.client.get(self.item(id)?).send().await?;
        let body: MatchingOrders = decode(res).await?;
        Ok(body.order)
    }

    pub async fn list_orders(&self) -> anyhow::Result<Vec<OrderRecord>> {
        let res = self.client.get(self.collection()).send().await?;
        let body: OrderList = decode(res).await?;
        Ok(body.orders)
    }

    pub async fn create_order(&self, order: &OrderPatch) -> anyhow::Result<OrderPatch> {
        let res = self
            .client
            .post(self.collection())
            .json(&OrderEnvelope { order })
            .send()
            .await?;
        let body: OrderEcho = decode(res).await?;
        Ok(body.order)
    }

    pub async fn update_order(&self, id: &str, order: &OrderPatch) -> anyhow::Result<OrderPatch> {
        let res = self
            .client
            .put(self.item(id)?)
            .json(&OrderEnvelope { order })
            .send()
            .await?;
        let body: OrderEcho = decode(res).await?;
        Ok(body.order)
    }

    /// Returns the server's status line, `"Order deleted"`.
    pub async fn delete_order(&self, id: &str) -> anyhow::Result<String> {
        let res = self.client.delete(self.item(id)?).send().await?;
        let body: DeleteStatus = decode(res).await?;
        Ok(body.status)
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> anyhow::Result<T> {
    if res.status() == StatusCode::BAD_REQUEST {
        let body: ErrorBody = res.json().await.context("unreadable error response")?;
        tracing::debug!(error = %body.error, "orders endpoint refused request");
        anyhow::bail!(body.error);
    }
    Ok(res.error_for_status()?.json().await?)
}

impl OrdersClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Sends `Authorization: Bearer <token>` with every call; the store applies
    /// its access policy to this caller.
    pub fn with_bearer(mut self, token: impl AsRef<str>) -> anyhow::Result<Self> {
        let value = HeaderValue::from_str(&format!("Bearer {}", token.as_ref()))
            .context("invalid bearer token")?;
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<OrdersClient> {
        if let Some(client) = self.client {
            return Ok(OrdersClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(OrdersClient {
            base: self.base,
            client,
        })
    }
}

#[derive(Serialize)]
struct OrderEnvelope<'a> {
    order: &'a OrderPatch,
}

#[derive(Deserialize)]
struct MatchingOrders {
    order: Vec<OrderRecord>,
}

#[derive(Deserialize)]
struct OrderList {
    orders: Vec<OrderRecord>,
}

#[derive(Deserialize)]
struct OrderEcho {
    order: OrderPatch,
}

#[derive(Deserialize)]
struct DeleteStatus {
    status: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn sample_patch() -> OrderPatch {
        serde_json::from_value(json!({ "name": "User", "total_price": 5 })).unwrap()
    }

    #[tokio::test]
    async fn create_and_get_order() {
        let server = MockServer::start_async().await;
        let order = sample_patch();

        let create_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/restful-tasks")
                    .header("authorization", "Bearer t0k")
                    .json_body(json!({ "order": { "name": "User", "total_price": 5 } }));
                then.status(200)
                    .json_body(json!({ "order": { "name": "User", "total_price": 5 } }));
            })
            .await;

        let get_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/restful-tasks/o-1");
                then.status(200)
                    .json_body(json!({ "order": [{ "id": "o-1", "name": "User" }] }));
            })
            .await;

        let client = OrdersClient::builder(&server.url("/restful-tasks"))
            .unwrap()
            .with_bearer("t0k")
            .unwrap()
            .build()
            .unwrap();
        let created = client.create_order(&order).await.unwrap();
        assert_eq!(created, order);

        let fetched = client.get_order("o-1").await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].name.as_deref(), Some("User"));

        create_mock.assert_async().await;
        get_mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_update_delete() {
        let server = MockServer::start_async().await;

        let list_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/restful-tasks");
                then.status(200)
                    .json_body(json!({ "orders": [{ "id": "o-1" }, { "id": "o-2" }] }));
            })
            .await;

        let update_mock = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::PUT)
                    .path("/restful-tasks/o-1")
                    .json_body(json!({ "order": { "paid": true } }));
                then.status(200).json_body(json!({ "order": { "paid": true } }));
            })
            .await;

        let delete_mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/restful-tasks/o-1");
                then.status(200).json_body(json!({ "status": "Order deleted" }));
            })
            .await;

        let client = OrdersClient::new(&server.url("/restful-tasks/")).unwrap();
        let listed = client.list_orders().await.unwrap();
        assert_eq!(listed.len(), 2);

        let patch: OrderPatch = serde_json::from_value(json!({ "paid": true })).unwrap();
        let updated = client.update_order("o-1", &patch).await.unwrap();
        assert_eq!(updated.paid, Some(Some(true)));

        let status = client.delete_order("o-1").await.unwrap();
        assert_eq!(status, "Order deleted");

        list_mock.assert_async().await;
        update_mock.assert_async().await;
        delete_mock.assert_async().await;
    }

    #[tokio::test]
    async fn bad_request_surfaces_server_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/restful-tasks");
                then.status(400)
                    .json_body(json!({ "error": "permission denied" }));
            })
            .await;

        let client = OrdersClient::new(&server.url("/restful-tasks")).unwrap();
        let err = client.list_orders().await.unwrap_err();
        assert_eq!(err.to_string(), "permission denied");
    }
}
