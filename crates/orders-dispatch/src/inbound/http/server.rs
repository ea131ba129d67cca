use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    serve, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::config::Config;
use crate::errors::AppError;
use crate::inbound::http::response::{json_response, preflight};
use crate::inbound::http::routes::{is_fallback, order_id, resolve, Operation};
use orders_types::domain::order::OrderPatch;
use orders_types::ports::order_store::StoreConnector;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

/// Request body of create and update.
#[derive(Deserialize)]
pub struct OrderEnvelope {
    pub order: OrderPatch,
}

/// Maps one request to one order operation against a store handle scoped to
/// the caller's credential.
pub struct Dispatcher<C: StoreConnector> {
    connector: C,
    route: String,
    reject_unrouted: bool,
}

impl<C: StoreConnector> Dispatcher<C> {
    pub fn new(connector: C, config: &Config) -> Self {
        Self {
            connector,
            route: config.route.clone(),
            reject_unrouted: config.reject_unrouted,
        }
    }

    pub async fn handle(
        &self,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Response {
        if method == Method::OPTIONS {
            return preflight();
        }
        match self.run(method, uri, headers, body).await {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = %err, "order request failed");
                err.into_response()
            }
        }
    }

    async fn run(
        &self,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let authorization = headers
            .get(AUTHORIZATION)
            .map(|v| v.to_str())
            .transpose()
            .map_err(|e| AppError::BadRequest(format!("invalid authorization header: {e}")))?;
        let store = self.connector.connect(authorization)?;

        let id = order_id(uri.path(), &self.route);
        let order = if method == Method::POST || method == Method::PUT {
            let envelope: OrderEnvelope = serde_json::from_slice(&body)
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            Some(envelope.order)
        } else {
            None
        };

        let route = resolve(&method, id);
        if is_fallback(route) {
            if self.reject_unrouted {
                return Err(AppError::Unrouted(format!(
                    "no order route for {method} {}",
                    uri.path()
                )));
            }
            tracing::warn!(%method, path = uri.path(), "no order route matched, listing all orders");
        }
        tracing::debug!(route = route.name, id, "dispatching order request");

        let service = OrderService::new(store);
        // The route predicates guarantee an id for the id routes and a parsed
        // body for POST/PUT.
        let res = match (route.operation, id, order) {
            (Operation::FetchOne, Some(id), _) => {
                json_response(StatusCode::OK, &service.fetch_one(id).await?)
            }
            (Operation::Update, Some(id), Some(order)) => {
                json_response(StatusCode::OK, &service.update(id, order).await?)
            }
            (Operation::Delete, Some(id), _) => {
                json_response(StatusCode::OK, &service.delete(id).await?)
            }
            (Operation::Create, _, Some(order)) => {
                json_response(StatusCode::OK, &service.create(order).await?)
            }
            _ => json_response(StatusCode::OK, &service.fetch_all().await?),
        };
        Ok(res)
    }
}

#[derive(Clone)]
pub struct HttpServer<C: StoreConnector> {
    pub dispatcher: Arc<Dispatcher<C>>,
    pub config: HttpServerConfig,
}

impl<C: StoreConnector> HttpServer<C> {
    pub async fn new(dispatcher: Dispatcher<C>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            dispatcher: Arc::new(dispatcher),
            config,
        })
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        // Every path reaches the dispatcher; it decides what the path means.
        Router::new()
            .fallback(dispatch::<C>)
            .layer(trace_layer)
            .with_state(self.dispatcher.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn dispatch<C: StoreConnector>(
    State(dispatcher): State<Arc<Dispatcher<C>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    dispatcher.handle(method, &uri, &headers, body).await
}
