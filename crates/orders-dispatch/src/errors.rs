use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orders_types::ports::order_store::StoreError;
use serde::Serialize;
use thiserror::Error;

use crate::inbound::http::response::json_response;

/// Every failure a request can hit. Callers see all of them the same way:
/// status 400 and the message text.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unrouted(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        json_response(
            StatusCode::BAD_REQUEST,
            &ErrorBody {
                error: self.to_string(),
            },
        )
    }
}
