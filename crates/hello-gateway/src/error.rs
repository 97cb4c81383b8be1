//! Gateway error types and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hello_gateway_sdk::HandlerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Not Found")]
    RouteNotFound,

    #[error("Failed to read body: {0}")]
    BodyRead(String),

    #[error("Handler execution timed out")]
    HandlerTimeout,

    #[error("Handler task panicked: {0}")]
    HandlerPanicked(String),

    #[error("{0}")]
    Handler(#[from] HandlerError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::RouteNotFound => StatusCode::NOT_FOUND,
            GatewayError::BodyRead(_) => StatusCode::BAD_REQUEST,
            GatewayError::HandlerTimeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::HandlerPanicked(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Handler(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
