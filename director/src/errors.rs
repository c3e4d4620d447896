use crate::config::ValidationError;
use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use shared::http::make_text_response;
use std::convert::Infallible;

/// Why a request could not be routed.
///
/// Every failure of `Router::route` is one of these. The status code is meant to be
/// reflected as-is into the HTTP response sent back to the client; a 503 is the
/// caller's signal to retry later.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Router Error ({}) {}", .status.as_u16(), .message)]
pub struct RoutingError {
    status: StatusCode,
    message: String,
}

impl RoutingError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Missing or malformed Host header, or a method with no destination port.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Host outside the service domain, or a collection that cannot be resolved.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Availability could not be determined.
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// The collection is known but none of its hosts are reachable right now.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_response(self) -> Response<BoxBody<Bytes, Infallible>> {
        make_text_response(self.status, format!("{}\n", self.message))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DirectorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ValidationError),
}
