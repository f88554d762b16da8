//! Turning handler failures into HTTP responses.
//!
//! Handlers return `Result<Response, HandlerError>`. On `Ok` the response goes
//! out untouched. On `Err` the cause chain is searched for an [`HttpError`]:
//! if one is found its status and message are sent, otherwise the client gets
//! a generic 500. Either way the full chain is logged here and nowhere else.

use std::error::Error as StdError;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Message sent for every failure that was not classified.
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// The kinds of failure a client can be told about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    MalformedInput,
    Forbidden,
    NotFound,
    Internal,
}

impl ErrorClass {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorClass::MalformedInput => StatusCode::BAD_REQUEST,
            ErrorClass::Forbidden => StatusCode::FORBIDDEN,
            ErrorClass::NotFound => StatusCode::NOT_FOUND,
            ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A classified failure. `message` is shown to the client; `source` is only
/// ever logged.
#[derive(Debug)]
pub struct HttpError {
    class: ErrorClass,
    message: String,
    source: Option<BoxError>,
}

impl HttpError {
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn bad_request(source: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::MalformedInput, message).with_source(source)
    }

    pub fn forbidden(source: impl Into<BoxError>) -> Self {
        Self::new(ErrorClass::Forbidden, "Forbidden").with_source(source)
    }

    pub fn not_found(source: impl Into<BoxError>) -> Self {
        Self::new(ErrorClass::NotFound, "Not Found").with_source(source)
    }

    pub fn internal(source: impl Into<BoxError>) -> Self {
        Self::new(ErrorClass::Internal, INTERNAL_MESSAGE).with_source(source)
    }

    pub fn class(&self) -> ErrorClass {
        self.class
    }

    pub fn status(&self) -> StatusCode {
        self.class.status()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for HttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}

/// Error type of every fallible handler. Anything convertible to
/// [`anyhow::Error`] converts with `?`.
#[derive(Debug)]
pub struct HandlerError(anyhow::Error);

impl HandlerError {
    /// The classification found in the cause chain, if any.
    pub fn classified(&self) -> Option<&HttpError> {
        self.0.downcast_ref::<HttpError>().or_else(|| {
            self.0
                .chain()
                .find_map(|cause| cause.downcast_ref::<HttpError>())
        })
    }
}

impl<E> From<E> for HandlerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "statusCode": status.as_u16(),
        "message": message,
    }));
    (status, body).into_response()
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self.classified() {
            Some(http) => {
                let status = http.status();
                if status.is_server_error() {
                    tracing::error!("{} {}: {:#}", status.as_u16(), http.message(), self.0);
                } else {
                    tracing::warn!("{} {}: {:#}", status.as_u16(), http.message(), self.0);
                }
                error_body(status, http.message())
            }
            None => {
                tracing::error!("Unclassified handler error: {:#}", self.0);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
            }
        }
    }
}
