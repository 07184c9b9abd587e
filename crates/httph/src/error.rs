//! Error taxonomy for the handler adapters
//!
//! Every failure inside an adapter ends up as an [`AdapterError`], which knows
//! its status code and how to render itself either as the JSON error envelope
//! or as plain text.

use std::fmt;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capability::{Capabilities, StatusCoded};

/// Request input could not be turned into the request shape.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A form value could not be coerced into the field's type
    #[error("cannot parse '{field}' as {target}: {reason}")]
    Field {
        field: String,
        target: &'static str,
        reason: String,
    },

    /// Any other form decoding failure (missing fields, unsupported shapes)
    #[error("{0}")]
    Form(String),

    /// The request body is not valid JSON for the shape, or could not be read
    #[error("error decoding request body as JSON: {0}")]
    Json(String),
}

impl DecodeError {
    pub(crate) fn field(
        field: impl Into<String>,
        target: &'static str,
        reason: impl fmt::Display,
    ) -> Self {
        DecodeError::Field {
            field: field.into(),
            target,
            reason: reason.to_string(),
        }
    }
}

impl serde::de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError::Form(msg.to_string())
    }
}

/// The response value could not be serialized.
#[derive(Error, Debug)]
#[error("error encoding response body as JSON: {0}")]
pub struct EncodeError(#[from] pub serde_json::Error);

/// Reading the raw request body failed.
#[derive(Error, Debug)]
pub enum BodyError {
    #[error("request body too large")]
    TooLarge { limit: u64 },

    #[error("error reading request body: {0}")]
    Read(String),
}

/// A failure at any stage of an adapted request.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The form parser rejected the request; its message is sent verbatim
    #[error("{0}")]
    Parse(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The decoded form failed validation
    #[error("invalid form: {0}")]
    InvalidForm(String),

    /// The decoded JSON body failed validation
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The application function returned an error
    #[error("{message}")]
    Handler { status: StatusCode, message: String },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl AdapterError {
    /// Wraps an application error, taking its status code from
    /// [`StatusCoded`] when the error exposes one.
    pub fn handler<E>(err: &E) -> Self
    where
        E: fmt::Display + Capabilities + ?Sized,
    {
        AdapterError::Handler {
            status: crate::capability::status_code(err, StatusCode::INTERNAL_SERVER_ERROR),
            message: err.to_string(),
        }
    }

    /// Status code written for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            AdapterError::Parse(_)
            | AdapterError::Decode(_)
            | AdapterError::InvalidForm(_)
            | AdapterError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AdapterError::Handler { status, .. } => *status,
            AdapterError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders the failure as `{"Error": "<message>"}`.
    pub fn into_json_response(self) -> Response {
        let status = self.status();
        let envelope = ErrorEnvelope {
            error: self.to_string(),
        };
        match crate::codec::encode_json(&envelope) {
            Ok(body) => crate::codec::json_response(status, body),
            Err(err) => {
                tracing::error!("Failed to encode error envelope: {}", err);
                status.into_response()
            }
        }
    }

    /// Renders the failure as a plain-text body holding the message.
    pub fn into_text_response(self) -> Response {
        text_response(self.status(), &self.to_string())
    }
}

/// The JSON body sent for every failure reported by the JSON adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "Error")]
    pub error: String,
}

/// An error carrying an HTTP status code; its message is the status code's
/// canonical reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpError {
    status: StatusCode,
}

impl HttpError {
    pub fn new(status: StatusCode) -> Self {
        Self { status }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status.canonical_reason() {
            Some(reason) => f.write_str(reason),
            None => write!(f, "HTTP status {}", self.status.as_u16()),
        }
    }
}

impl std::error::Error for HttpError {}

impl From<StatusCode> for HttpError {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}

impl StatusCoded for HttpError {
    fn status_code(&self) -> StatusCode {
        self.status
    }
}

crate::capabilities!(HttpError: StatusCoded);

/// Plain-text error response, with a trailing newline.
pub(crate) fn text_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
        ],
        format!("{message}\n"),
    )
        .into_response()
}
