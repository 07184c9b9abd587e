//! Typed HTTP handler adapters
//!
//! Turns application functions that take and return typed values into plain
//! `tower` services an axum router can mount:
//!
//! - [`form_handler`] decodes urlencoded form and query values into a request
//!   shape with weak typing
//! - [`json_handler`] decodes a JSON body and encodes the returned value
//! - [`error_handler`] turns a returned error into a plain-text response
//!
//! Request, response and error types opt into optional behavior through the
//! [`capability`] traits: size limits, validation and custom status codes.
//! The [`middleware`] module holds small layers for security headers, vanity
//! Go import paths and versioned assets.

pub mod capability;
pub mod codec;
pub mod error;
pub mod form;
pub mod handler;
pub mod middleware;

/// Type-erased error returned by validation and accepted from handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// Re-export main types
pub use capability::{Capabilities, SizeLimited, StatusCoded, Validate};
pub use error::{AdapterError, DecodeError, EncodeError, ErrorEnvelope, HttpError};
pub use form::{from_form_values, FormValues};
pub use handler::{
    error_handler, form_handler, json_handler, ErrorHandler, FormHandler, JsonHandler,
};
