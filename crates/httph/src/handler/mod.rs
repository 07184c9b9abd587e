//! Handler adapters
//!
//! Each adapter wraps a typed application function and exposes it as a plain
//! `tower::Service<Request>` that never fails: every error is turned into
//! exactly one response.
//!
//! - [`form_handler`]: urlencoded form and query values decoded into a request
//!   shape; the function writes its own response.
//! - [`json_handler`]: JSON body decoded into a request shape; the function
//!   returns a value that is encoded as JSON, or an error.
//! - [`error_handler`]: the function writes its own response or returns an
//!   error that is sent as plain text.

mod error_only;
mod form;
mod json;

pub use error_only::{error_handler, ErrorHandler};
pub use form::{form_handler, FormHandler};
pub use json::{json_handler, JsonHandler};
