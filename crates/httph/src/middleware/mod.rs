//! Middleware that wraps a handler and either forwards the request or answers
//! it directly.
//!
//! All configuration is fixed when a layer is built; invalid configuration is
//! reported then, never per request.

mod assets;
mod csp;
mod goget;
mod headers;

pub use assets::{rewrite_versioned_asset, strip_asset_version, versioned_assets};
pub use csp::{content_security_policy, ContentSecurityPolicyOptions, CspError};
pub use goget::{GoGet, GoGetError, GoGetLayer, GoGetOptions};
pub use headers::{no_clickjacking, NoClickjackingLayer};
