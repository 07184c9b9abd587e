//! Server error types

use httph::middleware::{CspError, GoGetError};
use thiserror::Error;

/// Errors raised while loading configuration or assembling the router.
///
/// All of these happen at startup; request handling never produces one.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The configured Content-Security-Policy is not a valid header value
    #[error("Invalid security configuration: {0}")]
    Csp(#[from] CspError),

    /// The configured vanity import options are invalid
    #[error("Invalid vanity configuration: {0}")]
    Vanity(#[from] GoGetError),
}
