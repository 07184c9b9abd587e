//! Server configuration

use httph::middleware::{ContentSecurityPolicyOptions, GoGetOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ServerError;

/// Response security headers applied to every route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Send `X-Frame-Options` and `X-XSS-Protection`
    pub no_clickjacking: bool,

    /// Directives of the `Content-Security-Policy` header
    pub content_security_policy: ContentSecurityPolicyOptions,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            no_clickjacking: true,
            content_security_policy: ContentSecurityPolicyOptions::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port (HTTP)
    pub port: u16,

    /// Log level of the server crate, used when `RUST_LOG` is not set
    pub log_level: String,

    /// Directory served under `/static`
    pub assets_dir: PathBuf,

    /// Security headers
    pub security: SecurityConfig,

    /// Go vanity import paths (optional, disabled when not set)
    pub vanity: Option<GoGetOptions>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            assets_dir: PathBuf::from("assets"),
            security: SecurityConfig::default(),
            vanity: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, the optional `config/server` file and
    /// `HTTPH_` environment variables, in increasing priority.
    ///
    /// Nested keys use `__` in environment variables, for example
    /// `HTTPH_SECURITY__NO_CLICKJACKING=false`.
    pub fn load() -> Result<Self, ServerError> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/server").required(false))
            .add_source(
                config::Environment::with_prefix("HTTPH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load configuration from a single file; missing keys keep their
    /// defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
