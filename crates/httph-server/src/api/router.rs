//! Router creation and configuration

use super::handlers::*;
use crate::config::ServerConfig;
use crate::error::ServerError;
use axum::{
    body::Body,
    routing::{get_service, post_service},
    Router,
};
use httph::middleware::{content_security_policy, no_clickjacking, versioned_assets, GoGetLayer};
use httph::{error_handler, form_handler, json_handler};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the demo router
///
/// Fails when the security or vanity configuration is invalid.
pub fn create_router(config: &ServerConfig) -> Result<Router, ServerError> {
    let assets = ServiceBuilder::new()
        .layer(versioned_assets::<Body>())
        .service(ServeDir::new(&config.assets_dir));

    let mut router = Router::new()
        .route("/health", get_service(json_handler(health)))
        .route("/signup", post_service(form_handler(signup)))
        .route("/greet", post_service(json_handler(greet)))
        .route("/greetings", post_service(json_handler(queue_greeting)))
        .route("/ping", get_service(error_handler(ping)))
        .nest_service("/static", assets);

    // Innermost first, so vanity responses still get the security headers
    if let Some(vanity) = &config.vanity {
        router = router.layer(GoGetLayer::new(vanity.clone())?);
        info!("Serving vanity imports for {}", vanity.domain);
    }

    router = router.layer(content_security_policy(
        &config.security.content_security_policy,
    )?);

    if config.security.no_clickjacking {
        router = router.layer(no_clickjacking());
    }

    Ok(router.layer(TraceLayer::new_for_http()))
}
