//! API endpoint handlers
//!
//! Plain async functions; the adapters in the router take care of decoding,
//! validation and encoding.

use super::types::*;
use axum::{
    extract::Request,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use httph::{FormValues, HttpError};
use std::convert::Infallible;
use tracing::info;

/// Health check endpoint
pub(super) async fn health(_parts: Parts, _request: ()) -> Result<HealthResponse, Infallible> {
    Ok(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Sign-up endpoint; redirects home once the form is accepted
pub(super) async fn signup(_parts: Parts, form: SignupForm) -> Response {
    info!(
        "New sign-up: name={}, age={}, hobbies={}",
        form.name,
        form.age,
        form.hobbies.len()
    );

    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

/// Greeting endpoint
pub(super) async fn greet(
    _parts: Parts,
    request: GreetRequest,
) -> Result<GreetResponse, HttpError> {
    if request.name.eq_ignore_ascii_case("teapot") {
        return Err(HttpError::new(StatusCode::IM_A_TEAPOT));
    }

    Ok(GreetResponse {
        message: request.greeting(),
    })
}

/// Queued greeting endpoint
pub(super) async fn queue_greeting(
    _parts: Parts,
    request: GreetRequest,
) -> Result<AcceptedGreeting, HttpError> {
    info!("Queued greeting for {:?}", request.name);

    Ok(AcceptedGreeting {
        message: request.greeting(),
    })
}

/// Liveness endpoint writing its own response; `?fail=1` simulates an outage
pub(super) async fn ping(request: Request) -> Result<&'static str, HttpError> {
    let fail = request
        .uri()
        .query()
        .and_then(|query| FormValues::parse(query).ok())
        .map(|values| values.get("fail") == Some("1"))
        .unwrap_or(false);

    if fail {
        return Err(HttpError::new(StatusCode::SERVICE_UNAVAILABLE));
    }

    Ok("pong")
}
