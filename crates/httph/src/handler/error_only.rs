//! Error-only handler adapter

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use tower::Service;
use tracing::warn;

use crate::capability::Capabilities;
use crate::error::AdapterError;

/// Adapts a handler that writes its own success response but may fail.
///
/// On error the response is the error message as plain text, with the error's
/// [`StatusCoded`](crate::StatusCoded) status or `500 Internal Server Error`.
/// Unlike [`json_handler`](crate::json_handler), the error is not wrapped in a
/// JSON envelope.
pub fn error_handler<F, Fut>(handler: F) -> ErrorHandler<F>
where
    F: Fn(Request) -> Fut,
    Fut: Future,
{
    ErrorHandler {
        handler: Arc::new(handler),
    }
}

/// Service returned by [`error_handler`].
pub struct ErrorHandler<F> {
    handler: Arc<F>,
}

impl<F> Clone for ErrorHandler<F> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<F, Fut, R, E> Service<Request> for ErrorHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: IntoResponse,
    E: Display + Capabilities,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        Box::pin(async move {
            let response = match handler(request).await {
                Ok(response) => response.into_response(),
                Err(err) => {
                    let err = AdapterError::handler(&err);
                    if err.status().is_server_error() {
                        warn!("Handler failed with status {}: {}", err.status(), err);
                    }
                    err.into_text_response()
                }
            };
            Ok(response)
        })
    }
}
