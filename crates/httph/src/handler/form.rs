//! Form handler adapter

use std::convert::Infallible;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    extract::Request,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use tower::Service;
use tracing::debug;

use crate::capability::{self, Capabilities};
use crate::error::AdapterError;
use crate::form::{from_form_values, FormValues};

/// Adapts `handler` to receive a request shape decoded from the form body and
/// query string.
///
/// Parse, decode and validation failures are answered with `400 Bad Request`
/// and a plain-text message; otherwise the handler's response is sent as is.
///
/// ```
/// use axum::{http::request::Parts, response::Redirect};
/// use httph::{capabilities, form_handler};
///
/// #[derive(Default, serde::Deserialize)]
/// #[serde(default)]
/// struct Search {
///     query: String,
/// }
///
/// capabilities!(Search);
///
/// let handler = form_handler(|_parts: Parts, search: Search| async move {
///     Redirect::to(&format!("/results/{}", search.query))
/// });
/// # let _ = handler;
/// ```
pub fn form_handler<Req, F, Fut>(handler: F) -> FormHandler<F, Req>
where
    F: Fn(Parts, Req) -> Fut,
    Fut: Future,
{
    FormHandler {
        handler: Arc::new(handler),
        _request: PhantomData,
    }
}

/// Service returned by [`form_handler`].
pub struct FormHandler<F, Req> {
    handler: Arc<F>,
    _request: PhantomData<fn() -> Req>,
}

impl<F, Req> Clone for FormHandler<F, Req> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            _request: PhantomData,
        }
    }
}

impl<F, Fut, Req, R> Service<Request> for FormHandler<F, Req>
where
    F: Fn(Parts, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
    Req: DeserializeOwned + Default + Capabilities + Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        Box::pin(async move { Ok(serve_form(handler.as_ref(), request).await) })
    }
}

async fn serve_form<F, Fut, Req, R>(handler: &F, request: Request) -> Response
where
    F: Fn(Parts, Req) -> Fut,
    Fut: Future<Output = R>,
    R: IntoResponse,
    Req: DeserializeOwned + Default + Capabilities,
{
    match decode_form::<Req>(request).await {
        Ok((parts, req)) => handler(parts, req).await.into_response(),
        Err(err) => {
            debug!("Rejected form request: {}", err);
            err.into_text_response()
        }
    }
}

async fn decode_form<Req>(request: Request) -> Result<(Parts, Req), AdapterError>
where
    Req: DeserializeOwned + Default + Capabilities,
{
    let (parts, body) = request.into_parts();
    let limit = capability::max_size_bytes(&Req::default());

    let values = FormValues::from_request(&parts, body, limit).await?;
    let req: Req = from_form_values(&values)?;

    capability::validate(&req).map_err(|err| AdapterError::InvalidForm(err.to_string()))?;

    Ok((parts, req))
}
