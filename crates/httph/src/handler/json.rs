//! JSON handler adapter

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    extract::Request,
    http::{request::Parts, StatusCode},
    response::Response,
};
use futures::future::BoxFuture;
use serde::{de::DeserializeOwned, Serialize};
use tower::Service;
use tracing::{debug, error, warn};

use crate::capability::{self, Capabilities};
use crate::codec::{decode_json, encode_json, json_response, read_body};
use crate::error::{AdapterError, DecodeError};

/// Adapts `handler` to receive a request shape decoded from a JSON body and
/// to return a response value encoded as JSON.
///
/// The request lifecycle is:
///
/// 1. if the request shape is [`SizeLimited`](crate::SizeLimited), the body
///    read is capped before any byte is read
/// 2. an empty body leaves the shape at its default value; anything else must
///    be JSON
/// 3. a [`Validate`](crate::Validate) shape is validated
/// 4. `handler` runs; an error is sent as `{"Error": "<message>"}` with the
///    error's [`StatusCoded`](crate::StatusCoded) status, or 500
/// 5. the response value is encoded into a buffer and sent with its
///    `StatusCoded` status, or 200
///
/// Decode and validation failures answer `400 Bad Request`, encode failures
/// `500 Internal Server Error`, both as the JSON error envelope.
pub fn json_handler<Req, F, Fut>(handler: F) -> JsonHandler<F, Req>
where
    F: Fn(Parts, Req) -> Fut,
    Fut: Future,
{
    JsonHandler {
        handler: Arc::new(handler),
        _request: PhantomData,
    }
}

/// Service returned by [`json_handler`].
pub struct JsonHandler<F, Req> {
    handler: Arc<F>,
    _request: PhantomData<fn() -> Req>,
}

impl<F, Req> Clone for JsonHandler<F, Req> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            _request: PhantomData,
        }
    }
}

impl<F, Fut, Req, Res, E> Service<Request> for JsonHandler<F, Req>
where
    F: Fn(Parts, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Res, E>> + Send + 'static,
    Req: DeserializeOwned + Default + Capabilities + Send + 'static,
    Res: Serialize + Capabilities,
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
            let response = match serve_json(handler.as_ref(), request).await {
                Ok(response) => response,
                Err(err) => err.into_json_response(),
            };
            Ok(response)
        })
    }
}

async fn serve_json<F, Fut, Req, Res, E>(
    handler: &F,
    request: Request,
) -> Result<Response, AdapterError>
where
    F: Fn(Parts, Req) -> Fut,
    Fut: Future<Output = Result<Res, E>>,
    Req: DeserializeOwned + Default + Capabilities,
    Res: Serialize + Capabilities,
    E: Display + Capabilities,
{
    let (parts, body) = request.into_parts();
    let limit = capability::max_size_bytes(&Req::default());

    let bytes = read_body(body, limit)
        .await
        .map_err(|err| reject(DecodeError::Json(err.to_string()).into()))?;
    let req: Req = decode_json(&bytes).map_err(|err| reject(err.into()))?;

    capability::validate(&req)
        .map_err(|err| reject(AdapterError::InvalidBody(err.to_string())))?;

    let res = match handler(parts, req).await {
        Ok(res) => res,
        Err(err) => {
            let err = AdapterError::handler(&err);
            if err.status().is_server_error() {
                warn!("Handler failed with status {}: {}", err.status(), err);
            }
            return Err(err);
        }
    };

    let body = encode_json(&res).map_err(|err| {
        error!("Failed to encode response: {}", err);
        AdapterError::from(err)
    })?;

    let status = capability::status_code(&res, StatusCode::OK);
    Ok(json_response(status, body))
}

fn reject(err: AdapterError) -> AdapterError {
    debug!("Rejected JSON request: {}", err);
    err
}
