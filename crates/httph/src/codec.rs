//! Request body reading and JSON encoding/decoding
//!
//! Encoding always goes to an in-memory buffer; callers only commit a status
//! line once the whole body serialized.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{BodyError, DecodeError, EncodeError};

/// Reads the whole body, failing with [`BodyError::TooLarge`] as soon as more
/// than `limit` bytes arrive.
pub async fn read_body(body: Body, limit: Option<u64>) -> Result<Bytes, BodyError> {
    let collected = match limit {
        Some(limit) => {
            let max = usize::try_from(limit).unwrap_or(usize::MAX);
            Limited::new(body, max).collect().await.map_err(|err| {
                if err.downcast_ref::<LengthLimitError>().is_some() {
                    BodyError::TooLarge { limit }
                } else {
                    BodyError::Read(err.to_string())
                }
            })?
        }
        None => body
            .collect()
            .await
            .map_err(|err| BodyError::Read(err.to_string()))?,
    };

    Ok(collected.to_bytes())
}

/// Decodes the first JSON value in `bytes` into `T`.
///
/// An empty body is not an error: it yields `T::default()`.
pub fn decode_json<T>(bytes: &[u8]) -> Result<T, DecodeError>
where
    T: DeserializeOwned + Default,
{
    if bytes.is_empty() {
        return Ok(T::default());
    }

    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    <T as Deserialize>::deserialize(&mut deserializer)
        .map_err(|err| DecodeError::Json(err.to_string()))
}

/// Serializes `value` into a fresh buffer, newline terminated.
pub fn encode_json<T>(value: &T) -> Result<Vec<u8>, EncodeError>
where
    T: Serialize + ?Sized,
{
    let mut buf = serde_json::to_vec(value)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Wraps an already encoded JSON buffer in a response.
pub fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response()
}
