//! Integration tests for the JSON handler adapter

use axum::{
    body::Body,
    http::{header, request::Parts, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use httph::{
    capabilities, json_handler, BoxError, ErrorEnvelope, HttpError, SizeLimited, StatusCoded,
    Validate,
};
use serde::{Deserialize, Serialize, Serializer};
use tower::ServiceExt;

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct GreetRequest {
    name: String,
}

capabilities!(GreetRequest);

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GreetResponse {
    message: String,
}

capabilities!(GreetResponse);

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AcceptedResponse {
    message: String,
}

impl StatusCoded for AcceptedResponse {
    fn status_code(&self) -> StatusCode {
        StatusCode::ACCEPTED
    }
}

capabilities!(AcceptedResponse: StatusCoded);

#[derive(Debug, Default, Deserialize)]
struct TinyRequest {}

impl SizeLimited for TinyRequest {
    fn max_size_bytes(&self) -> u64 {
        1
    }
}

capabilities!(TinyRequest: SizeLimited);

#[derive(Debug, Default, Deserialize)]
struct ValidatedRequest {}

impl Validate for ValidatedRequest {
    fn validate(&self) -> Result<(), BoxError> {
        Err("invalid".into())
    }
}

capabilities!(ValidatedRequest: Validate);

struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("cannot serialize"))
    }
}

capabilities!(Unserializable);

fn json_request(body: impl Into<Body>) -> Request<Body> {
    Request::post("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn read_body(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap().trim().to_string()
}

async fn read_envelope(response: Response) -> ErrorEnvelope {
    serde_json::from_str(&read_body(response).await).unwrap()
}

async fn greet(_parts: Parts, req: GreetRequest) -> Result<GreetResponse, HttpError> {
    Ok(GreetResponse {
        message: format!("Hello {}", req.name),
    })
}

#[tokio::test]
async fn test_success_with_default_status() {
    let response = json_handler(greet)
        .oneshot(json_request(r#"{"Name":"Me"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(read_body(response).await, r#"{"Message":"Hello Me"}"#);
}

#[tokio::test]
async fn test_success_with_custom_status() {
    let handler = json_handler(|_parts: Parts, req: GreetRequest| async move {
        Ok::<_, HttpError>(AcceptedResponse {
            message: format!("Hello {}", req.name),
        })
    });

    let response = handler.oneshot(json_request(r#"{"Name":"Me"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(read_body(response).await, r#"{"Message":"Hello Me"}"#);
}

#[tokio::test]
async fn test_empty_body_passes_default_request() {
    let handler = json_handler(|_parts: Parts, req: GreetRequest| async move {
        assert_eq!(req, GreetRequest::default());
        Ok::<_, HttpError>(GreetResponse {
            message: "Hello stranger".to_string(),
        })
    });

    let response = handler.oneshot(json_request(Body::empty())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_body(response).await, r#"{"Message":"Hello stranger"}"#);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let handler = json_handler(|_parts: Parts, _req: TinyRequest| async move {
        Ok::<_, HttpError>(GreetResponse {
            message: "unreachable".to_string(),
        })
    });

    let response = handler.oneshot(json_request(r#"{"Name":"Me"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let envelope = read_envelope(response).await;
    assert!(envelope.error.contains("request body too large"));
    assert!(envelope
        .error
        .starts_with("error decoding request body as JSON: "));
}

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    let response = json_handler(greet)
        .oneshot(json_request(r#"{"Name":"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_envelope(response)
        .await
        .error
        .starts_with("error decoding request body as JSON: "));
}

#[tokio::test]
async fn test_wrong_json_type_is_rejected() {
    let response = json_handler(greet)
        .oneshot(json_request(r#"{"Name":42}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validation_failure_is_rejected() {
    let handler = json_handler(|_parts: Parts, _req: ValidatedRequest| async move {
        Ok::<_, HttpError>(GreetResponse {
            message: "unreachable".to_string(),
        })
    });

    let response = handler.oneshot(json_request("{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_body(response).await,
        r#"{"Error":"invalid request body: invalid"}"#
    );
}

#[tokio::test]
async fn test_handler_error_with_custom_status() {
    let handler = json_handler(|_parts: Parts, _req: GreetRequest| async move {
        Err::<GreetResponse, _>(HttpError::new(StatusCode::IM_A_TEAPOT))
    });

    let response = handler.oneshot(json_request(Body::empty())).await.unwrap();

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(read_body(response).await, r#"{"Error":"I'm a teapot"}"#);
}

#[tokio::test]
async fn test_handler_error_defaults_to_internal_server_error() {
    let handler = json_handler(|_parts: Parts, _req: GreetRequest| async move {
        Err::<GreetResponse, _>(anyhow::anyhow!("database unavailable"))
    });

    let response = handler.oneshot(json_request(Body::empty())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_envelope(response).await.error,
        "database unavailable"
    );
}

#[tokio::test]
async fn test_wrapped_http_error_keeps_status() {
    let handler = json_handler(|_parts: Parts, _req: GreetRequest| async move {
        Err::<GreetResponse, _>(anyhow::Error::new(HttpError::new(StatusCode::NOT_FOUND)))
    });

    let response = handler.oneshot(json_request(Body::empty())).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_envelope(response).await.error, "Not Found");
}

#[tokio::test]
async fn test_encode_failure_is_internal_server_error() {
    let handler = json_handler(|_parts: Parts, _req: GreetRequest| async move {
        Ok::<_, HttpError>(Unserializable)
    });

    let response = handler.oneshot(json_request(Body::empty())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope = read_envelope(response).await;
    assert!(envelope
        .error
        .contains("error encoding response body as JSON"));
    assert!(envelope.error.contains("cannot serialize"));
}

#[tokio::test]
async fn test_mounts_on_axum_router() {
    let app = Router::new().route_service("/greet", json_handler(greet));

    let request = Request::post("/greet")
        .body(Body::from(r#"{"Name":"Router"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_body(response).await, r#"{"Message":"Hello Router"}"#);
}

#[tokio::test]
async fn test_serde_json_error_from_handler() {
    let handler = json_handler(|_parts: Parts, _req: GreetRequest| async move {
        serde_json::from_str::<GreetResponse>("not json")
            .map(|_| GreetResponse {
                message: "unreachable".to_string(),
            })
    });

    let response = handler.oneshot(json_request(Body::empty())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(read_envelope(response).await.error.starts_with("expected ident"));
}
