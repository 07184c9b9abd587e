//! Integration tests for the form handler adapter

use axum::{
    body::Body,
    http::{header, request::Parts, Request, StatusCode},
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;
use httph::{capabilities, form_handler, BoxError, SizeLimited, Validate};
use serde::Deserialize;
use tower::ServiceExt;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SignupForm {
    name: String,
    age: i32,
    accept: bool,
    hobbies: Vec<String>,
}

capabilities!(SignupForm);

#[derive(Debug, Default, Deserialize)]
struct ValidatedForm {}

impl Validate for ValidatedForm {
    fn validate(&self) -> Result<(), BoxError> {
        Err("invalid".into())
    }
}

capabilities!(ValidatedForm: Validate);

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TinyForm {
    name: String,
}

impl SizeLimited for TinyForm {
    fn max_size_bytes(&self) -> u64 {
        4
    }
}

capabilities!(TinyForm: SizeLimited);

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProfileForm {
    name: String,
    age: i32,
    accept: bool,
}

capabilities!(ProfileForm);

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_body(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap().trim().to_string()
}

fn found() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

#[tokio::test]
async fn test_parses_form_into_struct() {
    let handler = form_handler(|_parts: Parts, form: SignupForm| async move {
        assert_eq!(form.name, "Me");
        assert_eq!(form.age, 20);
        assert!(form.accept);
        assert_eq!(form.hobbies, vec!["Hats".to_string(), "Goats".to_string()]);
        found()
    });

    let request = form_request("/", "name=Me&age=20&accept=true&hobbies=Hats&hobbies=Goats");
    let response = handler.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_reads_query_values_and_passes_request_parts() {
    let handler = form_handler(|parts: Parts, form: SignupForm| async move {
        assert_eq!(parts.uri.path(), "/search");
        format!("{} {}", form.name, form.age)
    });

    let request = Request::get("/search?NAME=You&age=31")
        .body(Body::empty())
        .unwrap();
    let response = handler.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_body(response).await, "You 31");
}

#[tokio::test]
async fn test_returns_bad_request_on_bad_input_values() {
    let handler = form_handler(|_parts: Parts, _form: SignupForm| async { found() });

    let response = handler
        .oneshot(form_request("/", "age=not+a+number"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert!(read_body(response)
        .await
        .contains("cannot parse 'Age' as int"));
}

#[tokio::test]
async fn test_returns_bad_request_when_validate_returns_error() {
    let handler = form_handler(|_parts: Parts, _form: ValidatedForm| async { found() });

    let response = handler.oneshot(form_request("/", "name=")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_body(response).await, "invalid form: invalid");
}

#[tokio::test]
async fn test_returns_bad_request_on_unparseable_form() {
    let handler = form_handler(|_parts: Parts, _form: SignupForm| async { found() });

    let response = handler.oneshot(form_request("/", "name=%FF")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_body(response).await.starts_with("invalid form value"));
}

#[tokio::test]
async fn test_size_limited_form_rejects_large_body() {
    let handler = form_handler(|_parts: Parts, _form: TinyForm| async { found() });

    let response = handler
        .oneshot(form_request("/", "name=far-too-long"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_body(response).await, "request body too large");
}

#[tokio::test]
async fn test_handler_is_reusable_across_requests() {
    let handler = form_handler(|_parts: Parts, form: SignupForm| async move { form.name });

    for name in ["Ann", "Bob"] {
        let response = handler
            .clone()
            .oneshot(form_request("/", &format!("name={name}")))
            .await
            .unwrap();
        assert_eq!(read_body(response).await, name);
    }
}

#[tokio::test]
async fn test_missing_fields_are_zero_without_serde_default() {
    let handler = form_handler(|_parts: Parts, form: ProfileForm| async move {
        format!("{} {} {}", form.name, form.age, form.accept)
    });

    let response = handler.oneshot(form_request("/", "name=Me")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_body(response).await, "Me 0 false");
}

#[tokio::test]
async fn test_blank_number_and_bool_values_are_zero() {
    let handler = form_handler(|_parts: Parts, form: ProfileForm| async move {
        format!("{} {} {}", form.name, form.age, form.accept)
    });

    let response = handler
        .oneshot(form_request("/", "name=Me&age=&accept="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_body(response).await, "Me 0 false");
}

#[tokio::test]
async fn test_returns_bad_request_on_malformed_escape() {
    let handler = form_handler(|_parts: Parts, _form: SignupForm| async { found() });

    let response = handler.oneshot(form_request("/", "name=%zz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_body(response).await, "invalid URL escape \"%zz\"");
}
