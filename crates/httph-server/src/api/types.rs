//! Request and response shapes for the demo API

use axum::http::StatusCode;
use httph::{capabilities, BoxError, SizeLimited, StatusCoded, Validate};
use serde::{Deserialize, Serialize};

/// Largest accepted `/greet` body
pub const MAX_GREET_BODY_BYTES: u64 = 1024;

/// Longest accepted name
pub const MAX_NAME_LEN: usize = 64;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

capabilities!(HealthResponse);

/// Sign-up form posted to `/signup`
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SignupForm {
    pub name: String,
    pub age: i32,
    pub accept: bool,
    pub hobbies: Vec<String>,
}

impl Validate for SignupForm {
    fn validate(&self) -> Result<(), BoxError> {
        if self.name.trim().is_empty() {
            return Err("name is required".into());
        }
        if !self.accept {
            return Err("terms must be accepted".into());
        }
        Ok(())
    }
}

capabilities!(SignupForm: Validate);

/// Body of `/greet` and `/greetings`
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GreetRequest {
    pub name: String,
}

impl GreetRequest {
    pub fn greeting(&self) -> String {
        if self.name.is_empty() {
            "Hello stranger".to_string()
        } else {
            format!("Hello {}", self.name)
        }
    }
}

impl SizeLimited for GreetRequest {
    fn max_size_bytes(&self) -> u64 {
        MAX_GREET_BODY_BYTES
    }
}

impl Validate for GreetRequest {
    fn validate(&self) -> Result<(), BoxError> {
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(format!("name is longer than {MAX_NAME_LEN} characters").into());
        }
        Ok(())
    }
}

capabilities!(GreetRequest: SizeLimited, Validate);

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GreetResponse {
    pub message: String,
}

capabilities!(GreetResponse);

/// A greeting queued for later delivery; answered with `202 Accepted`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AcceptedGreeting {
    pub message: String,
}

impl StatusCoded for AcceptedGreeting {
    fn status_code(&self) -> StatusCode {
        StatusCode::ACCEPTED
    }
}

capabilities!(AcceptedGreeting: StatusCoded);
