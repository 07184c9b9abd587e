//! Demo API
//!
//! - types: request and response shapes, with their capabilities
//! - handlers: the application functions behind each route
//! - router: adapter wiring and middleware stack

mod handlers;
mod router;
pub mod types;

// Re-export public API
pub use router::create_router;
pub use types::{
    AcceptedGreeting, GreetRequest, GreetResponse, HealthResponse, SignupForm,
    MAX_GREET_BODY_BYTES, MAX_NAME_LEN,
};
