//! httph demo server library
//!
//! Exposes the router and configuration so tests can drive the service
//! without binding a socket.

pub mod api;
pub mod config;
pub mod error;
