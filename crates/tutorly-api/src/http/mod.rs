//! HTTP/REST API layer for Tutorly.
//!
//! Axum-based JSON API under `/api/` with bearer token authentication and
//! permissive CORS for the browser client.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
