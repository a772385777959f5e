//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod chat;
pub mod session;
pub mod status;
