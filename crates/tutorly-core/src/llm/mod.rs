//! Generative provider abstractions for Tutorly.
//!
//! - `ChatProvider`: RPITIT trait for concrete provider implementations
//! - `BoxChatProvider`: object-safe wrapper for dynamic dispatch

pub mod box_provider;
pub mod provider;
