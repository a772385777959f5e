//! Shared domain types for Tutorly.
//!
//! This crate contains the core domain types used across the Tutorly backend:
//! users and auth tokens, study sessions, tutor chat messages, LLM request
//! shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod error;
pub mod llm;
pub mod session;
pub mod user;
