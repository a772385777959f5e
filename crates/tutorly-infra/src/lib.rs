//! Infrastructure layer for Tutorly.
//!
//! Contains implementations of the ports defined in `tutorly-core`:
//! SQLite storage, Argon2 password hashing, bearer token digests, and the
//! Gemini chat provider.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod sqlite;
