//! Credential primitives.
//!
//! - `password`: Argon2id password hashing
//! - `token`: random bearer tokens and their SHA-256 digests

pub mod password;
pub mod token;
