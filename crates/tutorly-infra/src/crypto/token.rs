//! Bearer token generation and digesting.
//!
//! Tokens are `tutorly_` followed by 32 random bytes in hex. The database
//! only ever sees the lowercase hex SHA-256 of a token.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use tutorly_core::service::credential::TokenIssuer;

pub const TOKEN_PREFIX: &str = "tutorly_";

#[derive(Default)]
pub struct Sha256TokenIssuer;

impl Sha256TokenIssuer {
    pub fn new() -> Self {
        Self
    }
}

impl TokenIssuer for Sha256TokenIssuer {
    fn generate_token(&self) -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("{TOKEN_PREFIX}{hex}")
    }

    fn digest_token(&self, token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}
