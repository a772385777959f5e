//! Credential traits for password hashing and bearer token minting.
//!
//! Defined in tutorly-core so the auth service can work without coupling to
//! a specific algorithm. The Argon2 and SHA-256 adapters live in
//! tutorly-infra.

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string (salt included).
    fn hash_password(&self, password: &str) -> Result<String, String>;

    /// Check a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, stored_hash: &str) -> bool;
}

/// Opaque bearer token generation.
pub trait TokenIssuer: Send + Sync {
    /// Fresh random token, returned to the client once.
    fn generate_token(&self) -> String;

    /// Stable digest of a token, the only form that is stored.
    fn digest_token(&self, token: &str) -> String;
}
