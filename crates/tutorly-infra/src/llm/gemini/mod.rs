//! Google Gemini chat provider.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
