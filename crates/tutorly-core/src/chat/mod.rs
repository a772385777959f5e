//! Tutor chat: history normalization and the provider proxy.

pub mod normalizer;
pub mod service;
