//! Business logic and repository trait definitions for Tutorly.
//!
//! This crate defines the "ports" (repository, provider and hasher traits)
//! that the infrastructure layer implements. It depends only on
//! `tutorly-types` -- never on `tutorly-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;
pub mod study;
