//! Share-link codecs, local prompt store, and repository trait definitions
//! for Prompt Builder.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements. It depends only on `prompt-builder-types` and pure
//! encoding crates -- never on `prompt-builder-infra` or any database/IO crate.

pub mod codec;
pub mod fingerprint;
pub mod params;
pub mod render;
pub mod repository;
pub mod service;
pub mod store;
