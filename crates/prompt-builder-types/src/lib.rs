//! Shared domain types for Prompt Builder.
//!
//! This crate contains the types used across the workspace: the prompt
//! draft, local store records, shared prompts, configuration, and the error
//! enums.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod draft;
pub mod error;
pub mod share;
pub mod store;
