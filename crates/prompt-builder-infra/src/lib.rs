//! Infrastructure layer for Prompt Builder.
//!
//! Contains implementations of the traits defined in `prompt-builder-core`:
//! SQLite repositories for shared prompts and analyses, a file-backed store
//! for the local prompt list, SHA-256 hashing, and config loading.

pub mod config;
pub mod crypto;
pub mod filesystem;
pub mod sqlite;
pub mod storage;
