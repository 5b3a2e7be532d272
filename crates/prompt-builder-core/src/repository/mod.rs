//! Repository trait definitions (ports).
//!
//! These traits define the database interface that prompt-builder-infra
//! implements. The core crate never depends on any specific storage
//! technology.

pub mod analysis;
pub mod shared_prompt;
