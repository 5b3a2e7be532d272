//! Local prompt store: a bounded, deduplicated list of recent drafts.
//!
//! - `backend`: synchronous key-value persistence port
//! - `dedup`: identifier, exact and fuzzy duplicate matching
//! - `repository`: load/save/upsert/delete over a backend

pub mod backend;
pub mod dedup;
pub mod repository;
