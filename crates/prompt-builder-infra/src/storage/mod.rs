//! Storage backends for the local prompt store.

pub mod file;
