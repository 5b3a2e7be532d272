//! Observability setup for Prompt Builder.

pub mod tracing_setup;
