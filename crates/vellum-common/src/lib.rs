//! Common utilities for the Vellum engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning System** - colored, deduplicated terminal output for
//!   malformed markup and unsupported features
//! - **Error Types** - failures on the host-facing contract surfaces

pub mod error;
pub mod warning;

pub use error::EngineError;
