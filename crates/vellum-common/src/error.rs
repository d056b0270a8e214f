//! Error types for the host-facing contract surfaces.
//!
//! Malformed markup never produces an error anywhere in the engine; it is
//! recovered locally and at worst reported through [`crate::warning`]. The
//! variants here cover the places where the *host* can misuse the engine or
//! where the environment fails: writing to a stream that was already closed,
//! rasterizing with no usable font, saving output.

use thiserror::Error;

/// Failures on the engine's host-facing contract surfaces.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The host wrote to a stream after closing it with `end()`.
    #[error("stream is closed")]
    StreamClosed,

    /// The host referenced a resource stream id the engine never issued.
    #[error("unknown resource stream id {0}")]
    UnknownResource(u64),

    /// No usable font could be loaded for rasterization.
    #[error("no usable font found")]
    NoFont,

    /// The rendered output could not be written.
    #[error("failed to write output: {0}")]
    Output(String),
}
