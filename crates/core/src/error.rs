//! Error types for gatha verse extraction.

use thiserror::Error;

/// Primary error type for extraction runs.
///
/// Only run-level failures live here. Defects in individual pages, lines or
/// words (missing geometry, bad numerals, orphan text) are absorbed by the
/// pass and counted in [`crate::api::PassStats`] instead.
#[derive(Error, Debug)]
pub enum GathaError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document contains no ocr_page elements")]
    NoPages,

    #[error("bad pair {chunk:?}: {reason}")]
    InvalidPair { chunk: String, reason: String },

    #[error("invalid extraction parameters: {0}")]
    InvalidParams(String),

    #[error("selector error: {0}")]
    Selector(String),
}

/// Convenience Result type alias for GathaError.
pub type Result<T> = std::result::Result<T, GathaError>;
