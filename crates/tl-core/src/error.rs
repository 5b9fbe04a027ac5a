//! Framework error type.
//!
//! Sub-crates define their own error enums (`NetworkError`, `MotionError`,
//! …) and keep `TlError` for the parsing and configuration failures shared by
//! all of them.

use thiserror::Error;

/// The top-level error type for `tl-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TlError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `tl-core`.
pub type TlResult<T> = Result<T, TlError>;
