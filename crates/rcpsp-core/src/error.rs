//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `RcpspError` as one
//! variant via `From`.

use thiserror::Error;

/// The top-level error type for `rcpsp-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum RcpspError {
    #[error("location {0:?} not found")]
    UnknownLocation(String),

    #[error("no pool serves resource type {0:?}")]
    UnknownResourceType(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `rcpsp-*` crates.
pub type RcpspResult<T> = Result<T, RcpspError>;
