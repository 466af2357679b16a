//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into `DcError`
//! via `From` or wrap it as one variant.

use thiserror::Error;

use crate::{DockId, TypeId};

/// The top-level error type for `dc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum DcError {
    #[error("pallet type {0} not found")]
    TypeNotFound(TypeId),

    #[error("dock {0} not found")]
    DockNotFound(DockId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `dc-*` crates.
pub type DcResult<T> = Result<T, DcError>;
