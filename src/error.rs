//! Errors surfaced at the catalog service boundary.
//!
//! Missing data and unreachable sources are not errors here: they come back
//! as `None` or `false`. What remains are deployment defects and rejected
//! writes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// An operation needs a collaborator that was never supplied.
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    /// A documentation reference names a provider this deployment cannot serve.
    #[error("Unsupported documentation provider: {0}")]
    UnsupportedProvider(String),

    /// A create or update violated a catalog rule.
    #[error("Invalid descriptor: {0}")]
    Validation(String),

    /// The descriptor store failed to persist a change.
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
