//! Error taxonomy for the valuation model.
//!
//! Division-by-zero cases are not errors: the valuation functions return zero
//! for them. Only referential or business-rule violations surface here.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A referenced entity is absent.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Structural mismatch between records, e.g. a holding attached to another portfolio.
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// A business rule on balances or prices was violated.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Error::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
