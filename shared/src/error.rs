use fingenius_core::PortfolioId;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(DbErr),

    #[error(transparent)]
    Domain(#[from] fingenius_core::Error),

    #[error("Snapshot conflict: portfolio {0} changed since it was loaded")]
    SnapshotConflict(PortfolioId),

    #[error("{0} is already registered")]
    Duplicate(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Error::Duplicate(detail),
            _ => Error::Database(err),
        }
    }
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Domain(e) if e.is_not_found())
    }
}
