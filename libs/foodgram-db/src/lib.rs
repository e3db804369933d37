//! Database bootstrap, transaction runner and error classification.

mod db_provider;
mod options;

pub use db_provider::DBProvider;
pub use options::{DbConfig, connect, is_memory_dsn};

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Sea(#[from] DbErr),
}

/// True when `err` is a unique or primary-key constraint violation.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
