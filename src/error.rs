//! Error types shared across the crate

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("{0}")]
    Validation(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("{0}")]
    Referenced(String),

    #[error("coordinate lookup failed: {0}")]
    Lookup(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("ephemeris error: {0}")]
    Ephemeris(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn referenced(msg: impl Into<String>) -> Self {
        Error::Referenced(msg.into())
    }
}
