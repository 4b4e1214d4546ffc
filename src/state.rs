//! Application state management

use std::path::PathBuf;

use crate::db::DbPool;
use crate::settings::Settings;

/// Application state passed explicitly to every command: the store handle
/// and the configuration value object, acquired at startup and dropped at
/// shutdown.
pub struct AppState {
    /// Database connection pool
    pub db: DbPool,
    /// Path of the active database file (backups are written next to it)
    pub db_path: PathBuf,
    /// Persisted settings loaded at startup
    pub settings: Settings,
}

impl AppState {
    pub fn new(db: DbPool, db_path: PathBuf, settings: Settings) -> Self {
        Self {
            db,
            db_path,
            settings,
        }
    }
}
