//! Database module for the observation log
//!
//! Provides SQLite database access via Diesel ORM.

pub mod models;
pub mod repository;
pub mod schema;

use std::path::Path;

use diesel::r2d2::{self, ConnectionManager};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Establish a connection pool to the SQLite database
pub fn establish_connection(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(5)
        .build(manager)
        .map_err(Error::from)
}

/// Run pending database migrations
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Migration(e.to_string()))?;
    Ok(())
}

/// Initialize the database with a connection pool
pub fn init_database(database_path: &Path) -> Result<DbPool> {
    let database_url = format!("sqlite://{}?mode=rwc", database_path.display());

    let pool = establish_connection(&database_url)?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;

    Ok(pool)
}
