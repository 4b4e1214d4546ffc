//! Observation session catalogue for astrophotography
//!
//! A single-user log of imaging sessions: which object was shot through
//! which telescope, camera and filter, for how long, and under what moon.
//! Storage is a local SQLite file managed through Diesel; aggregation,
//! ephemeris and export logic live in their own modules and are driven by
//! the command layer.

pub mod astro;
pub mod backup;
pub mod commands;
pub mod db;
pub mod error;
pub mod export;
pub mod lookup;
pub mod settings;
pub mod state;
pub mod stats;

pub use error::{Error, Result};
pub use state::AppState;
