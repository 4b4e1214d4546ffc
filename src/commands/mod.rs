//! Command layer invoked by the user interface and the console binary
//!
//! Commands validate input before any write, enforce referential guards,
//! and orchestrate the repository, the aggregation engine and the
//! astronomical calculations. All state is passed explicitly through
//! [`crate::state::AppState`].

pub mod catalog;
pub mod export;
pub mod maintenance;
pub mod observations;
pub mod sessions;
pub mod stats;

pub use catalog::*;
pub use export::*;
pub use maintenance::*;
pub use observations::*;
pub use sessions::*;
pub use stats::*;
