//! Coordinate and time utilities
//!
//! Thin wrappers over the `astro` ephemeris crate: Moon illumination and
//! apparent position for an instant, and great-circle angular separation
//! between equatorial coordinates. Pure functions, no state.

pub mod moon;
pub mod separation;

pub use moon::{moon_context, session_moon_context, MoonContext};
pub use separation::{angular_separation_deg, hours_to_degrees, object_moon_separation};
