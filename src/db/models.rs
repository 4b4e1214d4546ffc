//! Database models for the observation log
//!
//! These structs map to the database tables defined in schema.rs

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::schema::*;

// ============================================================================
// Object
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = objects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AstroObject {
    pub id: i32,
    pub name: String,
    /// Right ascension in decimal hours (0-24)
    pub ra_hours: Option<f64>,
    /// Declination in decimal degrees (-90 to +90)
    pub dec_degrees: Option<f64>,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = objects)]
pub struct NewAstroObject {
    pub name: String,
    pub ra_hours: Option<f64>,
    pub dec_degrees: Option<f64>,
}

#[derive(Debug, Clone, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = objects)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateAstroObject {
    pub name: String,
    pub ra_hours: Option<f64>,
    pub dec_degrees: Option<f64>,
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Session {
    pub id: i32,
    pub name: String,
    /// The evening the session began; data captured after local midnight
    /// still belongs to this date by convention.
    pub start_date: NaiveDate,
    pub moon_illumination: Option<f64>,
    pub moon_ra_deg: Option<f64>,
    pub moon_dec_deg: Option<f64>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = sessions)]
pub struct NewSession {
    pub name: String,
    pub start_date: NaiveDate,
    pub moon_illumination: Option<f64>,
    pub moon_ra_deg: Option<f64>,
    pub moon_dec_deg: Option<f64>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = sessions)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateSession {
    pub name: String,
    pub start_date: NaiveDate,
    pub moon_illumination: Option<f64>,
    pub moon_ra_deg: Option<f64>,
    pub moon_dec_deg: Option<f64>,
    pub comments: Option<String>,
}

// ============================================================================
// Camera
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = cameras)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Camera {
    pub id: i32,
    pub name: String,
    pub sensor: String,
    /// Pixel size in micrometers
    pub pixel_size: f64,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = cameras)]
pub struct NewCamera {
    pub name: String,
    pub sensor: String,
    pub pixel_size: f64,
    pub width: i32,
    pub height: i32,
}

// ============================================================================
// FilterType
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = filter_types)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FilterType {
    pub id: i32,
    pub name: String,
    pub priority: i32,
}

#[derive(Debug, Clone, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = filter_types)]
pub struct NewFilterType {
    pub name: String,
    pub priority: i32,
}

// ============================================================================
// Filter
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = filters)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Filter {
    pub id: i32,
    pub name: String,
    pub filter_type_id: i32,
}

#[derive(Debug, Clone, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = filters)]
pub struct NewFilter {
    pub name: String,
    pub filter_type_id: i32,
}

// ============================================================================
// Telescope
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = telescopes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Telescope {
    pub id: i32,
    pub name: String,
    /// Aperture in millimeters
    pub aperture: i32,
    /// Focal length in millimeters
    pub focal_length: i32,
    /// Derived focal_length / aperture, one decimal place
    pub f_ratio: f64,
}

#[derive(Debug, Clone, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = telescopes)]
pub struct NewTelescope {
    pub name: String,
    pub aperture: i32,
    pub focal_length: i32,
    pub f_ratio: f64,
}

// ============================================================================
// Observation
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = observations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Observation {
    pub id: i32,
    pub session_id: i32,
    pub object_id: i32,
    pub camera_id: i32,
    pub telescope_id: i32,
    pub filter_id: i32,
    pub image_count: i32,
    /// Exposure length per image, in seconds
    pub exposure_length: f64,
    /// Derived image_count * exposure_length, in seconds
    pub total_exposure: f64,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = observations)]
#[diesel(treat_none_as_null = true)]
pub struct NewObservation {
    pub session_id: i32,
    pub object_id: i32,
    pub camera_id: i32,
    pub telescope_id: i32,
    pub filter_id: i32,
    pub image_count: i32,
    pub exposure_length: f64,
    pub total_exposure: f64,
    pub comments: Option<String>,
}

/// One observation joined with the display names of everything it references.
/// This is the row shape shown on screen and fed to the export renderers.
#[derive(Debug, Clone, Queryable, Serialize, Deserialize)]
pub struct ObservationDetail {
    pub id: i32,
    pub session_name: String,
    pub object_name: String,
    pub camera_name: String,
    pub telescope_name: String,
    pub filter_name: String,
    pub image_count: i32,
    pub exposure_length: f64,
    pub total_exposure: f64,
    pub comments: Option<String>,
}

/// One observation annotated for the aggregation engine: object display
/// name, filter type name, session start date and derived total exposure.
#[derive(Debug, Clone, Queryable, Serialize, Deserialize)]
pub struct ObservationFact {
    pub object_name: String,
    pub filter_type: String,
    pub start_date: NaiveDate,
    pub total_exposure: f64,
}
