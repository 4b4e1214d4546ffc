//! Commands for the reference entities: objects, cameras, filter types,
//! filters and telescopes
//!
//! Every write is validated first; deletes are rejected while the entity is
//! still referenced.

use serde::{Deserialize, Serialize};

use crate::db::models::*;
use crate::db::repository;
use crate::error::{Error, Result};
use crate::state::AppState;

// ============================================================================
// Objects
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectInput {
    pub name: String,
    /// Right ascension in decimal hours; present iff dec_degrees is
    pub ra_hours: Option<f64>,
    pub dec_degrees: Option<f64>,
}

fn validate_object(input: &ObjectInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("object name is required"));
    }
    match (input.ra_hours, input.dec_degrees) {
        (Some(ra), Some(dec)) => {
            if !(0.0..=24.0).contains(&ra) {
                return Err(Error::validation("right ascension must be 0-24 hours"));
            }
            if !(-90.0..=90.0).contains(&dec) {
                return Err(Error::validation("declination must be -90 to +90 degrees"));
            }
        }
        (None, None) => {}
        _ => {
            return Err(Error::validation(
                "coordinates must be given as both RA and Dec, or neither",
            ))
        }
    }
    Ok(())
}

pub fn list_objects(state: &AppState) -> Result<Vec<AstroObject>> {
    let mut conn = state.db.get()?;
    Ok(repository::get_objects(&mut conn)?)
}

pub fn create_object(state: &AppState, input: ObjectInput) -> Result<AstroObject> {
    validate_object(&input)?;
    let mut conn = state.db.get()?;
    Ok(repository::create_object(
        &mut conn,
        &NewAstroObject {
            name: input.name.trim().to_string(),
            ra_hours: input.ra_hours,
            dec_degrees: input.dec_degrees,
        },
    )?)
}

pub fn update_object(state: &AppState, object_id: i32, input: ObjectInput) -> Result<AstroObject> {
    validate_object(&input)?;
    let mut conn = state.db.get()?;
    repository::get_object_by_id(&mut conn, object_id)?.ok_or(Error::NotFound {
        entity: "object",
        id: object_id,
    })?;
    Ok(repository::update_object(
        &mut conn,
        object_id,
        &UpdateAstroObject {
            name: input.name.trim().to_string(),
            ra_hours: input.ra_hours,
            dec_degrees: input.dec_degrees,
        },
    )?)
}

pub fn delete_object(state: &AppState, object_id: i32) -> Result<()> {
    let mut conn = state.db.get()?;
    let object = repository::get_object_by_id(&mut conn, object_id)?.ok_or(Error::NotFound {
        entity: "object",
        id: object_id,
    })?;
    let references = repository::count_observations_for_object(&mut conn, object_id)?;
    if references > 0 {
        return Err(Error::referenced(format!(
            "object \"{}\" is referenced by {} observation(s)",
            object.name, references
        )));
    }
    repository::delete_object(&mut conn, object_id)?;
    Ok(())
}

// ============================================================================
// Cameras
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraInput {
    pub name: String,
    pub sensor: String,
    pub pixel_size: f64,
    pub width: i32,
    pub height: i32,
}

fn validate_camera(input: &CameraInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("camera name is required"));
    }
    if input.sensor.trim().is_empty() {
        return Err(Error::validation("sensor label is required"));
    }
    if input.pixel_size <= 0.0 {
        return Err(Error::validation("pixel size must be positive"));
    }
    if input.width <= 0 || input.height <= 0 {
        return Err(Error::validation("sensor dimensions must be positive"));
    }
    Ok(())
}

fn camera_record(input: CameraInput) -> NewCamera {
    NewCamera {
        name: input.name.trim().to_string(),
        sensor: input.sensor.trim().to_string(),
        pixel_size: input.pixel_size,
        width: input.width,
        height: input.height,
    }
}

pub fn list_cameras(state: &AppState) -> Result<Vec<Camera>> {
    let mut conn = state.db.get()?;
    Ok(repository::get_cameras(&mut conn)?)
}

pub fn create_camera(state: &AppState, input: CameraInput) -> Result<Camera> {
    validate_camera(&input)?;
    let mut conn = state.db.get()?;
    Ok(repository::create_camera(&mut conn, &camera_record(input))?)
}

pub fn update_camera(state: &AppState, camera_id: i32, input: CameraInput) -> Result<Camera> {
    validate_camera(&input)?;
    let mut conn = state.db.get()?;
    repository::get_camera_by_id(&mut conn, camera_id)?.ok_or(Error::NotFound {
        entity: "camera",
        id: camera_id,
    })?;
    Ok(repository::update_camera(
        &mut conn,
        camera_id,
        &camera_record(input),
    )?)
}

pub fn delete_camera(state: &AppState, camera_id: i32) -> Result<()> {
    let mut conn = state.db.get()?;
    let camera = repository::get_camera_by_id(&mut conn, camera_id)?.ok_or(Error::NotFound {
        entity: "camera",
        id: camera_id,
    })?;
    let references = repository::count_observations_for_camera(&mut conn, camera_id)?;
    if references > 0 {
        return Err(Error::referenced(format!(
            "camera \"{}\" is referenced by {} observation(s)",
            camera.name, references
        )));
    }
    repository::delete_camera(&mut conn, camera_id)?;
    Ok(())
}

// ============================================================================
// Filter types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterTypeInput {
    pub name: String,
    pub priority: i32,
}

pub fn list_filter_types(state: &AppState) -> Result<Vec<FilterType>> {
    let mut conn = state.db.get()?;
    Ok(repository::get_filter_types(&mut conn)?)
}

pub fn create_filter_type(state: &AppState, input: FilterTypeInput) -> Result<FilterType> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("filter type name is required"));
    }
    let mut conn = state.db.get()?;
    if repository::filter_type_name_exists(&mut conn, &name, None)? {
        return Err(Error::validation(format!(
            "filter type \"{name}\" already exists"
        )));
    }
    Ok(repository::create_filter_type(
        &mut conn,
        &NewFilterType {
            name,
            priority: input.priority,
        },
    )?)
}

pub fn update_filter_type(
    state: &AppState,
    filter_type_id: i32,
    input: FilterTypeInput,
) -> Result<FilterType> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("filter type name is required"));
    }
    let mut conn = state.db.get()?;
    repository::get_filter_type_by_id(&mut conn, filter_type_id)?.ok_or(Error::NotFound {
        entity: "filter type",
        id: filter_type_id,
    })?;
    if repository::filter_type_name_exists(&mut conn, &name, Some(filter_type_id))? {
        return Err(Error::validation(format!(
            "filter type \"{name}\" already exists"
        )));
    }
    Ok(repository::update_filter_type(
        &mut conn,
        filter_type_id,
        &NewFilterType {
            name,
            priority: input.priority,
        },
    )?)
}

pub fn delete_filter_type(state: &AppState, filter_type_id: i32) -> Result<()> {
    let mut conn = state.db.get()?;
    let filter_type = repository::get_filter_type_by_id(&mut conn, filter_type_id)?.ok_or(
        Error::NotFound {
            entity: "filter type",
            id: filter_type_id,
        },
    )?;
    let references = repository::count_filters_for_filter_type(&mut conn, filter_type_id)?;
    if references > 0 {
        return Err(Error::referenced(format!(
            "filter type \"{}\" is referenced by {} filter(s)",
            filter_type.name, references
        )));
    }
    repository::delete_filter_type(&mut conn, filter_type_id)?;
    Ok(())
}

// ============================================================================
// Filters
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterInput {
    pub name: String,
    pub filter_type_id: i32,
}

fn validate_filter(conn: &mut crate::db::DbConnection, input: &FilterInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("filter name is required"));
    }
    repository::get_filter_type_by_id(conn, input.filter_type_id)?.ok_or(Error::NotFound {
        entity: "filter type",
        id: input.filter_type_id,
    })?;
    Ok(())
}

pub fn list_filters(state: &AppState) -> Result<Vec<Filter>> {
    let mut conn = state.db.get()?;
    Ok(repository::get_filters(&mut conn)?)
}

pub fn create_filter(state: &AppState, input: FilterInput) -> Result<Filter> {
    let mut conn = state.db.get()?;
    validate_filter(&mut conn, &input)?;
    Ok(repository::create_filter(
        &mut conn,
        &NewFilter {
            name: input.name.trim().to_string(),
            filter_type_id: input.filter_type_id,
        },
    )?)
}

pub fn update_filter(state: &AppState, filter_id: i32, input: FilterInput) -> Result<Filter> {
    let mut conn = state.db.get()?;
    validate_filter(&mut conn, &input)?;
    repository::get_filter_by_id(&mut conn, filter_id)?.ok_or(Error::NotFound {
        entity: "filter",
        id: filter_id,
    })?;
    Ok(repository::update_filter(
        &mut conn,
        filter_id,
        &NewFilter {
            name: input.name.trim().to_string(),
            filter_type_id: input.filter_type_id,
        },
    )?)
}

pub fn delete_filter(state: &AppState, filter_id: i32) -> Result<()> {
    let mut conn = state.db.get()?;
    let filter = repository::get_filter_by_id(&mut conn, filter_id)?.ok_or(Error::NotFound {
        entity: "filter",
        id: filter_id,
    })?;
    let references = repository::count_observations_for_filter(&mut conn, filter_id)?;
    if references > 0 {
        return Err(Error::referenced(format!(
            "filter \"{}\" is referenced by {} observation(s)",
            filter.name, references
        )));
    }
    repository::delete_filter(&mut conn, filter_id)?;
    Ok(())
}

// ============================================================================
// Telescopes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelescopeInput {
    pub name: String,
    /// Aperture in millimeters
    pub aperture: i32,
    /// Focal length in millimeters
    pub focal_length: i32,
}

/// Focal ratio derived from focal length and aperture, one decimal place.
/// Recomputed on every write; never taken from user input.
pub fn derive_f_ratio(aperture: i32, focal_length: i32) -> f64 {
    (focal_length as f64 / aperture as f64 * 10.0).round() / 10.0
}

fn validate_telescope(input: &TelescopeInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("telescope name is required"));
    }
    if input.aperture <= 0 {
        return Err(Error::validation("aperture must be positive"));
    }
    if input.focal_length <= 0 {
        return Err(Error::validation("focal length must be positive"));
    }
    Ok(())
}

fn telescope_record(input: TelescopeInput) -> NewTelescope {
    NewTelescope {
        name: input.name.trim().to_string(),
        aperture: input.aperture,
        focal_length: input.focal_length,
        f_ratio: derive_f_ratio(input.aperture, input.focal_length),
    }
}

pub fn list_telescopes(state: &AppState) -> Result<Vec<Telescope>> {
    let mut conn = state.db.get()?;
    Ok(repository::get_telescopes(&mut conn)?)
}

pub fn create_telescope(state: &AppState, input: TelescopeInput) -> Result<Telescope> {
    validate_telescope(&input)?;
    let mut conn = state.db.get()?;
    Ok(repository::create_telescope(
        &mut conn,
        &telescope_record(input),
    )?)
}

pub fn update_telescope(
    state: &AppState,
    telescope_id: i32,
    input: TelescopeInput,
) -> Result<Telescope> {
    validate_telescope(&input)?;
    let mut conn = state.db.get()?;
    repository::get_telescope_by_id(&mut conn, telescope_id)?.ok_or(Error::NotFound {
        entity: "telescope",
        id: telescope_id,
    })?;
    Ok(repository::update_telescope(
        &mut conn,
        telescope_id,
        &telescope_record(input),
    )?)
}

pub fn delete_telescope(state: &AppState, telescope_id: i32) -> Result<()> {
    let mut conn = state.db.get()?;
    let telescope =
        repository::get_telescope_by_id(&mut conn, telescope_id)?.ok_or(Error::NotFound {
            entity: "telescope",
            id: telescope_id,
        })?;
    let references = repository::count_observations_for_telescope(&mut conn, telescope_id)?;
    if references > 0 {
        return Err(Error::referenced(format!(
            "telescope \"{}\" is referenced by {} observation(s)",
            telescope.name, references
        )));
    }
    repository::delete_telescope(&mut conn, telescope_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::test_state;

    #[test]
    fn f_ratio_is_focal_length_over_aperture_to_one_decimal() {
        assert_eq!(derive_f_ratio(200, 1000), 5.0);
        assert_eq!(derive_f_ratio(150, 750), 5.0);
        assert_eq!(derive_f_ratio(80, 384), 4.8);
        assert_eq!(derive_f_ratio(90, 1250), 13.9);
    }

    #[test]
    fn telescope_f_ratio_recomputes_on_update() {
        let (_dir, state) = test_state();
        let telescope = create_telescope(
            &state,
            TelescopeInput {
                name: "Newt 200".to_string(),
                aperture: 200,
                focal_length: 1000,
            },
        )
        .unwrap();
        assert_eq!(telescope.f_ratio, 5.0);

        let telescope = update_telescope(
            &state,
            telescope.id,
            TelescopeInput {
                name: "Newt 200".to_string(),
                aperture: 200,
                focal_length: 800,
            },
        )
        .unwrap();
        assert_eq!(telescope.f_ratio, 4.0);
    }

    #[test]
    fn object_coordinates_come_in_pairs() {
        let (_dir, state) = test_state();
        let err = create_object(
            &state,
            ObjectInput {
                name: "M31".to_string(),
                ra_hours: Some(0.712),
                dec_degrees: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(list_objects(&state).unwrap().is_empty());

        let object = create_object(
            &state,
            ObjectInput {
                name: "M31".to_string(),
                ra_hours: Some(0.712),
                dec_degrees: Some(41.269),
            },
        )
        .unwrap();
        assert_eq!(object.ra_hours, Some(0.712));
    }

    #[test]
    fn object_without_coordinates_is_allowed() {
        let (_dir, state) = test_state();
        let object = create_object(
            &state,
            ObjectInput {
                name: "Barnard 33".to_string(),
                ra_hours: None,
                dec_degrees: None,
            },
        )
        .unwrap();
        assert_eq!(object.ra_hours, None);
        assert_eq!(object.dec_degrees, None);
    }

    #[test]
    fn duplicate_filter_type_names_are_rejected() {
        let (_dir, state) = test_state();
        create_filter_type(
            &state,
            FilterTypeInput {
                name: "Narrowband".to_string(),
                priority: 0,
            },
        )
        .unwrap();

        let err = create_filter_type(
            &state,
            FilterTypeInput {
                name: "Narrowband".to_string(),
                priority: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(list_filter_types(&state).unwrap().len(), 1);
    }

    #[test]
    fn referenced_filter_type_cannot_be_deleted() {
        let (_dir, state) = test_state();
        let filter_type = create_filter_type(
            &state,
            FilterTypeInput {
                name: "Broadband".to_string(),
                priority: 0,
            },
        )
        .unwrap();
        create_filter(
            &state,
            FilterInput {
                name: "Luminance".to_string(),
                filter_type_id: filter_type.id,
            },
        )
        .unwrap();

        let err = delete_filter_type(&state, filter_type.id).unwrap_err();
        assert!(matches!(err, Error::Referenced(_)));
        assert_eq!(list_filter_types(&state).unwrap().len(), 1);
    }

    #[test]
    fn filter_requires_an_existing_filter_type() {
        let (_dir, state) = test_state();
        let err = create_filter(
            &state,
            FilterInput {
                name: "Ha 7nm".to_string(),
                filter_type_id: 42,
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn camera_numeric_fields_must_be_positive() {
        let (_dir, state) = test_state();
        let err = create_camera(
            &state,
            CameraInput {
                name: "ASI2600".to_string(),
                sensor: "IMX571".to_string(),
                pixel_size: 0.0,
                width: 6248,
                height: 4176,
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(list_cameras(&state).unwrap().is_empty());
    }
}
