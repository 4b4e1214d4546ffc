//! Observation commands
//!
//! An observation ties one session, object, camera, telescope and filter to
//! an image count and per-image exposure length. The total exposure is
//! derived on every write.

use serde::{Deserialize, Serialize};

use crate::db::models::*;
use crate::db::repository;
use crate::db::DbConnection;
use crate::error::{Error, Result};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationInput {
    pub session_id: i32,
    pub object_id: i32,
    pub camera_id: i32,
    pub telescope_id: i32,
    pub filter_id: i32,
    pub image_count: i32,
    /// Exposure length per image, in seconds
    pub exposure_length: f64,
    pub comments: Option<String>,
}

fn validate_observation(conn: &mut DbConnection, input: &ObservationInput) -> Result<()> {
    if input.image_count <= 0 {
        return Err(Error::validation("image count must be positive"));
    }
    if input.exposure_length <= 0.0 {
        return Err(Error::validation("exposure length must be positive"));
    }
    repository::get_session_by_id(conn, input.session_id)?.ok_or(Error::NotFound {
        entity: "session",
        id: input.session_id,
    })?;
    repository::get_object_by_id(conn, input.object_id)?.ok_or(Error::NotFound {
        entity: "object",
        id: input.object_id,
    })?;
    repository::get_camera_by_id(conn, input.camera_id)?.ok_or(Error::NotFound {
        entity: "camera",
        id: input.camera_id,
    })?;
    repository::get_telescope_by_id(conn, input.telescope_id)?.ok_or(Error::NotFound {
        entity: "telescope",
        id: input.telescope_id,
    })?;
    repository::get_filter_by_id(conn, input.filter_id)?.ok_or(Error::NotFound {
        entity: "filter",
        id: input.filter_id,
    })?;
    Ok(())
}

fn observation_record(input: ObservationInput) -> NewObservation {
    NewObservation {
        session_id: input.session_id,
        object_id: input.object_id,
        camera_id: input.camera_id,
        telescope_id: input.telescope_id,
        filter_id: input.filter_id,
        image_count: input.image_count,
        exposure_length: input.exposure_length,
        // Never taken from input
        total_exposure: input.image_count as f64 * input.exposure_length,
        comments: input
            .comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
    }
}

pub fn list_observations(state: &AppState) -> Result<Vec<Observation>> {
    let mut conn = state.db.get()?;
    Ok(repository::get_observations(&mut conn)?)
}

/// Observations joined with the display names of everything they reference,
/// the row shape shown on screen and exported.
pub fn list_observation_details(state: &AppState) -> Result<Vec<ObservationDetail>> {
    let mut conn = state.db.get()?;
    Ok(repository::get_observation_details(&mut conn)?)
}

pub fn create_observation(state: &AppState, input: ObservationInput) -> Result<Observation> {
    let mut conn = state.db.get()?;
    validate_observation(&mut conn, &input)?;
    Ok(repository::create_observation(
        &mut conn,
        &observation_record(input),
    )?)
}

pub fn update_observation(
    state: &AppState,
    observation_id: i32,
    input: ObservationInput,
) -> Result<Observation> {
    let mut conn = state.db.get()?;
    repository::get_observation_by_id(&mut conn, observation_id)?.ok_or(Error::NotFound {
        entity: "observation",
        id: observation_id,
    })?;
    validate_observation(&mut conn, &input)?;
    Ok(repository::update_observation(
        &mut conn,
        observation_id,
        &observation_record(input),
    )?)
}

pub fn delete_observation(state: &AppState, observation_id: i32) -> Result<()> {
    let mut conn = state.db.get()?;
    repository::get_observation_by_id(&mut conn, observation_id)?.ok_or(Error::NotFound {
        entity: "observation",
        id: observation_id,
    })?;
    repository::delete_observation(&mut conn, observation_id)?;
    Ok(())
}
