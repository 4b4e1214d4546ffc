//! Repository functions for database CRUD operations

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::models::*;
use super::schema::*;

// ============================================================================
// Object Repository
// ============================================================================

pub fn get_objects(conn: &mut SqliteConnection) -> QueryResult<Vec<AstroObject>> {
    objects::table.order(objects::id.asc()).load(conn)
}

pub fn get_object_by_id(
    conn: &mut SqliteConnection,
    object_id: i32,
) -> QueryResult<Option<AstroObject>> {
    objects::table
        .filter(objects::id.eq(object_id))
        .first(conn)
        .optional()
}

pub fn create_object(
    conn: &mut SqliteConnection,
    new_object: &NewAstroObject,
) -> QueryResult<AstroObject> {
    diesel::insert_into(objects::table)
        .values(new_object)
        .execute(conn)?;

    objects::table.order(objects::id.desc()).first(conn)
}

pub fn update_object(
    conn: &mut SqliteConnection,
    object_id: i32,
    update: &UpdateAstroObject,
) -> QueryResult<AstroObject> {
    diesel::update(objects::table.filter(objects::id.eq(object_id)))
        .set(update)
        .execute(conn)?;

    objects::table.filter(objects::id.eq(object_id)).first(conn)
}

pub fn delete_object(conn: &mut SqliteConnection, object_id: i32) -> QueryResult<usize> {
    diesel::delete(objects::table.filter(objects::id.eq(object_id))).execute(conn)
}

pub fn count_observations_for_object(
    conn: &mut SqliteConnection,
    object_id: i32,
) -> QueryResult<i64> {
    observations::table
        .filter(observations::object_id.eq(object_id))
        .count()
        .get_result(conn)
}

// ============================================================================
// Session Repository
// ============================================================================

pub fn get_sessions(conn: &mut SqliteConnection) -> QueryResult<Vec<Session>> {
    sessions::table.order(sessions::id.asc()).load(conn)
}

pub fn get_session_by_id(
    conn: &mut SqliteConnection,
    session_id: i32,
) -> QueryResult<Option<Session>> {
    sessions::table
        .filter(sessions::id.eq(session_id))
        .first(conn)
        .optional()
}

/// Check whether a session name is already taken, optionally ignoring one
/// session (used when renaming).
pub fn session_name_exists(
    conn: &mut SqliteConnection,
    name: &str,
    exclude_id: Option<i32>,
) -> QueryResult<bool> {
    let count: i64 = match exclude_id {
        Some(id) => sessions::table
            .filter(sessions::name.eq(name))
            .filter(sessions::id.ne(id))
            .count()
            .get_result(conn)?,
        None => sessions::table
            .filter(sessions::name.eq(name))
            .count()
            .get_result(conn)?,
    };
    Ok(count > 0)
}

pub fn create_session(
    conn: &mut SqliteConnection,
    new_session: &NewSession,
) -> QueryResult<Session> {
    diesel::insert_into(sessions::table)
        .values(new_session)
        .execute(conn)?;

    sessions::table.order(sessions::id.desc()).first(conn)
}

pub fn update_session(
    conn: &mut SqliteConnection,
    session_id: i32,
    update: &UpdateSession,
) -> QueryResult<Session> {
    diesel::update(sessions::table.filter(sessions::id.eq(session_id)))
        .set(update)
        .execute(conn)?;

    sessions::table
        .filter(sessions::id.eq(session_id))
        .first(conn)
}

pub fn delete_session(conn: &mut SqliteConnection, session_id: i32) -> QueryResult<usize> {
    diesel::delete(sessions::table.filter(sessions::id.eq(session_id))).execute(conn)
}

pub fn count_observations_for_session(
    conn: &mut SqliteConnection,
    session_id: i32,
) -> QueryResult<i64> {
    observations::table
        .filter(observations::session_id.eq(session_id))
        .count()
        .get_result(conn)
}

// ============================================================================
// Camera Repository
// ============================================================================

pub fn get_cameras(conn: &mut SqliteConnection) -> QueryResult<Vec<Camera>> {
    cameras::table.order(cameras::id.asc()).load(conn)
}

pub fn get_camera_by_id(
    conn: &mut SqliteConnection,
    camera_id: i32,
) -> QueryResult<Option<Camera>> {
    cameras::table
        .filter(cameras::id.eq(camera_id))
        .first(conn)
        .optional()
}

pub fn create_camera(conn: &mut SqliteConnection, new_camera: &NewCamera) -> QueryResult<Camera> {
    diesel::insert_into(cameras::table)
        .values(new_camera)
        .execute(conn)?;

    cameras::table.order(cameras::id.desc()).first(conn)
}

pub fn update_camera(
    conn: &mut SqliteConnection,
    camera_id: i32,
    update: &NewCamera,
) -> QueryResult<Camera> {
    diesel::update(cameras::table.filter(cameras::id.eq(camera_id)))
        .set(update)
        .execute(conn)?;

    cameras::table.filter(cameras::id.eq(camera_id)).first(conn)
}

pub fn delete_camera(conn: &mut SqliteConnection, camera_id: i32) -> QueryResult<usize> {
    diesel::delete(cameras::table.filter(cameras::id.eq(camera_id))).execute(conn)
}

pub fn count_observations_for_camera(
    conn: &mut SqliteConnection,
    camera_id: i32,
) -> QueryResult<i64> {
    observations::table
        .filter(observations::camera_id.eq(camera_id))
        .count()
        .get_result(conn)
}

// ============================================================================
// FilterType Repository
// ============================================================================

pub fn get_filter_types(conn: &mut SqliteConnection) -> QueryResult<Vec<FilterType>> {
    filter_types::table.order(filter_types::id.asc()).load(conn)
}

pub fn get_filter_type_by_id(
    conn: &mut SqliteConnection,
    filter_type_id: i32,
) -> QueryResult<Option<FilterType>> {
    filter_types::table
        .filter(filter_types::id.eq(filter_type_id))
        .first(conn)
        .optional()
}

pub fn filter_type_name_exists(
    conn: &mut SqliteConnection,
    name: &str,
    exclude_id: Option<i32>,
) -> QueryResult<bool> {
    let count: i64 = match exclude_id {
        Some(id) => filter_types::table
            .filter(filter_types::name.eq(name))
            .filter(filter_types::id.ne(id))
            .count()
            .get_result(conn)?,
        None => filter_types::table
            .filter(filter_types::name.eq(name))
            .count()
            .get_result(conn)?,
    };
    Ok(count > 0)
}

pub fn create_filter_type(
    conn: &mut SqliteConnection,
    new_filter_type: &NewFilterType,
) -> QueryResult<FilterType> {
    diesel::insert_into(filter_types::table)
        .values(new_filter_type)
        .execute(conn)?;

    filter_types::table.order(filter_types::id.desc()).first(conn)
}

pub fn update_filter_type(
    conn: &mut SqliteConnection,
    filter_type_id: i32,
    update: &NewFilterType,
) -> QueryResult<FilterType> {
    diesel::update(filter_types::table.filter(filter_types::id.eq(filter_type_id)))
        .set(update)
        .execute(conn)?;

    filter_types::table
        .filter(filter_types::id.eq(filter_type_id))
        .first(conn)
}

pub fn delete_filter_type(
    conn: &mut SqliteConnection,
    filter_type_id: i32,
) -> QueryResult<usize> {
    diesel::delete(filter_types::table.filter(filter_types::id.eq(filter_type_id))).execute(conn)
}

/// Number of filters still referencing a filter type. A filter type cannot
/// be deleted while this is nonzero.
pub fn count_filters_for_filter_type(
    conn: &mut SqliteConnection,
    filter_type_id: i32,
) -> QueryResult<i64> {
    filters::table
        .filter(filters::filter_type_id.eq(filter_type_id))
        .count()
        .get_result(conn)
}

// ============================================================================
// Filter Repository
// ============================================================================

pub fn get_filters(conn: &mut SqliteConnection) -> QueryResult<Vec<Filter>> {
    filters::table.order(filters::id.asc()).load(conn)
}

pub fn get_filter_by_id(
    conn: &mut SqliteConnection,
    filter_id: i32,
) -> QueryResult<Option<Filter>> {
    filters::table
        .filter(filters::id.eq(filter_id))
        .first(conn)
        .optional()
}

pub fn create_filter(conn: &mut SqliteConnection, new_filter: &NewFilter) -> QueryResult<Filter> {
    diesel::insert_into(filters::table)
        .values(new_filter)
        .execute(conn)?;

    filters::table.order(filters::id.desc()).first(conn)
}

pub fn update_filter(
    conn: &mut SqliteConnection,
    filter_id: i32,
    update: &NewFilter,
) -> QueryResult<Filter> {
    diesel::update(filters::table.filter(filters::id.eq(filter_id)))
        .set(update)
        .execute(conn)?;

    filters::table.filter(filters::id.eq(filter_id)).first(conn)
}

pub fn delete_filter(conn: &mut SqliteConnection, filter_id: i32) -> QueryResult<usize> {
    diesel::delete(filters::table.filter(filters::id.eq(filter_id))).execute(conn)
}

pub fn count_observations_for_filter(
    conn: &mut SqliteConnection,
    filter_id: i32,
) -> QueryResult<i64> {
    observations::table
        .filter(observations::filter_id.eq(filter_id))
        .count()
        .get_result(conn)
}

// ============================================================================
// Telescope Repository
// ============================================================================

pub fn get_telescopes(conn: &mut SqliteConnection) -> QueryResult<Vec<Telescope>> {
    telescopes::table.order(telescopes::id.asc()).load(conn)
}

pub fn get_telescope_by_id(
    conn: &mut SqliteConnection,
    telescope_id: i32,
) -> QueryResult<Option<Telescope>> {
    telescopes::table
        .filter(telescopes::id.eq(telescope_id))
        .first(conn)
        .optional()
}

pub fn create_telescope(
    conn: &mut SqliteConnection,
    new_telescope: &NewTelescope,
) -> QueryResult<Telescope> {
    diesel::insert_into(telescopes::table)
        .values(new_telescope)
        .execute(conn)?;

    telescopes::table.order(telescopes::id.desc()).first(conn)
}

pub fn update_telescope(
    conn: &mut SqliteConnection,
    telescope_id: i32,
    update: &NewTelescope,
) -> QueryResult<Telescope> {
    diesel::update(telescopes::table.filter(telescopes::id.eq(telescope_id)))
        .set(update)
        .execute(conn)?;

    telescopes::table
        .filter(telescopes::id.eq(telescope_id))
        .first(conn)
}

pub fn delete_telescope(conn: &mut SqliteConnection, telescope_id: i32) -> QueryResult<usize> {
    diesel::delete(telescopes::table.filter(telescopes::id.eq(telescope_id))).execute(conn)
}

pub fn count_observations_for_telescope(
    conn: &mut SqliteConnection,
    telescope_id: i32,
) -> QueryResult<i64> {
    observations::table
        .filter(observations::telescope_id.eq(telescope_id))
        .count()
        .get_result(conn)
}

// ============================================================================
// Observation Repository
// ============================================================================

pub fn get_observations(conn: &mut SqliteConnection) -> QueryResult<Vec<Observation>> {
    observations::table.order(observations::id.asc()).load(conn)
}

pub fn get_observation_by_id(
    conn: &mut SqliteConnection,
    observation_id: i32,
) -> QueryResult<Option<Observation>> {
    observations::table
        .filter(observations::id.eq(observation_id))
        .first(conn)
        .optional()
}

pub fn create_observation(
    conn: &mut SqliteConnection,
    new_observation: &NewObservation,
) -> QueryResult<Observation> {
    diesel::insert_into(observations::table)
        .values(new_observation)
        .execute(conn)?;

    observations::table.order(observations::id.desc()).first(conn)
}

pub fn update_observation(
    conn: &mut SqliteConnection,
    observation_id: i32,
    update: &NewObservation,
) -> QueryResult<Observation> {
    diesel::update(observations::table.filter(observations::id.eq(observation_id)))
        .set(update)
        .execute(conn)?;

    observations::table
        .filter(observations::id.eq(observation_id))
        .first(conn)
}

pub fn delete_observation(
    conn: &mut SqliteConnection,
    observation_id: i32,
) -> QueryResult<usize> {
    diesel::delete(observations::table.filter(observations::id.eq(observation_id))).execute(conn)
}

/// Load all observations joined with the display names of the entities they
/// reference, in the column order shown on screen.
pub fn get_observation_details(
    conn: &mut SqliteConnection,
) -> QueryResult<Vec<ObservationDetail>> {
    observations::table
        .inner_join(sessions::table)
        .inner_join(objects::table)
        .inner_join(cameras::table)
        .inner_join(telescopes::table)
        .inner_join(filters::table)
        .select((
            observations::id,
            sessions::name,
            objects::name,
            cameras::name,
            telescopes::name,
            filters::name,
            observations::image_count,
            observations::exposure_length,
            observations::total_exposure,
            observations::comments,
        ))
        .order(observations::id.asc())
        .load(conn)
}

/// Load the full observation snapshot the aggregation engine consumes:
/// object name, filter type name, session start date and total exposure.
pub fn get_observation_facts(conn: &mut SqliteConnection) -> QueryResult<Vec<ObservationFact>> {
    observations::table
        .inner_join(objects::table)
        .inner_join(sessions::table)
        .inner_join(filters::table.inner_join(filter_types::table))
        .select((
            objects::name,
            filter_types::name,
            sessions::start_date,
            observations::total_exposure,
        ))
        .order(observations::id.asc())
        .load(conn)
}
