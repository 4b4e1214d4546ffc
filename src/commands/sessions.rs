//! Session commands
//!
//! A session is one evening at the telescope. Its moon context (illuminated
//! fraction and apparent position) is computed when the session is saved and
//! stored with it, so list views never recompute ephemerides.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::astro;
use crate::db::models::*;
use crate::db::repository;
use crate::error::{Error, Result};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInput {
    pub name: String,
    /// The evening the session began
    pub start_date: NaiveDate,
    pub comments: Option<String>,
}

fn validate_session(input: &SessionInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("session name is required"));
    }
    Ok(())
}

fn normalized_comments(comments: Option<String>) -> Option<String> {
    comments
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

pub fn list_sessions(state: &AppState) -> Result<Vec<Session>> {
    let mut conn = state.db.get()?;
    Ok(repository::get_sessions(&mut conn)?)
}

pub fn get_session(state: &AppState, session_id: i32) -> Result<Session> {
    let mut conn = state.db.get()?;
    repository::get_session_by_id(&mut conn, session_id)?.ok_or(Error::NotFound {
        entity: "session",
        id: session_id,
    })
}

pub fn create_session(state: &AppState, input: SessionInput) -> Result<Session> {
    validate_session(&input)?;
    let name = input.name.trim().to_string();
    let mut conn = state.db.get()?;
    if repository::session_name_exists(&mut conn, &name, None)? {
        return Err(Error::validation(format!(
            "session \"{name}\" already exists"
        )));
    }

    let moon = astro::session_moon_context(input.start_date)?;
    Ok(repository::create_session(
        &mut conn,
        &NewSession {
            name,
            start_date: input.start_date,
            moon_illumination: Some(moon.illumination_percent),
            moon_ra_deg: Some(moon.ra_deg),
            moon_dec_deg: Some(moon.dec_deg),
            comments: normalized_comments(input.comments),
        },
    )?)
}

pub fn update_session(state: &AppState, session_id: i32, input: SessionInput) -> Result<Session> {
    validate_session(&input)?;
    let name = input.name.trim().to_string();
    let mut conn = state.db.get()?;
    repository::get_session_by_id(&mut conn, session_id)?.ok_or(Error::NotFound {
        entity: "session",
        id: session_id,
    })?;
    if repository::session_name_exists(&mut conn, &name, Some(session_id))? {
        return Err(Error::validation(format!(
            "session \"{name}\" already exists"
        )));
    }

    // The start date may have changed, so the stored moon context is
    // recomputed on every update.
    let moon = astro::session_moon_context(input.start_date)?;
    Ok(repository::update_session(
        &mut conn,
        session_id,
        &UpdateSession {
            name,
            start_date: input.start_date,
            moon_illumination: Some(moon.illumination_percent),
            moon_ra_deg: Some(moon.ra_deg),
            moon_dec_deg: Some(moon.dec_deg),
            comments: normalized_comments(input.comments),
        },
    )?)
}

pub fn delete_session(state: &AppState, session_id: i32) -> Result<()> {
    let mut conn = state.db.get()?;
    let session = repository::get_session_by_id(&mut conn, session_id)?.ok_or(Error::NotFound {
        entity: "session",
        id: session_id,
    })?;
    let references = repository::count_observations_for_session(&mut conn, session_id)?;
    if references > 0 {
        return Err(Error::referenced(format!(
            "session \"{}\" is referenced by {} observation(s)",
            session.name, references
        )));
    }
    repository::delete_session(&mut conn, session_id)?;
    Ok(())
}

/// Planning advice for shooting one object during one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionAdvice {
    pub moon_illumination: Option<f64>,
    /// Angular separation between object and Moon in degrees; `None` when
    /// either side lacks coordinates
    pub moon_separation_deg: Option<f64>,
    pub illumination_warning: bool,
    pub separation_warning: bool,
}

/// Evaluate the stored moon context of a session against one object and the
/// configured warning thresholds.
pub fn session_advice(state: &AppState, session_id: i32, object_id: i32) -> Result<SessionAdvice> {
    let mut conn = state.db.get()?;
    let session = repository::get_session_by_id(&mut conn, session_id)?.ok_or(Error::NotFound {
        entity: "session",
        id: session_id,
    })?;
    let object = repository::get_object_by_id(&mut conn, object_id)?.ok_or(Error::NotFound {
        entity: "object",
        id: object_id,
    })?;

    let separation = astro::object_moon_separation(
        object.ra_hours,
        object.dec_degrees,
        session.moon_ra_deg,
        session.moon_dec_deg,
    );

    Ok(SessionAdvice {
        moon_illumination: session.moon_illumination,
        moon_separation_deg: separation,
        illumination_warning: session
            .moon_illumination
            .is_some_and(|i| state.settings.illumination_warns(i)),
        separation_warning: separation.is_some_and(|s| state.settings.separation_warns(s)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::catalog::{create_object, ObjectInput};
    use crate::commands::testing::test_state;

    fn input(name: &str, date: NaiveDate) -> SessionInput {
        SessionInput {
            name: name.to_string(),
            start_date: date,
            comments: None,
        }
    }

    #[test]
    fn creating_a_session_stores_its_moon_context() {
        let (_dir, state) = test_state();
        let date = NaiveDate::from_ymd_opt(2024, 1, 24).unwrap();
        let session = create_session(&state, input("Full moon night", date)).unwrap();

        // Full moon on 2024-01-25; the reference instant lands right on it
        assert!(session.moon_illumination.unwrap() > 90.0);
        assert!((0.0..360.0).contains(&session.moon_ra_deg.unwrap()));
        assert!(session.moon_dec_deg.unwrap().abs() < 30.0);
    }

    #[test]
    fn changing_the_date_recomputes_the_moon_context() {
        let (_dir, state) = test_state();
        let full = NaiveDate::from_ymd_opt(2024, 1, 24).unwrap();
        let new = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let session = create_session(&state, input("Night 1", full)).unwrap();

        let updated = update_session(&state, session.id, input("Night 1", new)).unwrap();
        assert!(updated.moon_illumination.unwrap() < 5.0);
    }

    #[test]
    fn duplicate_session_names_are_rejected() {
        let (_dir, state) = test_state();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        create_session(&state, input("March new moon", date)).unwrap();

        let err = create_session(&state, input("March new moon", date)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(list_sessions(&state).unwrap().len(), 1);
    }

    #[test]
    fn renaming_to_an_existing_name_is_rejected_but_keeping_the_name_is_not() {
        let (_dir, state) = test_state();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let a = create_session(&state, input("Night A", date)).unwrap();
        create_session(&state, input("Night B", date)).unwrap();

        let err = update_session(&state, a.id, input("Night B", date)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // Updating without renaming must not collide with itself
        update_session(&state, a.id, input("Night A", date)).unwrap();
    }

    #[test]
    fn comments_can_be_cleared() {
        let (_dir, state) = test_state();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let session = create_session(
            &state,
            SessionInput {
                name: "Night A".to_string(),
                start_date: date,
                comments: Some("thin clouds".to_string()),
            },
        )
        .unwrap();
        assert_eq!(session.comments.as_deref(), Some("thin clouds"));

        let updated = update_session(&state, session.id, input("Night A", date)).unwrap();
        assert_eq!(updated.comments, None);
    }

    #[test]
    fn advice_has_no_separation_for_an_object_without_coordinates() {
        let (_dir, state) = test_state();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let session = create_session(&state, input("Night A", date)).unwrap();
        let object = create_object(
            &state,
            ObjectInput {
                name: "Barnard 33".to_string(),
                ra_hours: None,
                dec_degrees: None,
            },
        )
        .unwrap();

        let advice = session_advice(&state, session.id, object.id).unwrap();
        assert_eq!(advice.moon_separation_deg, None);
        assert!(!advice.separation_warning);
        assert!(advice.moon_illumination.is_some());
    }
}
