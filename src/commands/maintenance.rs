//! Maintenance commands: moon recalculation and scheduled backups

use serde::{Deserialize, Serialize};

use crate::astro;
use crate::backup::{self, BackupInfo};
use crate::db::models::UpdateSession;
use crate::db::repository;
use crate::error::Result;
use crate::state::AppState;

/// Outcome of a bulk moon recalculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoonRecalcSummary {
    pub total_sessions: usize,
    pub updated_sessions: usize,
    /// One message per session whose ephemeris failed; those sessions keep
    /// their previous values
    pub errors: Vec<String>,
}

/// Recompute and store the moon context of every session. Used after the
/// illumination model changes or when old data predates the moon columns.
pub fn recalculate_moon_for_all_sessions(state: &AppState) -> Result<MoonRecalcSummary> {
    let mut conn = state.db.get()?;
    let sessions = repository::get_sessions(&mut conn)?;

    let mut summary = MoonRecalcSummary {
        total_sessions: sessions.len(),
        ..Default::default()
    };

    for session in sessions {
        let moon = match astro::session_moon_context(session.start_date) {
            Ok(moon) => moon,
            Err(err) => {
                summary
                    .errors
                    .push(format!("session \"{}\": {err}", session.name));
                continue;
            }
        };
        repository::update_session(
            &mut conn,
            session.id,
            &UpdateSession {
                name: session.name.clone(),
                start_date: session.start_date,
                moon_illumination: Some(moon.illumination_percent),
                moon_ra_deg: Some(moon.ra_deg),
                moon_dec_deg: Some(moon.dec_deg),
                comments: session.comments.clone(),
            },
        )?;
        log::debug!(
            "session \"{}\": moon illumination {:.1}%",
            session.name,
            moon.illumination_percent
        );
        summary.updated_sessions += 1;
    }

    log::info!(
        "recalculated moon context for {}/{} session(s)",
        summary.updated_sessions,
        summary.total_sessions
    );
    Ok(summary)
}

/// Create a compressed backup of the database if the newest one is at least
/// a week old. Returns the backup that was written, if any.
pub fn run_backup_check(state: &AppState) -> Result<Option<BackupInfo>> {
    backup::check_and_create_backup(&state.db_path)
}
