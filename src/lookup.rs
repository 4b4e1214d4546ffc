//! Online coordinate lookup
//!
//! Resolves an object name to equatorial coordinates with a single blocking
//! SIMBAD TAP query. Failures surface as descriptive errors and never touch
//! stored state; there is no retry policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SIMBAD_TAP_URL: &str = "https://simbad.cds.unistra.fr/simbad/sim-tap/sync";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Coordinates resolved for an object name, in the units the object editor
/// stores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCoordinates {
    /// Right ascension in decimal hours (0-24)
    pub ra_hours: f64,
    /// Declination in decimal degrees
    pub dec_degrees: f64,
}

/// Look up an object's coordinates by name.
pub fn lookup_object_coordinates(object_name: &str) -> Result<ResolvedCoordinates> {
    let name = object_name.trim();
    if name.is_empty() {
        return Err(Error::Lookup("object name is empty".to_string()));
    }

    let query = format!(
        "SELECT basic.ra, basic.dec FROM basic JOIN ident ON ident.oidref = basic.oid \
         WHERE ident.id = '{}'",
        name.replace('\'', "''")
    );

    let client = reqwest::blocking::Client::builder()
        .timeout(LOOKUP_TIMEOUT)
        .build()
        .map_err(|e| Error::Lookup(e.to_string()))?;

    let response = client
        .get(SIMBAD_TAP_URL)
        .query(&[
            ("request", "doQuery"),
            ("lang", "adql"),
            ("format", "json"),
            ("query", &query),
        ])
        .send()
        .map_err(|e| Error::Lookup(format!("SIMBAD is unreachable: {e}")))?
        .error_for_status()
        .map_err(|e| Error::Lookup(format!("SIMBAD rejected the query: {e}")))?;

    let body: serde_json::Value = response
        .json()
        .map_err(|e| Error::Lookup(format!("unexpected SIMBAD response: {e}")))?;

    parse_tap_response(&body, name)
}

fn parse_tap_response(body: &serde_json::Value, object_name: &str) -> Result<ResolvedCoordinates> {
    let row = body
        .get("data")
        .and_then(|d| d.as_array())
        .and_then(|rows| rows.first())
        .ok_or_else(|| Error::Lookup(format!("object \"{object_name}\" not found")))?;

    let ra_degrees = row
        .get(0)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| Error::Lookup(format!("no coordinates recorded for \"{object_name}\"")))?;
    let dec_degrees = row
        .get(1)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| Error::Lookup(format!("no coordinates recorded for \"{object_name}\"")))?;

    Ok(ResolvedCoordinates {
        // SIMBAD reports RA in degrees; the object editor stores hours
        ra_hours: ra_degrees / 15.0,
        dec_degrees,
    })
}
