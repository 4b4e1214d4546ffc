//! Moon illumination and apparent position
//!
//! Geocentric positions come from the `astro` crate (Meeus algorithms); the
//! illuminated fraction follows from the Sun-Moon elongation and distances
//! via the phase angle and Lambert's law. Accuracy is gauge-the-sky grade,
//! not ephemeris grade.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Kilometers per astronomical unit; the solar radius vector comes back in
/// AU while the lunar distance is in km.
const AU_KM: f64 = 1.495_978_707e8;

/// Moon state at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonContext {
    /// Illuminated fraction of the visible disk, 0-100
    pub illumination_percent: f64,
    /// Apparent right ascension in degrees, 0-360
    pub ra_deg: f64,
    /// Apparent declination in degrees
    pub dec_deg: f64,
}

fn julian_day(instant: DateTime<Utc>) -> f64 {
    let day_fraction = (instant.hour() as f64
        + instant.minute() as f64 / 60.0
        + instant.second() as f64 / 3600.0)
        / 24.0;
    let date = astro::time::Date {
        year: instant.year() as i16,
        month: instant.month() as u8,
        decimal_day: instant.day() as f64 + day_fraction,
        cal_type: astro::time::CalType::Gregorian,
    };
    astro::time::julian_day(&date)
}

/// Compute the Moon's illuminated fraction and apparent equatorial position
/// for an instant.
pub fn moon_context(instant: DateTime<Utc>) -> MoonContext {
    let jd = julian_day(instant);
    let oblq = astro::ecliptic::mn_oblq_IAU(jd);

    let (moon_ecl, moon_dist_km) = astro::lunar::geocent_ecl_pos(jd);
    let (sun_ecl, sun_dist_au) = astro::sun::geocent_ecl_pos(jd);

    let moon_ra = astro::coords::asc_frm_ecl(moon_ecl.long, moon_ecl.lat, oblq);
    let moon_dec = astro::coords::dec_frm_ecl(moon_ecl.long, moon_ecl.lat, oblq);
    let sun_ra = astro::coords::asc_frm_ecl(sun_ecl.long, sun_ecl.lat, oblq);
    let sun_dec = astro::coords::dec_frm_ecl(sun_ecl.long, sun_ecl.lat, oblq);

    let elongation = astro::angle::anglr_sepr(sun_ra, sun_dec, moon_ra, moon_dec);
    let sun_dist_km = sun_dist_au * AU_KM;

    // Phase angle from the elongation triangle, then Lambert's law
    let phase_angle =
        (sun_dist_km * elongation.sin()).atan2(moon_dist_km - sun_dist_km * elongation.cos());
    let illuminated_fraction = (1.0 + phase_angle.cos()) / 2.0;

    MoonContext {
        illumination_percent: illuminated_fraction * 100.0,
        ra_deg: moon_ra.to_degrees().rem_euclid(360.0),
        dec_deg: moon_dec.to_degrees(),
    }
}

/// Moon context for a session, evaluated at local midnight at the end of
/// the evening the session began (start date + 1 day, 00:00 local time).
pub fn session_moon_context(start_date: NaiveDate) -> Result<MoonContext> {
    Ok(moon_context(session_reference_instant(start_date)?))
}

/// The reference instant for a session's moon fields, in UTC.
pub fn session_reference_instant(start_date: NaiveDate) -> Result<DateTime<Utc>> {
    let midnight = (start_date + Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::Ephemeris(format!("invalid session date {start_date}")))?;
    let local = chrono::Local
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(|| {
            Error::Ephemeris(format!("no local midnight after session date {start_date}"))
        })?;
    Ok(local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_moon_is_mostly_illuminated() {
        // Full moon on 2024-01-25
        let instant = Utc.with_ymd_and_hms(2024, 1, 25, 12, 0, 0).unwrap();
        let ctx = moon_context(instant);
        assert!(ctx.illumination_percent > 95.0, "{ctx:?}");
        assert!(ctx.illumination_percent <= 100.0, "{ctx:?}");
    }

    #[test]
    fn new_moon_is_mostly_dark() {
        // New moon on 2024-01-11
        let instant = Utc.with_ymd_and_hms(2024, 1, 11, 12, 0, 0).unwrap();
        let ctx = moon_context(instant);
        assert!(ctx.illumination_percent < 5.0, "{ctx:?}");
        assert!(ctx.illumination_percent >= 0.0, "{ctx:?}");
    }

    #[test]
    fn position_is_within_equatorial_bounds() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let ctx = moon_context(instant);
        assert!((0.0..360.0).contains(&ctx.ra_deg), "{ctx:?}");
        // Lunar declination never strays beyond roughly +/-29 degrees
        assert!(ctx.dec_deg.abs() < 30.0, "{ctx:?}");
    }

    #[test]
    fn session_instant_is_the_following_local_midnight() {
        let start = NaiveDate::from_ymd_opt(2025, 10, 28).unwrap();
        let instant = session_reference_instant(start).unwrap();
        let local = instant.with_timezone(&chrono::Local);
        assert_eq!(local.date_naive(), start + Duration::days(1));
        assert_eq!((local.hour(), local.minute()), (0, 0));
    }
}
