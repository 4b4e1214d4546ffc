//! Great-circle angular separation between equatorial coordinates

/// Convert right ascension in decimal hours (the stored object format) to
/// degrees.
pub fn hours_to_degrees(ra_hours: f64) -> f64 {
    ra_hours * 15.0
}

/// Angular separation between two equatorial positions, in degrees.
///
/// Haversine form of the great-circle distance, which stays exact at zero
/// separation where the law-of-cosines loses precision. Symmetric in its
/// arguments.
pub fn angular_separation_deg(ra1_deg: f64, dec1_deg: f64, ra2_deg: f64, dec2_deg: f64) -> f64 {
    let dec1 = dec1_deg.to_radians();
    let dec2 = dec2_deg.to_radians();
    let d_ra = (ra2_deg - ra1_deg).to_radians();
    let d_dec = dec2 - dec1;

    let h = (d_dec / 2.0).sin().powi(2) + dec1.cos() * dec2.cos() * (d_ra / 2.0).sin().powi(2);
    (2.0 * h.sqrt().min(1.0).asin()).to_degrees()
}

/// Separation between an object's stored coordinates and a session's
/// computed Moon position. Undefined (`None`) when the object has no stored
/// coordinates or the session has no moon data; presentation shows
/// "unknown" for that case.
pub fn object_moon_separation(
    object_ra_hours: Option<f64>,
    object_dec_deg: Option<f64>,
    moon_ra_deg: Option<f64>,
    moon_dec_deg: Option<f64>,
) -> Option<f64> {
    let ra = hours_to_degrees(object_ra_hours?);
    let dec = object_dec_deg?;
    Some(angular_separation_deg(ra, dec, moon_ra_deg?, moon_dec_deg?))
}
