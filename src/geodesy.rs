/// Mean Earth radius used for all surface distances (meters)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle surface distance in meters between two (lat, lon) pairs in degrees.
///
/// Haversine formula. No bounds checking: raw device coordinates go straight in.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
    EARTH_RADIUS_M * c
}
