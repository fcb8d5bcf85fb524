use crate::domain::{Coordinate, ReferencePoint};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two coordinates using the haversine formula.
/// See https://en.wikipedia.org/wiki/Haversine_formula.
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();

    // Absolute deltas keep the result bit-for-bit symmetric
    let dlat = (lat2 - lat1).abs();
    let dlon = (b.longitude().to_radians() - a.longitude().to_radians()).abs();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Returns true if `user` lies within the radius of the reference point, boundary included.
pub fn is_within_radius(user: &Coordinate, reference: &ReferencePoint) -> bool {
    distance_meters(user, reference.point()) <= reference.radius_m()
}
