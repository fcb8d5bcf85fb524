use thiserror::Error;

/// A point on the globe in degrees, as reported by the location sensor or configured as a reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::InvalidLatitude(latitude));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::InvalidLongitude(longitude));
        }

        Ok(Coordinate { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// The fixed location attendance is measured against, together with the radius of the eligible zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferencePoint {
    point: Coordinate,
    radius_m: f64,
}

impl ReferencePoint {
    pub fn new(point: Coordinate, radius_m: f64) -> Result<Self, CoordinateError> {
        if !radius_m.is_finite() || radius_m < 0.0 {
            return Err(CoordinateError::InvalidRadius(radius_m));
        }

        Ok(ReferencePoint { point, radius_m })
    }

    pub fn point(&self) -> &Coordinate {
        &self.point
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CoordinateError {
    #[error("invalid latitude: {0}, must be between -90 and 90")]
    InvalidLatitude(f64),
    #[error("invalid longitude: {0}, must be between -180 and 180")]
    InvalidLongitude(f64),
    #[error("invalid radius: {0}, must be a finite number of meters >= 0")]
    InvalidRadius(f64),
}
