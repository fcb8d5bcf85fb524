use crate::domain::Coordinate;
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// A position as the sensor reported it, before validation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawPosition {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl RawPosition {
    #[cfg(test)]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        RawPosition {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }
}

/// The device's location services.
#[async_trait]
pub trait LocationProvider: Debug + Send + Sync {
    async fn request_foreground_permission(&self) -> PermissionStatus;

    async fn current_position(&self) -> Result<RawPosition, LocationError>;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("location permission not granted")]
    PermissionDenied,
    #[error("location sensor unavailable: {0}")]
    SensorUnavailable(String),
    #[error("invalid coordinates received from location services: {0:?}")]
    InvalidCoordinates(RawPosition),
}

/// Requests the foreground location permission and, once granted, reads and validates the current position.
#[instrument(skip_all)]
pub async fn fetch_current_location<P>(provider: &P) -> Result<Coordinate, LocationError>
where
    P: LocationProvider + ?Sized,
{
    if provider.request_foreground_permission().await != PermissionStatus::Granted {
        warn!("📍 Location permission not granted");
        return Err(LocationError::PermissionDenied);
    }

    let position = provider.current_position().await?;
    let (Some(latitude), Some(longitude)) = (position.latitude, position.longitude) else {
        warn!("📍 Incomplete coordinates received from location services: {:?}", position);
        return Err(LocationError::InvalidCoordinates(position));
    };

    let coordinate = Coordinate::new(latitude, longitude).map_err(|e| {
        warn!("📍 Invalid coordinates received from location services: {}", e);
        LocationError::InvalidCoordinates(position)
    })?;

    debug!(latitude, longitude, "📍 Current location resolved");
    Ok(coordinate)
}
