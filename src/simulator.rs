use crate::app_config::Device;
use crate::biometric::{BiometricAuthenticator, BiometricOutcome, BiometricPrompt};
use crate::geo::{LocationError, LocationProvider, PermissionStatus, RawPosition};
use async_trait::async_trait;
use tracing::{info, instrument};

/// A device whose location services and fingerprint sensor behave as configured.
#[derive(Clone, Debug)]
pub struct SimulatedDevice {
    device: Device,
}

impl SimulatedDevice {
    pub fn new(device: Device) -> Self {
        SimulatedDevice { device }
    }
}

#[async_trait]
impl LocationProvider for SimulatedDevice {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        if self.device.permission_granted() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    async fn current_position(&self) -> Result<RawPosition, LocationError> {
        if !self.device.sensor_available() {
            return Err(LocationError::SensorUnavailable("no GPS fix".to_string()));
        }

        Ok(RawPosition {
            latitude: self.device.latitude(),
            longitude: self.device.longitude(),
        })
    }
}

#[async_trait]
impl BiometricAuthenticator for SimulatedDevice {
    #[instrument(skip_all)]
    async fn authenticate(&self, prompt: &BiometricPrompt) -> BiometricOutcome {
        info!(cancel_label = prompt.cancel_label(), allow_fallback = prompt.allow_fallback(), "👆 {}", prompt.prompt_message());

        if self.device.biometric_accepts() {
            BiometricOutcome::Success
        } else {
            BiometricOutcome::Failure {
                reason: "fingerprint not recognized".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use crate::attendance::Attendance;
    use crate::domain::Coordinate;
    use crate::geo::fetch_current_location;
    use crate::notification::Notification;
    use crate::session::{LocationFailure, Phase};
    use test_log::test;
    use tokio::sync::mpsc;

    #[test(tokio::test)]
    async fn reports_the_configured_position() {
        let config = AppConfigBuilder::new().build();
        let device = SimulatedDevice::new(config.device().clone());

        let coordinate = fetch_current_location(&device).await.unwrap();

        assert_eq!(coordinate, Coordinate::new(9.0726717, 7.3593017).unwrap());
    }

    #[test(tokio::test)]
    async fn fails_when_the_sensor_is_unavailable() {
        let config = AppConfigBuilder::new().sensor_available(false).build();
        let device = SimulatedDevice::new(config.device().clone());

        let result = fetch_current_location(&device).await;

        assert_eq!(result, Err(LocationError::SensorUnavailable("no GPS fix".to_string())));
    }

    #[test(tokio::test)]
    async fn an_unavailable_sensor_leaves_the_location_unknown() {
        let config = AppConfigBuilder::new().sensor_available(false).build();
        let device = SimulatedDevice::new(config.device().clone());
        let (tx, mut rx) = mpsc::channel::<Notification>(8);
        let mut attendance = Attendance::new(&config, device.clone(), device, tx);

        let phase = attendance.start().await;

        assert!(matches!(phase, Phase::LocationUnknown(LocationFailure::SensorError(_))));
        assert!(matches!(rx.try_recv(), Ok(Notification::SensorError { .. })));

        attendance.request_scan().await;
        assert_eq!(attendance.session().failed_attempts(), 1);
        assert_eq!(rx.try_recv(), Ok(Notification::LocationUnavailable));
    }

    #[test(tokio::test)]
    async fn accepts_the_configured_fingerprint() {
        let config = AppConfigBuilder::new().build();
        let device = SimulatedDevice::new(config.device().clone());

        let outcome = device.authenticate(&BiometricPrompt::default()).await;

        assert_eq!(outcome, BiometricOutcome::Success);
    }
}
