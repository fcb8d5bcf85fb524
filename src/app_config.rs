use crate::biometric::BiometricPrompt;
use crate::domain::{AttendeeDetails, ReferencePoint};
use config::{Config, ConfigBuilder, ConfigError};
use config::builder::DefaultState;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    reference: ReferencePoint,
    attendance: Attendance,
    attendee: AttendeeDetails,
    device: Device,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("ATTENDANCE").separator("__"));

        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.attendance.validate()?;
        Ok(config)
    }

    pub fn reference(&self) -> &ReferencePoint {
        &self.reference
    }

    pub fn attendance(&self) -> &Attendance {
        &self.attendance
    }

    pub fn attendee(&self) -> &AttendeeDetails {
        &self.attendee
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

#[derive(Debug, Deserialize)]
pub struct Attendance {
    max_failed_attempts: u32,
    prompt_message: String,
    cancel_label: String,
    allow_fallback: bool,
    notification_buffer_size: usize,
}

impl Attendance {
    pub fn max_failed_attempts(&self) -> u32 {
        self.max_failed_attempts
    }

    pub fn biometric_prompt(&self) -> BiometricPrompt {
        BiometricPrompt::new(self.prompt_message.clone(), self.cancel_label.clone(), self.allow_fallback)
    }

    pub fn notification_buffer_size(&self) -> usize {
        self.notification_buffer_size
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_failed_attempts == 0 {
            return Err(ConfigError::Message("invalid attendance.max_failed_attempts: 0, must be at least 1".to_string()));
        }

        if self.notification_buffer_size == 0 {
            return Err(ConfigError::Message("invalid attendance.notification_buffer_size: 0, must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Behaviour of the simulated device the binary runs against.
#[derive(Clone, Debug, Deserialize)]
pub struct Device {
    permission_granted: bool,
    sensor_available: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
    biometric_accepts: bool,
}

impl Device {
    pub fn permission_granted(&self) -> bool {
        self.permission_granted
    }

    pub fn sensor_available(&self) -> bool {
        self.sensor_available
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn biometric_accepts(&self) -> bool {
        self.biometric_accepts
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        use crate::domain::Coordinate;

        AppConfigBuilder {
            config: AppConfig {
                reference: ReferencePoint::new(Coordinate::new(9.0716717, 7.3593017).unwrap(), 400.0).unwrap(),
                attendance: Attendance {
                    max_failed_attempts: 4,
                    prompt_message: "Scan your fingerprint".to_string(),
                    cancel_label: "Use Password".to_string(),
                    allow_fallback: false,
                    notification_buffer_size: 32,
                },
                attendee: AttendeeDetails {
                    state_code: "NYSC123456".to_string(),
                    name: "John Doe".to_string(),
                    callup_number: "ABCD123456".to_string(),
                    cds_name: "Community Development Service".to_string(),
                    total_attendance: 30,
                },
                device: Device {
                    permission_granted: true,
                    sensor_available: true,
                    latitude: Some(9.0726717),
                    longitude: Some(7.3593017),
                    biometric_accepts: true,
                },
            },
        }
    }

    pub fn max_failed_attempts(mut self, max_failed_attempts: u32) -> Self {
        self.config.attendance.max_failed_attempts = max_failed_attempts;
        self
    }

    pub fn sensor_available(mut self, sensor_available: bool) -> Self {
        self.config.device.sensor_available = sensor_available;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
