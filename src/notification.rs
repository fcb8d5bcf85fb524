use crate::domain::AttendanceRecord;

/// Everything the attendance flow wants to tell the user.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    PermissionDenied,
    SensorError { reason: String },
    /// Raised right after the location resolves, before any scan is attempted.
    OutsideRadiusWarning { distance_m: f64, radius_m: f64 },
    LocationUnavailable,
    OutOfRadius { distance_m: f64, radius_m: f64 },
    BiometricFailure { reason: String },
    AttemptsExhausted { attempts: u32 },
    Reported,
    AttendanceConfirmed(AttendanceRecord),
    CardShown,
    CardDismissed,
}

impl Notification {
    pub fn is_alert(&self) -> bool {
        !matches!(self, Notification::AttendanceConfirmed(_) | Notification::CardShown | Notification::CardDismissed)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Notification::PermissionDenied | Notification::SensorError { .. } => "Location Error",
            Notification::LocationUnavailable | Notification::OutOfRadius { .. } => "Location Error",
            Notification::OutsideRadiusWarning { .. } | Notification::AttemptsExhausted { .. } => "Warning",
            Notification::BiometricFailure { .. } => "Fingerprint Scan Failed",
            Notification::Reported => "Reported",
            Notification::AttendanceConfirmed(_) => "Attendance Confirmed",
            Notification::CardShown | Notification::CardDismissed => "Attendance",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notification::PermissionDenied => "Location permission not granted. Please enable location services.".to_string(),
            Notification::SensorError { reason } => {
                format!("An error occurred while fetching location ({}). Please try again later.", reason)
            }
            Notification::OutsideRadiusWarning { distance_m, radius_m } => {
                format!("You are outside the specified radius: {:.0} m away, {:.0} m allowed.", distance_m, radius_m)
            }
            Notification::LocationUnavailable => {
                "Location information is unavailable. Please make sure location services are enabled and try again.".to_string()
            }
            Notification::OutOfRadius { distance_m, .. } => format!(
                "You must be within CDS location to proceed with the fingerprint scan. You are {:.0} m away.",
                distance_m
            ),
            Notification::BiometricFailure { reason } => format!(
                "We were unable to verify your identity using the fingerprint scan ({}). Please make sure your fingerprint is properly placed on the sensor and try again.",
                reason
            ),
            Notification::AttemptsExhausted { attempts } => format!(
                "You have been reported for {} failed attempts. Further attempts are disabled. Please ensure you are at CDS location.",
                attempts
            ),
            Notification::Reported => "You have been reported for fraudulent attempts. Disciplinary action may be taken.".to_string(),
            Notification::AttendanceConfirmed(record) => {
                let attendee = record.attendee();
                format!(
                    "{} ({}, call-up {}) marked present at {} on {}. Total attendance: {} ({}).",
                    attendee.name,
                    attendee.state_code,
                    attendee.callup_number,
                    attendee.cds_name,
                    record.display_date(),
                    attendee.total_attendance,
                    attendee.attendance_band()
                )
            }
            Notification::CardShown => "Showing the attendance card.".to_string(),
            Notification::CardDismissed => "Attendance card dismissed.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttendeeDetails;
    use chrono::{Local, TimeZone};
    use rstest::rstest;

    #[rstest]
    #[case(Notification::PermissionDenied, true)]
    #[case(Notification::OutOfRadius { distance_m: 500.0, radius_m: 400.0 }, true)]
    #[case(Notification::Reported, true)]
    #[case(Notification::CardShown, false)]
    #[case(Notification::CardDismissed, false)]
    fn classifies_alerts(#[case] notification: Notification, #[case] expected: bool) {
        assert_eq!(notification.is_alert(), expected);
    }

    #[test]
    fn describes_a_confirmed_attendance() {
        let attendee = AttendeeDetails {
            state_code: "NYSC123456".to_string(),
            name: "John Doe".to_string(),
            callup_number: "ABCD123456".to_string(),
            cds_name: "Community Development Service".to_string(),
            total_attendance: 72,
        };
        let record = AttendanceRecord::new(attendee, Local.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap(), 111.0);

        let notification = Notification::AttendanceConfirmed(record);

        assert!(!notification.is_alert());
        assert_eq!(
            notification.message(),
            "John Doe (NYSC123456, call-up ABCD123456) marked present at Community Development Service on 20 February 2024. Total attendance: 72 (green)."
        );
    }

    #[test]
    fn describes_an_out_of_radius_scan() {
        let notification = Notification::OutOfRadius {
            distance_m: 111_194.9,
            radius_m: 400.0,
        };

        assert_eq!(notification.title(), "Location Error");
        assert!(notification.message().contains("111195 m away"));
    }
}
