use crate::domain::{AttendanceRecord, Coordinate};
use crate::geo::LocationError;

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Idle,
    LocationPending,
    LocationUnknown(LocationFailure),
    LocationKnown(Coordinate),
    ScanSucceeded,
    Confirmed,
    Locked,
}

impl Phase {
    /// Phases in which a scan request is evaluated against the location gate.
    pub fn is_scan_gate(&self) -> bool {
        matches!(self, Phase::LocationUnknown(_) | Phase::LocationKnown(_))
    }
}

/// Why the location could not be resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum LocationFailure {
    PermissionDenied,
    SensorError(String),
}

impl From<&LocationError> for LocationFailure {
    fn from(error: &LocationError) -> Self {
        match error {
            LocationError::PermissionDenied => LocationFailure::PermissionDenied,
            other => LocationFailure::SensorError(other.to_string()),
        }
    }
}

/// Why a scan request did not pass the location gate.
#[derive(Clone, Debug, PartialEq)]
pub enum GateFailure {
    LocationUnavailable,
    OutOfRadius { distance_m: f64, radius_m: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScanDecision {
    /// The gate passed and the biometric prompt should be shown.
    Prompt,
    /// The location is still resolving or a prompt is already showing.
    Ignored,
    /// The session is locked.
    Rejected,
    AlreadyAuthenticated,
    Denied { failure: GateFailure, attempts: u32, locked: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub enum LocationResolution {
    Known { coordinate: Coordinate, distance_m: f64, within_radius: bool },
    Unknown(LocationFailure),
    /// The session was no longer waiting for a location.
    Discarded,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BiometricTransition {
    Authenticated,
    Failed { reason: String },
    /// No prompt was in flight.
    Discarded,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Confirmation {
    Issued(AttendanceRecord),
    AlreadyIssued,
    NotAuthenticated,
}
