use crate::biometric::BiometricOutcome;
use crate::domain::{AttendanceRecord, AttendeeDetails, Coordinate, ReferencePoint};
use crate::geo::{LocationError, distance_meters, is_within_radius};
use crate::session::phase::{BiometricTransition, Confirmation, GateFailure, LocationFailure, LocationResolution, Phase, ScanDecision};
use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 4;

/// The state of one attendance screen. Lives as long as the screen and is never persisted.
///
/// Every transition is a method taking the outcome of an external collaborator, so the caller decides
/// when to await the location sensor or the biometric prompt and feeds the result back in.
#[derive(Debug)]
pub struct AttendanceSession {
    phase: Phase,
    location: Option<Coordinate>,
    distance_m: Option<f64>,
    failed_attempts: u32,
    max_failed_attempts: u32,
    locked: bool,
    authenticated: bool,
    confirmed: bool,
    reported: bool,
    scan_in_flight: bool,
    card_visible: bool,
    record: Option<AttendanceRecord>,
}

impl Default for AttendanceSession {
    fn default() -> Self {
        AttendanceSession::new(DEFAULT_MAX_FAILED_ATTEMPTS)
    }
}

impl AttendanceSession {
    pub fn new(max_failed_attempts: u32) -> Self {
        AttendanceSession {
            phase: Phase::Idle,
            location: None,
            distance_m: None,
            failed_attempts: 0,
            max_failed_attempts,
            locked: false,
            authenticated: false,
            confirmed: false,
            reported: false,
            scan_in_flight: false,
            card_visible: false,
            record: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn location(&self) -> Option<&Coordinate> {
        self.location.as_ref()
    }

    pub fn distance_m(&self) -> Option<f64> {
        self.distance_m
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn is_reported(&self) -> bool {
        self.reported
    }

    pub fn is_card_visible(&self) -> bool {
        self.card_visible
    }

    pub fn record(&self) -> Option<&AttendanceRecord> {
        self.record.as_ref()
    }

    /// Moves a fresh session to `LocationPending`. Returns false if the session was already started.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }

        self.phase = Phase::LocationPending;
        true
    }

    /// Starts an explicit location retry. Refused while another request is outstanding, after authentication
    /// and once the session is locked.
    pub fn begin_location_fetch(&mut self) -> bool {
        if self.locked || self.authenticated || self.scan_in_flight {
            return false;
        }

        if self.phase != Phase::Idle && !self.phase.is_scan_gate() {
            return false;
        }

        self.phase = Phase::LocationPending;
        true
    }

    pub fn resolve_location(&mut self, result: Result<Coordinate, LocationError>, reference: &ReferencePoint) -> LocationResolution {
        if self.phase != Phase::LocationPending {
            debug!(phase = ?self.phase, "📍 Discarding location result, no fetch outstanding");
            return LocationResolution::Discarded;
        }

        match result {
            Ok(coordinate) => {
                let distance_m = distance_meters(&coordinate, reference.point());
                let within_radius = is_within_radius(&coordinate, reference);

                self.location = Some(coordinate);
                self.distance_m = Some(distance_m);
                self.phase = Phase::LocationKnown(coordinate);

                info!(distance_m, within_radius, "📍 Location known");
                LocationResolution::Known {
                    coordinate,
                    distance_m,
                    within_radius,
                }
            }
            Err(error) => {
                let failure = LocationFailure::from(&error);

                self.location = None;
                self.distance_m = None;
                self.phase = Phase::LocationUnknown(failure.clone());

                warn!("📍 Location unknown: {}", error);
                LocationResolution::Unknown(failure)
            }
        }
    }

    pub fn request_scan(&mut self, reference: &ReferencePoint) -> ScanDecision {
        let coordinate = match &self.phase {
            Phase::Locked => return ScanDecision::Rejected,
            _ if self.scan_in_flight => return ScanDecision::Ignored,
            Phase::Idle | Phase::LocationPending => {
                debug!("👆 Location is still loading, ignoring scan request");
                return ScanDecision::Ignored;
            }
            Phase::ScanSucceeded | Phase::Confirmed => return ScanDecision::AlreadyAuthenticated,
            Phase::LocationUnknown(_) => return self.register_gate_failure(GateFailure::LocationUnavailable),
            Phase::LocationKnown(coordinate) => *coordinate,
        };

        let distance_m = distance_meters(&coordinate, reference.point());
        self.distance_m = Some(distance_m);

        if !is_within_radius(&coordinate, reference) {
            return self.register_gate_failure(GateFailure::OutOfRadius {
                distance_m,
                radius_m: reference.radius_m(),
            });
        }

        self.failed_attempts = 0;
        self.scan_in_flight = true;
        debug!(distance_m, "👆 Location gate passed");
        ScanDecision::Prompt
    }

    fn register_gate_failure(&mut self, failure: GateFailure) -> ScanDecision {
        self.failed_attempts = self.failed_attempts.saturating_add(1);

        if self.failed_attempts >= self.max_failed_attempts {
            self.locked = true;
            self.phase = Phase::Locked;
            warn!(attempts = self.failed_attempts, "🔒 Too many failed attempts, session locked");
        } else {
            warn!(attempts = self.failed_attempts, "⚠️ Scan request denied: {:?}", failure);
        }

        ScanDecision::Denied {
            failure,
            attempts: self.failed_attempts,
            locked: self.locked,
        }
    }

    /// Applies the result of the biometric prompt. A failed scan leaves the failed attempts untouched.
    pub fn apply_biometric_result(&mut self, outcome: BiometricOutcome) -> BiometricTransition {
        if !self.scan_in_flight {
            debug!("👆 Discarding biometric result, no prompt outstanding");
            return BiometricTransition::Discarded;
        }
        self.scan_in_flight = false;

        if !matches!(self.phase, Phase::LocationKnown(_)) {
            return BiometricTransition::Discarded;
        }

        match outcome {
            BiometricOutcome::Success => {
                self.authenticated = true;
                self.phase = Phase::ScanSucceeded;
                info!("👆 Biometric scan succeeded");
                BiometricTransition::Authenticated
            }
            BiometricOutcome::Failure { reason } => {
                warn!("👆 Biometric scan failed: {}", reason);
                BiometricTransition::Failed { reason }
            }
        }
    }

    /// Marks attendance. Only the first call after authentication issues the record, later calls show the card again.
    pub fn confirm(&mut self, attendee: &AttendeeDetails, now: DateTime<Local>) -> Confirmation {
        if !self.authenticated {
            return Confirmation::NotAuthenticated;
        }

        self.card_visible = true;
        if self.confirmed {
            return Confirmation::AlreadyIssued;
        }

        let record = AttendanceRecord::new(attendee.clone(), now, self.distance_m.unwrap_or_default());
        self.record = Some(record.clone());
        self.confirmed = true;
        self.phase = Phase::Confirmed;

        info!(state_code = attendee.state_code, "✅ Attendance confirmed for '{}'", attendee.name);
        Confirmation::Issued(record)
    }

    /// Hides the confirmation card. Returns false if it was not showing.
    pub fn dismiss_card(&mut self) -> bool {
        std::mem::replace(&mut self.card_visible, false)
    }

    /// Flags the user as reported. Only a locked session can be reported and only once.
    pub fn mark_reported(&mut self) -> bool {
        if !self.locked || self.reported {
            return false;
        }

        self.reported = true;
        true
    }
}
