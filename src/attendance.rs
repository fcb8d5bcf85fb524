use crate::app_config::AppConfig;
use crate::biometric::{BiometricAuthenticator, BiometricPrompt};
use crate::domain::{AttendeeDetails, ReferencePoint};
use crate::geo::{LocationProvider, fetch_current_location};
use crate::notification::Notification;
use crate::session::{
    AttendanceSession, BiometricTransition, Confirmation, GateFailure, LocationFailure, LocationResolution, Phase, ScanDecision,
};
use chrono::Local;
use tokio::sync::mpsc::Sender;
use tracing::{debug, info, instrument};

/// Drives one attendance session against the device's location services and biometric sensor.
///
/// Only one collaborator call is ever outstanding because every entry point takes `&mut self`. Dropping the
/// driver abandons the session together with whatever it was waiting for.
#[derive(Debug)]
pub struct Attendance<L, B> {
    session: AttendanceSession,
    reference: ReferencePoint,
    prompt: BiometricPrompt,
    attendee: AttendeeDetails,
    location_provider: L,
    authenticator: B,
    tx: Sender<Notification>,
}

impl<L, B> Attendance<L, B>
where
    L: LocationProvider,
    B: BiometricAuthenticator,
{
    pub fn new(config: &AppConfig, location_provider: L, authenticator: B, tx: Sender<Notification>) -> Self {
        Attendance {
            session: AttendanceSession::new(config.attendance().max_failed_attempts()),
            reference: *config.reference(),
            prompt: config.attendance().biometric_prompt(),
            attendee: config.attendee().clone(),
            location_provider,
            authenticator,
            tx,
        }
    }

    pub fn session(&self) -> &AttendanceSession {
        &self.session
    }

    /// Starts the session and resolves the location once.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Phase {
        if self.session.start() {
            self.resolve_location().await;
        }
        self.session.phase().clone()
    }

    /// Fetches the location again, e.g. after the user enabled location services.
    #[instrument(skip(self))]
    pub async fn refresh_location(&mut self) -> Phase {
        if self.session.begin_location_fetch() {
            self.resolve_location().await;
        } else {
            debug!(phase = ?self.session.phase(), "📍 Location refresh not possible");
        }
        self.session.phase().clone()
    }

    async fn resolve_location(&mut self) {
        info!("📍 Resolving location...");
        let result = fetch_current_location(&self.location_provider).await;

        match self.session.resolve_location(result, &self.reference) {
            LocationResolution::Known {
                within_radius: false,
                distance_m,
                ..
            } => {
                self.notify(Notification::OutsideRadiusWarning {
                    distance_m,
                    radius_m: self.reference.radius_m(),
                })
                .await;
            }
            LocationResolution::Known { .. } | LocationResolution::Discarded => {}
            LocationResolution::Unknown(LocationFailure::PermissionDenied) => self.notify(Notification::PermissionDenied).await,
            LocationResolution::Unknown(LocationFailure::SensorError(reason)) => self.notify(Notification::SensorError { reason }).await,
        }
    }

    /// Checks the location gate and, when it passes, asks for the fingerprint.
    #[instrument(skip(self))]
    pub async fn request_scan(&mut self) -> Phase {
        match self.session.request_scan(&self.reference) {
            ScanDecision::Prompt => {
                let outcome = self.authenticator.authenticate(&self.prompt).await;
                match self.session.apply_biometric_result(outcome) {
                    BiometricTransition::Authenticated => self.confirm().await,
                    BiometricTransition::Failed { reason } => self.notify(Notification::BiometricFailure { reason }).await,
                    BiometricTransition::Discarded => {}
                }
            }
            ScanDecision::Denied { failure, attempts, locked } => {
                let notification = match failure {
                    GateFailure::LocationUnavailable => Notification::LocationUnavailable,
                    GateFailure::OutOfRadius { distance_m, radius_m } => Notification::OutOfRadius { distance_m, radius_m },
                };
                self.notify(notification).await;

                if locked {
                    self.notify(Notification::AttemptsExhausted { attempts }).await;
                    self.report().await;
                }
            }
            ScanDecision::Ignored | ScanDecision::Rejected | ScanDecision::AlreadyAuthenticated => {}
        }
        self.session.phase().clone()
    }

    /// Marks attendance and shows the card. Safe to call any number of times.
    #[instrument(skip(self))]
    pub async fn confirm(&mut self) {
        match self.session.confirm(&self.attendee, Local::now()) {
            Confirmation::Issued(record) => self.notify(Notification::AttendanceConfirmed(record)).await,
            Confirmation::AlreadyIssued => self.notify(Notification::CardShown).await,
            Confirmation::NotAuthenticated => debug!("✅ Nothing to confirm, not authenticated"),
        }
    }

    pub async fn dismiss(&mut self) {
        if self.session.dismiss_card() {
            self.notify(Notification::CardDismissed).await;
        }
    }

    /// Reports the user after the failed attempts are exhausted. Fires at most once per session.
    pub async fn report(&mut self) {
        if self.session.mark_reported() {
            info!(state_code = self.attendee.state_code, "🚨 Reporting '{}' for repeated failed attempts", self.attendee.name);
            self.notify(Notification::Reported).await;
        }
    }

    async fn notify(&self, notification: Notification) {
        if let Err(e) = self.tx.send(notification).await {
            debug!("🔔 Notification dropped, nobody is listening: {:?}", e.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use crate::biometric::BiometricOutcome;
    use crate::geo::{LocationError, PermissionStatus, RawPosition};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use test_log::test;
    use tokio::sync::mpsc;
    use tokio::sync::mpsc::Receiver;

    const CDS_LATITUDE: f64 = 9.0716717;
    const CDS_LONGITUDE: f64 = 7.3593017;

    #[derive(Debug, Clone)]
    struct StubLocation {
        permission: PermissionStatus,
        positions: Arc<Mutex<Vec<Result<RawPosition, LocationError>>>>,
    }

    impl StubLocation {
        fn at(latitude: f64, longitude: f64) -> Self {
            Self::with_results(PermissionStatus::Granted, vec![Ok(RawPosition::new(latitude, longitude))])
        }

        /// Results are handed out in order, the last one repeats.
        fn with_results(permission: PermissionStatus, mut results: Vec<Result<RawPosition, LocationError>>) -> Self {
            results.reverse();
            StubLocation {
                permission,
                positions: Arc::new(Mutex::new(results)),
            }
        }
    }

    #[async_trait]
    impl LocationProvider for StubLocation {
        async fn request_foreground_permission(&self) -> PermissionStatus {
            self.permission
        }

        async fn current_position(&self) -> Result<RawPosition, LocationError> {
            let mut positions = self.positions.lock().unwrap();
            if positions.len() > 1 {
                positions.pop().unwrap()
            } else {
                positions[0].clone()
            }
        }
    }

    #[derive(Debug, Clone)]
    struct StubAuthenticator {
        outcome: BiometricOutcome,
        prompts: Arc<AtomicUsize>,
    }

    impl StubAuthenticator {
        fn new(outcome: BiometricOutcome) -> Self {
            StubAuthenticator {
                outcome,
                prompts: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl BiometricAuthenticator for StubAuthenticator {
        async fn authenticate(&self, prompt: &BiometricPrompt) -> BiometricOutcome {
            assert_eq!(prompt, &BiometricPrompt::default());
            self.prompts.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn attendance(
        location: StubLocation,
        authenticator: StubAuthenticator,
    ) -> (Attendance<StubLocation, StubAuthenticator>, Receiver<Notification>) {
        let (tx, rx) = mpsc::channel::<Notification>(32);
        let config = AppConfigBuilder::new().build();
        (Attendance::new(&config, location, authenticator, tx), rx)
    }

    fn drain(rx: &mut Receiver<Notification>) -> Vec<Notification> {
        let mut notifications = Vec::new();
        while let Ok(notification) = rx.try_recv() {
            notifications.push(notification);
        }
        notifications
    }

    #[test(tokio::test)]
    async fn confirms_attendance_within_radius() {
        let authenticator = StubAuthenticator::new(BiometricOutcome::Success);
        let (mut attendance, mut rx) = attendance(StubLocation::at(CDS_LATITUDE + 0.001, CDS_LONGITUDE), authenticator.clone());

        assert!(matches!(attendance.start().await, Phase::LocationKnown(_)));
        assert_eq!(attendance.request_scan().await, Phase::Confirmed);

        let notifications = drain(&mut rx);
        assert_eq!(notifications.len(), 1);
        let Notification::AttendanceConfirmed(record) = &notifications[0] else {
            panic!("expected a confirmation, got {:?}", notifications);
        };
        assert_eq!(record.attendee().name, "John Doe");
        assert!(attendance.session().is_authenticated());
        assert_eq!(authenticator.prompts.load(Ordering::SeqCst), 1);
    }

    #[test(tokio::test)]
    async fn confirm_is_idempotent() {
        let (mut attendance, mut rx) = attendance(
            StubLocation::at(CDS_LATITUDE, CDS_LONGITUDE),
            StubAuthenticator::new(BiometricOutcome::Success),
        );
        attendance.start().await;
        attendance.request_scan().await;
        let record = attendance.session().record().cloned();

        attendance.confirm().await;
        attendance.confirm().await;

        let notifications = drain(&mut rx);
        let confirmations = notifications.iter().filter(|n| matches!(n, Notification::AttendanceConfirmed(_))).count();
        assert_eq!(confirmations, 1);
        assert_eq!(notifications.last(), Some(&Notification::CardShown));
        assert_eq!(attendance.session().record().cloned(), record);
        assert_eq!(attendance.session().phase(), &Phase::Confirmed);
    }

    #[test(tokio::test)]
    async fn warns_when_the_location_resolves_outside_the_radius() {
        let (mut attendance, mut rx) = attendance(
            StubLocation::at(CDS_LATITUDE + 1.0, CDS_LONGITUDE),
            StubAuthenticator::new(BiometricOutcome::Success),
        );

        attendance.start().await;

        assert!(matches!(drain(&mut rx).as_slice(), [Notification::OutsideRadiusWarning { radius_m, .. }] if *radius_m == 400.0));
    }

    #[test(tokio::test)]
    async fn locks_and_reports_once_after_four_out_of_radius_scans() {
        let authenticator = StubAuthenticator::new(BiometricOutcome::Success);
        let (mut attendance, mut rx) = attendance(StubLocation::at(CDS_LATITUDE + 1.0, CDS_LONGITUDE), authenticator.clone());
        attendance.start().await;
        drain(&mut rx);

        for _ in 0..3 {
            attendance.request_scan().await;
        }
        assert_eq!(attendance.request_scan().await, Phase::Locked);

        let notifications = drain(&mut rx);
        assert_eq!(notifications.iter().filter(|n| matches!(n, Notification::OutOfRadius { .. })).count(), 4);
        assert_eq!(&notifications[4..], &[Notification::AttemptsExhausted { attempts: 4 }, Notification::Reported]);

        // A fifth request is rejected without side effects
        assert_eq!(attendance.request_scan().await, Phase::Locked);
        attendance.report().await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(attendance.session().failed_attempts(), 4);
        assert_eq!(authenticator.prompts.load(Ordering::SeqCst), 0);
    }

    #[test(tokio::test)]
    async fn honours_the_configured_attempt_limit() {
        let (tx, mut rx) = mpsc::channel::<Notification>(32);
        let config = AppConfigBuilder::new().max_failed_attempts(2).build();
        let location = StubLocation::with_results(PermissionStatus::Denied, vec![Err(LocationError::PermissionDenied)]);
        let mut attendance = Attendance::new(&config, location, StubAuthenticator::new(BiometricOutcome::Success), tx);
        attendance.start().await;

        assert!(matches!(attendance.request_scan().await, Phase::LocationUnknown(_)));
        assert_eq!(attendance.request_scan().await, Phase::Locked);

        let notifications = drain(&mut rx);
        assert_eq!(notifications.last(), Some(&Notification::Reported));
        assert!(attendance.session().is_reported());
    }

    #[test(tokio::test)]
    async fn a_failed_fingerprint_does_not_count_as_a_failed_attempt() {
        let authenticator = StubAuthenticator::new(BiometricOutcome::Failure {
            reason: "no match".to_string(),
        });
        let (mut attendance, mut rx) = attendance(StubLocation::at(CDS_LATITUDE, CDS_LONGITUDE), authenticator.clone());
        attendance.start().await;

        for _ in 0..5 {
            assert!(matches!(attendance.request_scan().await, Phase::LocationKnown(_)));
        }

        assert_eq!(drain(&mut rx).len(), 5);
        assert_eq!(attendance.session().failed_attempts(), 0);
        assert!(!attendance.session().is_locked());
        assert_eq!(authenticator.prompts.load(Ordering::SeqCst), 5);
    }

    #[test(tokio::test)]
    async fn surfaces_a_denied_permission_and_blocks_the_scan() {
        let location = StubLocation::with_results(PermissionStatus::Denied, vec![Ok(RawPosition::new(CDS_LATITUDE, CDS_LONGITUDE))]);
        let (mut attendance, mut rx) = attendance(location, StubAuthenticator::new(BiometricOutcome::Success));

        attendance.start().await;
        attendance.request_scan().await;

        assert_eq!(drain(&mut rx), vec![Notification::PermissionDenied, Notification::LocationUnavailable]);
        assert_eq!(attendance.session().failed_attempts(), 1);
        assert!(!attendance.session().is_authenticated());
    }

    #[test(tokio::test)]
    async fn recovers_after_a_location_retry() {
        let location = StubLocation::with_results(
            PermissionStatus::Granted,
            vec![
                Err(LocationError::SensorUnavailable("no fix".to_string())),
                Ok(RawPosition::new(CDS_LATITUDE, CDS_LONGITUDE)),
            ],
        );
        let (mut attendance, mut rx) = attendance(location, StubAuthenticator::new(BiometricOutcome::Success));

        assert!(matches!(attendance.start().await, Phase::LocationUnknown(LocationFailure::SensorError(_))));
        assert!(matches!(drain(&mut rx).as_slice(), [Notification::SensorError { .. }]));

        assert!(matches!(attendance.refresh_location().await, Phase::LocationKnown(_)));
        assert_eq!(attendance.request_scan().await, Phase::Confirmed);
    }

    #[test(tokio::test)]
    async fn dismissing_the_card_notifies_once() {
        let (mut attendance, mut rx) = attendance(
            StubLocation::at(CDS_LATITUDE, CDS_LONGITUDE),
            StubAuthenticator::new(BiometricOutcome::Success),
        );
        attendance.start().await;
        attendance.request_scan().await;
        drain(&mut rx);

        attendance.dismiss().await;
        attendance.dismiss().await;

        assert_eq!(drain(&mut rx), vec![Notification::CardDismissed]);
        assert!(!attendance.session().is_card_visible());
    }

    #[test(tokio::test)]
    async fn keeps_running_without_a_listener() {
        let (mut attendance, rx) = attendance(
            StubLocation::at(CDS_LATITUDE + 1.0, CDS_LONGITUDE),
            StubAuthenticator::new(BiometricOutcome::Success),
        );
        drop(rx);

        attendance.start().await;

        assert!(matches!(attendance.request_scan().await, Phase::LocationKnown(_)));
        assert_eq!(attendance.session().failed_attempts(), 1);
    }
}
