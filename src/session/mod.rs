mod phase;
mod session;

pub use phase::{BiometricTransition, Confirmation, GateFailure, LocationFailure, LocationResolution, Phase, ScanDecision};
pub use session::AttendanceSession;
