mod attendee;
mod coordinate;
mod record;

pub use attendee::AttendeeDetails;
pub use coordinate::{Coordinate, ReferencePoint};
pub use record::AttendanceRecord;
