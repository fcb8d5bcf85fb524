use crate::domain::AttendeeDetails;
use chrono::{DateTime, Local};

/// The read-only attendance record shown on the confirmation card.
#[derive(Clone, Debug, PartialEq)]
pub struct AttendanceRecord {
    attendee: AttendeeDetails,
    marked_at: DateTime<Local>,
    distance_m: f64,
}

impl AttendanceRecord {
    pub fn new(attendee: AttendeeDetails, marked_at: DateTime<Local>, distance_m: f64) -> Self {
        AttendanceRecord {
            attendee,
            marked_at,
            distance_m,
        }
    }

    pub fn attendee(&self) -> &AttendeeDetails {
        &self.attendee
    }

    pub fn marked_at(&self) -> DateTime<Local> {
        self.marked_at
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    /// The date as printed on the card, e.g. `20 February 2024`.
    pub fn display_date(&self) -> String {
        self.marked_at.format("%d %B %Y").to_string()
    }
}
