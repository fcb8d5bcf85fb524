use serde::Deserialize;
use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AttendeeDetails {
    pub state_code: String,
    pub name: String,
    pub callup_number: String,
    pub cds_name: String,
    pub total_attendance: u32,
}

impl AttendeeDetails {
    pub fn attendance_band(&self) -> AttendanceBand {
        AttendanceBand::from_total(self.total_attendance)
    }
}

/// Colour band shown next to the total attendance on the confirmation card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttendanceBand {
    Red,
    Yellow,
    Orange,
    Green,
    Unrated,
}

impl AttendanceBand {
    pub fn from_total(total_attendance: u32) -> Self {
        match total_attendance {
            0..=40 => AttendanceBand::Red,
            41..=50 => AttendanceBand::Yellow,
            51..=69 => AttendanceBand::Orange,
            70..=100 => AttendanceBand::Green,
            _ => AttendanceBand::Unrated,
        }
    }
}

impl Display for AttendanceBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AttendanceBand::Red => "red",
            AttendanceBand::Yellow => "yellow",
            AttendanceBand::Orange => "orange",
            AttendanceBand::Green => "green",
            AttendanceBand::Unrated => "black",
        };
        write!(f, "{}", name)
    }
}
