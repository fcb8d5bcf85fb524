mod evaluator;
mod location;

pub use evaluator::{distance_meters, is_within_radius};
pub use location::{LocationError, LocationProvider, PermissionStatus, RawPosition, fetch_current_location};
