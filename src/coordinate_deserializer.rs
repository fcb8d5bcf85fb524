use crate::domain::{Coordinate, ReferencePoint};
use serde::de::Error;
use serde::{Deserialize, Deserializer};

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Debug, Deserialize)]
        pub struct Inner {
            latitude: f64,
            longitude: f64,
        }

        let inner = Inner::deserialize(deserializer)?;
        Coordinate::new(inner.latitude, inner.longitude).map_err(Error::custom)
    }
}

impl<'de> Deserialize<'de> for ReferencePoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Debug, Deserialize)]
        pub struct Inner {
            latitude: f64,
            longitude: f64,
            radius_m: f64,
        }

        let inner = Inner::deserialize(deserializer)?;
        let point = Coordinate::new(inner.latitude, inner.longitude).map_err(Error::custom)?;
        ReferencePoint::new(point, inner.radius_m).map_err(Error::custom)
    }
}
