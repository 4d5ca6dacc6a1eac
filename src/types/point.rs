use std::fmt;

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A WGS84 geodetic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Construct a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(Error::MalformedInput { line: 0, reason: format!("non-finite coordinate ({lat}, {lon})") })
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(Error::MalformedInput { line: 0, reason: format!("latitude {lat} outside [-90, 90]") })
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(Error::MalformedInput { line: 0, reason: format!("longitude {lon} outside [-180, 180]") })
        }
        Ok(Self { lat, lon })
    }

    /// Construct a point from values already known to be in range.
    #[inline] pub const fn new_unchecked(lat: f64, lon: f64) -> Self { Self { lat, lon } }

    /// Lon/lat coordinate (x = longitude, y = latitude).
    #[inline] pub fn to_coord(self) -> Coord<f64> { Coord { x: self.lon, y: self.lat } }

    /// Inverse of [`GeoPoint::to_coord`]; no range check.
    #[inline] pub fn from_coord(coord: Coord<f64>) -> Self { Self { lat: coord.y, lon: coord.x } }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lon)
    }
}

/// A point of interest as supplied by the tabular loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPoint {
    pub name: String,
    pub point: GeoPoint,
}
