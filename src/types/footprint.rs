use geo::{LineString, Polygon};
use serde::Serialize;

use crate::{geom::UtmZone, types::{Direction, GeoPoint}};

/// An oriented rectangular ground footprint, built by [`crate::build_footprint`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footprint {
    pub(crate) name: String,
    pub(crate) centroid: GeoPoint,
    pub(crate) length_m: f64,
    pub(crate) width_m: f64,
    pub(crate) direction: Direction,
    pub(crate) orbit_angle_deg: f64,
    pub(crate) lateral_offset_m: f64,
    pub(crate) zone: UtmZone,
    pub(crate) ring: Vec<GeoPoint>, // 5 points, first == last
}

impl Footprint {
    #[inline] pub fn name(&self) -> &str { &self.name }
    #[inline] pub fn centroid(&self) -> GeoPoint { self.centroid }
    #[inline] pub fn length_m(&self) -> f64 { self.length_m }
    #[inline] pub fn width_m(&self) -> f64 { self.width_m }
    #[inline] pub fn direction(&self) -> Direction { self.direction }
    #[inline] pub fn orbit_angle_deg(&self) -> f64 { self.orbit_angle_deg }
    #[inline] pub fn lateral_offset_m(&self) -> f64 { self.lateral_offset_m }
    #[inline] pub fn zone(&self) -> UtmZone { self.zone }

    /// Closed ring of geodetic vertices, first point repeated as last.
    #[inline] pub fn ring(&self) -> &[GeoPoint] { &self.ring }

    /// Replace the display name, e.g. with the label from a tabular input row.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The ring as a lon/lat polygon.
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::from(self.ring.iter().map(|p| p.to_coord()).collect::<Vec<_>>()),
            vec![],
        )
    }
}
