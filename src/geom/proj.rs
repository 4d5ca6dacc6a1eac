use std::fmt;

use geo::{Coord, MapCoords, MultiPolygon};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use serde::Serialize;

use crate::{Error, GeoPoint, Result};

const WGS84_LONGLAT: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// Forward/inverse transform between geodetic degrees and a metric plane.
pub trait Projection {
    /// Geodetic → metric (x = easting, y = northing).
    fn project(&self, point: GeoPoint) -> Result<Coord<f64>>;

    /// Metric → geodetic.
    fn unproject(&self, coord: Coord<f64>) -> Result<GeoPoint>;
}

/// A UTM zone: number 1-60 plus hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UtmZone {
    number: u8,
    north: bool,
}

impl UtmZone {
    pub fn new(number: u8, north: bool) -> Result<Self> {
        if !(1..=60).contains(&number) {
            return Err(Error::InvalidParameter(format!("UTM zone must be in 1..=60, got {number}")))
        }
        Ok(Self { number, north })
    }

    /// Zone containing `point`: `floor((lon + 180) / 6) + 1`, north when lat ≥ 0.
    /// Longitude 180 folds into zone 60.
    pub fn from_point(point: GeoPoint) -> Self {
        let number = (((point.lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8;
        Self { number, north: point.lat >= 0.0 }
    }

    #[inline] pub fn number(&self) -> u8 { self.number }
    #[inline] pub fn is_north(&self) -> bool { self.north }

    /// EPSG code of the WGS84 UTM CRS: 326zz (north) / 327zz (south).
    #[inline]
    pub fn epsg(&self) -> u32 {
        if self.north { 32600 + self.number as u32 } else { 32700 + self.number as u32 }
    }

    /// Longitude of the zone's central meridian, in degrees.
    #[inline]
    pub fn central_meridian(&self) -> f64 { self.number as f64 * 6.0 - 183.0 }

    fn proj4(&self) -> String {
        let south = if self.north { "" } else { " +south" };
        format!("+proj=utm +zone={}{south} +datum=WGS84 +units=m +no_defs +type=crs", self.number)
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, if self.north { 'N' } else { 'S' })
    }
}

/// WGS84 ⇄ UTM transform for one zone, backed by proj4rs.
pub struct UtmProjection {
    zone: UtmZone,
    geog: Proj4,
    utm: Proj4,
}

impl UtmProjection {
    pub fn new(zone: UtmZone) -> Result<Self> {
        let geog = Proj4::from_proj_string(WGS84_LONGLAT)
            .map_err(|e| Error::Projection(format!("failed to build source PROJ.4 {WGS84_LONGLAT}: {e}")))?;

        let proj_string = zone.proj4();
        let utm = Proj4::from_proj_string(&proj_string)
            .map_err(|e| Error::Projection(format!("failed to build target PROJ.4 {proj_string}: {e}")))?;

        Ok(Self { zone, geog, utm })
    }

    /// Projection for the zone containing `point`.
    #[inline]
    pub fn for_point(point: GeoPoint) -> Result<Self> { Self::new(UtmZone::from_point(point)) }

    #[inline] pub fn zone(&self) -> UtmZone { self.zone }

    /// Reproject a lon/lat geometry into this zone's metric plane.
    pub fn project_geometry(&self, geometry: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        geometry.try_map_coords(|coord| self.project(GeoPoint::from_coord(coord)))
    }

    /// Reproject a metric geometry back to lon/lat.
    pub fn unproject_geometry(&self, geometry: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        geometry.try_map_coords(|coord| self.unproject(coord).map(GeoPoint::to_coord))
    }
}

impl Projection for UtmProjection {
    fn project(&self, point: GeoPoint) -> Result<Coord<f64>> {
        // Radians in, meters out.
        let mut xyz = (point.lon.to_radians(), point.lat.to_radians(), 0.0);
        transform(&self.geog, &self.utm, &mut xyz)
            .map_err(|e| Error::Projection(format!("forward transform of {point} into zone {} failed: {e}", self.zone)))?;
        Ok(Coord { x: xyz.0, y: xyz.1 })
    }

    fn unproject(&self, coord: Coord<f64>) -> Result<GeoPoint> {
        // Meters in, radians out.
        let mut xyz = (coord.x, coord.y, 0.0);
        transform(&self.utm, &self.geog, &mut xyz)
            .map_err(|e| Error::Projection(format!("inverse transform of ({}, {}) from zone {} failed: {e}", coord.x, coord.y, self.zone)))?;
        Ok(GeoPoint::new_unchecked(xyz.1.to_degrees(), xyz.0.to_degrees()))
    }
}

impl fmt::Debug for UtmProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtmProjection").field("zone", &self.zone).finish()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn zone_from_longitude() {
        assert_eq!(UtmZone::from_point(GeoPoint::new_unchecked(51.5, -0.1278)).number(), 30);
        assert_eq!(UtmZone::from_point(GeoPoint::new_unchecked(0.0, -180.0)).number(), 1);
        assert_eq!(UtmZone::from_point(GeoPoint::new_unchecked(0.0, 180.0)).number(), 60);
        assert_eq!(UtmZone::from_point(GeoPoint::new_unchecked(-33.9, 151.2)).number(), 56);
    }

    #[test]
    fn hemisphere_and_epsg() {
        let north = UtmZone::from_point(GeoPoint::new_unchecked(0.0, 3.0));
        let south = UtmZone::from_point(GeoPoint::new_unchecked(-0.1, 3.0));
        assert!(north.is_north());
        assert!(!south.is_north());
        assert_eq!(north.epsg(), 32631);
        assert_eq!(south.epsg(), 32731);
        assert_eq!(north.to_string(), "31N");
    }

    #[test]
    fn zone_number_is_validated() {
        assert!(UtmZone::new(0, true).is_err());
        assert!(UtmZone::new(61, false).is_err());
        assert_eq!(UtmZone::new(33, true).unwrap().central_meridian(), 15.0);
    }

    #[test]
    fn central_meridian_on_equator_maps_to_false_easting() {
        let projection = UtmProjection::for_point(GeoPoint::new_unchecked(0.0, 3.0)).unwrap();
        let xy = projection.project(GeoPoint::new_unchecked(0.0, 3.0)).unwrap();
        assert_abs_diff_eq!(xy.x, 500_000.0, epsilon = 1e-3);
        assert_abs_diff_eq!(xy.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn southern_zone_uses_false_northing() {
        let point = GeoPoint::new_unchecked(-0.000001, 3.0);
        let xy = UtmProjection::for_point(point).unwrap().project(point).unwrap();
        assert_abs_diff_eq!(xy.y, 10_000_000.0, epsilon = 1.0);
    }

    #[test]
    fn round_trip_within_zone() {
        for &(lat, lon) in &[(54.9783, -1.6178), (51.5074, -0.1278), (-33.8688, 151.2093), (64.1, -21.9), (-1.3, 36.8)] {
            let point = GeoPoint::new_unchecked(lat, lon);
            let projection = UtmProjection::for_point(point).unwrap();
            let back = projection.unproject(projection.project(point).unwrap()).unwrap();
            assert_abs_diff_eq!(back.lat, lat, epsilon = 1e-6);
            assert_abs_diff_eq!(back.lon, lon, epsilon = 1e-6);
        }
    }
}
