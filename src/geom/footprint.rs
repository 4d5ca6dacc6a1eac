use geo::{Coord, CoordsIter, LineString, Point, Polygon, Rotate, Translate};
use log::debug;

use crate::{
    Direction, Error, Footprint, FootprintConfig, GeoPoint, Result,
    geom::{Projection, UtmProjection, orbit_angle},
};

/// Build an oriented footprint around `centroid`.
///
/// The rectangle is laid out in the UTM zone of the centroid: `width_m` across
/// track on x, `length_m` along track on y, rotated by the orbit angle about
/// the origin, then moved to the projected centroid shifted by `lateral_offset_m`
/// on x. The returned ring has five vertices with the first repeated as last.
pub fn build_footprint(
    centroid: GeoPoint,
    length_m: f64,
    width_m: f64,
    direction: Direction,
    lateral_offset_m: f64,
    inclination_deg: f64,
) -> Result<Footprint> {
    if !(length_m.is_finite() && length_m > 0.0) {
        return Err(Error::InvalidGeometry(format!("footprint length must be positive, got {length_m}")))
    }
    if !(width_m.is_finite() && width_m > 0.0) {
        return Err(Error::InvalidGeometry(format!("footprint width must be positive, got {width_m}")))
    }
    if !lateral_offset_m.is_finite() {
        return Err(Error::InvalidGeometry(format!("lateral offset must be finite, got {lateral_offset_m}")))
    }

    let angle = orbit_angle(centroid.lat, inclination_deg, direction);
    let projection = UtmProjection::for_point(centroid)?;
    let center = projection.project(centroid)?;

    let ring = metric_rectangle(length_m, width_m, angle)
        .translate(center.x + lateral_offset_m, center.y)
        .exterior()
        .coords_iter()
        .map(|coord| projection.unproject(coord))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "[footprint] {direction} @ {centroid} zone={} angle={angle:.3} offset={lateral_offset_m}",
        projection.zone(),
    );

    Ok(Footprint {
        name: format!("{direction} @ {centroid}"),
        centroid,
        length_m,
        width_m,
        direction,
        orbit_angle_deg: angle,
        lateral_offset_m,
        zone: projection.zone(),
        ring,
    })
}

/// [`build_footprint`] with dimensions, direction and inclination from `config`.
#[inline]
pub fn build_footprint_with(centroid: GeoPoint, lateral_offset_m: f64, config: &FootprintConfig) -> Result<Footprint> {
    build_footprint(centroid, config.length_m, config.width_m, config.direction, lateral_offset_m, config.inclination_deg)
}

/// Origin-centered rectangle, long axis on y, rotated counter-clockwise by `angle_deg`.
fn metric_rectangle(length_m: f64, width_m: f64, angle_deg: f64) -> Polygon<f64> {
    let (dx, dy) = (width_m / 2.0, length_m / 2.0);
    let rect = Polygon::new(
        LineString::from(vec![
            Coord { x: -dx, y: -dy },
            Coord { x: dx, y: -dy },
            Coord { x: dx, y: dy },
            Coord { x: -dx, y: dy },
        ]),
        vec![],
    );
    rect.rotate_around_point(angle_deg, Point::new(0.0, 0.0))
}
