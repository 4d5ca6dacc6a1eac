use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile as shp;

/// Convert a shapefile polygon into a geo MultiPolygon.
/// Shapefile stores each outer ring followed by its holes.
pub(crate) fn shp_to_geo(p: &shp::Polygon) -> MultiPolygon<f64> {
    /// Collect ring points into a closed LineString.
    fn ring(points: &[shp::Point]) -> LineString<f64> {
        let mut ring = LineString::from(points.iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect::<Vec<_>>());
        ring.close();
        ring
    }

    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes: Vec<LineString<f64>> = Vec::new();

    for r in p.rings() {
        match r {
            shp::PolygonRing::Outer(points) => {
                if let Some(previous) = exterior.replace(ring(points)) {
                    polygons.push(Polygon::new(previous, std::mem::take(&mut holes)));
                }
            }
            shp::PolygonRing::Inner(points) => holes.push(ring(points)),
        }
    }
    if let Some(last) = exterior {
        polygons.push(Polygon::new(last, holes));
    }

    MultiPolygon(polygons)
}

/// Convert a geo MultiPolygon into a shapefile polygon.
/// `with_rings` reorders points to the clockwise-outer / counter-clockwise-inner convention.
pub(crate) fn geo_to_shp(mp: &MultiPolygon<f64>) -> shp::Polygon {
    fn points(ring: &LineString<f64>) -> Vec<shp::Point> {
        ring.coords().map(|c| shp::Point { x: c.x, y: c.y }).collect()
    }

    let rings = mp.0.iter()
        .flat_map(|polygon| {
            std::iter::once(shp::PolygonRing::Outer(points(polygon.exterior())))
                .chain(polygon.interiors().iter().map(|hole| shp::PolygonRing::Inner(points(hole))))
        })
        .collect::<Vec<_>>();

    shp::Polygon::with_rings(rings)
}

#[cfg(test)]
mod tests {
    use geo::Area;

    use super::*;

    fn square_with_hole() -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
            vec![LineString::from(vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0), (4.0, 4.0)])],
        )])
    }

    #[test]
    fn holes_survive_conversion() {
        let back = shp_to_geo(&geo_to_shp(&square_with_hole()));
        assert_eq!(back.0.len(), 1);
        assert_eq!(back.0[0].interiors().len(), 1);
        assert_eq!(back.unsigned_area(), 96.0);
    }

    #[test]
    fn each_outer_ring_starts_a_polygon() {
        let mut mp = square_with_hole();
        mp.0.push(Polygon::new(LineString::from(vec![(20.0, 0.0), (21.0, 0.0), (21.0, 1.0), (20.0, 0.0)]), vec![]));
        let back = shp_to_geo(&geo_to_shp(&mp));
        assert_eq!(back.0.len(), 2);
        assert!(back.0[1].interiors().is_empty());
    }
}
