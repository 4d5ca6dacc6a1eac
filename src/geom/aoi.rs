use geo::{BooleanOps, Coord, MultiPolygon, Polygon, Rect};
use log::{debug, info};
use rstar::RTree;

use crate::{
    Error, GeoPoint, Result,
    geom::{Projection, UtmProjection, UtmZone, bbox::IndexedRect},
};

/// An axis-aligned square in a planar (metric) frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Square {
    pub center: Coord<f64>,
    pub side: f64,
}

impl Square {
    pub fn new(center: Coord<f64>, side: f64) -> Self {
        Self { center, side }
    }

    fn rect(&self) -> Rect<f64> {
        let h = self.side / 2.0;
        Rect::new(
            Coord { x: self.center.x - h, y: self.center.y - h },
            Coord { x: self.center.x + h, y: self.center.y + h },
        )
    }

    #[inline] fn to_polygon(self) -> Polygon<f64> { self.rect().to_polygon() }
}

/// A merged area of interest in lon/lat, with the indices of the input points it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRegion {
    pub geometry: MultiPolygon<f64>,
    pub members: Vec<usize>,
}

/// Union overlapping or touching squares into maximal connected regions.
///
/// Each returned region is the union outline of one connected group; squares
/// that meet only at a corner may produce a multi-part region. Region order
/// carries no meaning.
pub fn merge_overlapping(squares: &[Square]) -> Result<Vec<MultiPolygon<f64>>> {
    Ok(merge_groups(squares)?.into_iter().map(|(_, geometry)| geometry).collect())
}

/// Place a `side_m` square on every point (in the UTM zone of the points' mean
/// position), merge them, and return the regions in lon/lat.
///
/// The mean longitude is taken on the circle, so points either side of the
/// antimeridian share a zone next to it.
pub fn merge_points(points: &[GeoPoint], side_m: f64) -> Result<Vec<MergedRegion>> {
    if points.is_empty() { return Ok(Vec::new()) }

    let n = points.len() as f64;
    let (sin, cos) = points.iter()
        .map(|p| p.lon.to_radians().sin_cos())
        .fold((0.0, 0.0), |(s, c), (ps, pc)| (s + ps, c + pc));
    let mean = GeoPoint::new_unchecked(
        points.iter().map(|p| p.lat).sum::<f64>() / n,
        sin.atan2(cos).to_degrees(),
    );
    let projection = UtmProjection::new(UtmZone::from_point(mean))?;
    debug!("[aoi] projecting {} point(s) into UTM zone {}", points.len(), projection.zone());

    let squares = points.iter()
        .map(|&p| projection.project(p).map(|center| Square::new(center, side_m)))
        .collect::<Result<Vec<_>>>()?;

    merge_groups(&squares)?.into_iter()
        .map(|(members, geometry)| projection.unproject_geometry(&geometry).map(|geometry| MergedRegion { geometry, members }))
        .collect()
}

fn merge_groups(squares: &[Square]) -> Result<Vec<(Vec<usize>, MultiPolygon<f64>)>> {
    if let Some(bad) = squares.iter().find(|s| !(s.side.is_finite() && s.side > 0.0)) {
        return Err(Error::InvalidGeometry(format!("AOI square side must be positive, got {}", bad.side)))
    }

    let regions = connected_groups(squares).into_iter()
        .filter_map(|members| {
            let geometry = members.iter()
                .map(|&i| MultiPolygon::new(vec![squares[i].to_polygon()]))
                .reduce(|a, b| a.union(&b))?;
            Some((members, geometry))
        })
        .collect::<Vec<_>>();

    info!("[aoi] merged {} square(s) into {} region(s)", squares.len(), regions.len());
    Ok(regions)
}

/// Group squares whose extents overlap or touch, transitively.
/// Groups are listed by their smallest member index.
fn connected_groups(squares: &[Square]) -> Vec<Vec<usize>> {
    let rtree = RTree::bulk_load(
        squares.iter().enumerate()
            .map(|(i, square)| IndexedRect::new(i, square.rect()))
            .collect(),
    );

    // Union-find with path halving.
    let mut root = (0..squares.len()).collect::<Vec<_>>();
    fn find(root: &mut [usize], mut i: usize) -> usize {
        while root[i] != i {
            root[i] = root[root[i]];
            i = root[i];
        }
        i
    }

    for (i, square) in squares.iter().enumerate() {
        let rect = square.rect();
        let envelope = rstar::AABB::from_corners(rect.min().into(), rect.max().into());
        for other in rtree.locate_in_envelope_intersecting(&envelope) {
            let (a, b) = (find(&mut root, i), find(&mut root, other.idx()));
            if a != b { root[a.max(b)] = a.min(b) }
        }
    }

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut slot = vec![usize::MAX; squares.len()];
    for i in 0..squares.len() {
        let r = find(&mut root, i);
        if slot[r] == usize::MAX {
            slot[r] = groups.len();
            groups.push(Vec::new());
        }
        groups[slot[r]].push(i);
    }
    groups
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use geo::Area;

    use super::*;

    fn square(x: f64, y: f64, side: f64) -> Square {
        Square::new(Coord { x, y }, side)
    }

    fn total_area(regions: &[MultiPolygon<f64>]) -> f64 {
        regions.iter().map(|r| r.unsigned_area()).sum()
    }

    #[test]
    fn disjoint_squares_stay_separate() {
        let regions = merge_overlapping(&[square(0.0, 0.0, 10.0), square(100.0, 0.0, 10.0)]).unwrap();
        assert_eq!(regions.len(), 2);
        assert_abs_diff_eq!(total_area(&regions), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn half_overlapping_squares_merge() {
        let regions = merge_overlapping(&[square(0.0, 0.0, 10.0), square(5.0, 0.0, 10.0)]).unwrap();
        assert_eq!(regions.len(), 1);
        assert_abs_diff_eq!(total_area(&regions), 150.0, epsilon = 1e-9);
        assert!(total_area(&regions) < 200.0);
    }

    #[test]
    fn edge_touching_squares_merge() {
        let regions = merge_overlapping(&[square(0.0, 0.0, 10.0), square(10.0, 0.0, 10.0)]).unwrap();
        assert_eq!(regions.len(), 1);
        assert_abs_diff_eq!(total_area(&regions), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn bridging_square_joins_a_chain() {
        let squares = [square(0.0, 0.0, 10.0), square(16.0, 0.0, 10.0), square(8.0, 0.0, 10.0), square(50.0, 50.0, 1.0)];
        let groups = connected_groups(&squares);
        assert_eq!(groups, vec![vec![0, 1, 2], vec![3]]);

        let regions = merge_overlapping(&squares).unwrap();
        assert_eq!(regions.len(), 2);
        assert_abs_diff_eq!(total_area(&regions), 26.0 * 10.0 + 1.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_input_yields_no_regions() {
        assert!(merge_overlapping(&[]).unwrap().is_empty());
        assert!(merge_points(&[], 9_000.0).unwrap().is_empty());
    }

    #[test]
    fn non_positive_side_is_rejected() {
        for side in [0.0, -1.0, f64::NAN] {
            let result = merge_overlapping(&[square(0.0, 0.0, 10.0), square(1.0, 1.0, side)]);
            assert!(matches!(result, Err(Error::InvalidGeometry(_))));
        }
    }

    #[test]
    fn nearby_points_merge_and_distant_points_do_not() {
        let points = [
            GeoPoint::new_unchecked(51.5074, -0.1278),
            GeoPoint::new_unchecked(51.5200, -0.1000), // ~2.4 km away
            GeoPoint::new_unchecked(52.2053, 0.1218),  // Cambridge, ~80 km away
        ];
        let mut regions = merge_points(&points, 9_000.0).unwrap();
        regions.sort_by_key(|r| r.members.len());
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].members, vec![2]);
        assert_eq!(regions[1].members, vec![0, 1]);

        // Output is lon/lat near the inputs.
        let coord = regions[0].geometry.0[0].exterior().0[0];
        assert!((coord.x - 0.1218).abs() < 0.1 && (coord.y - 52.2053).abs() < 0.1);
    }

    #[test]
    fn points_across_the_antimeridian_merge() {
        let points = [
            GeoPoint::new_unchecked(-16.0, 179.999),
            GeoPoint::new_unchecked(-16.0, -179.999),
        ];
        let regions = merge_points(&points, 1_000.0).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].members, vec![0, 1]);
    }
}
