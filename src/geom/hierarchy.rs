use geo::{Area, BooleanOps, BoundingRect, Buffer, Coord, Intersects, MultiPolygon, Rect};
use log::{debug, info, warn};

use crate::{
    Dataset, Error, GeoPoint, HierarchyConfig, PolygonRecord, Result,
    geom::{UtmProjection, UtmZone},
};

/// A buffered candidate parent.
struct Candidate {
    shape: MultiPolygon<f64>,
    bbox: Rect<f64>,
}

/// Assign each record at most one parent among the records of larger or equal area.
///
/// Records are processed in area-descending order (ties by input order). The
/// parent is the smallest larger record whose buffered geometry covers at least
/// `min_overlap_ratio` of the record's area, ties going to the earlier input.
/// When no record covers that much, the largest record whose buffered geometry
/// intersects it at all is taken instead.
///
/// Missing names become `Field_<index>`. Records with missing, empty or zero-area
/// geometry stay top-level and are never offered as parents. The input is not
/// modified; the returned records keep the input order.
pub fn infer_hierarchy(records: &[PolygonRecord], config: &HierarchyConfig) -> Result<Vec<PolygonRecord>> {
    config.validate()?;

    let mut annotated = records.to_vec();
    for (i, record) in annotated.iter_mut().enumerate() {
        if record.name.trim().is_empty() { record.name = format!("Field_{i}") }
        record.parent_name = None;
        record.is_top_level = true;
        record.depth = 0;
        record.overlap_ratio = None;
    }

    let shapes = working_geometries(&annotated, config.project_to_metric)?;
    let areas = shapes.iter()
        .map(|shape| shape.as_ref().map(|s| s.unsigned_area()).filter(|a| a.is_finite() && *a > 0.0))
        .collect::<Vec<_>>();

    for (record, (shape, area)) in annotated.iter_mut().zip(shapes.iter().zip(&areas)) {
        record.area = area.unwrap_or(0.0);
        if shape.is_some() && area.is_none() {
            warn!("[hierarchy] skipping degenerate geometry of {:?}", record.name);
        }
    }

    // Larger polygons first; the sort is stable so equal areas keep input order.
    let mut order = (0..annotated.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| annotated[b].area.total_cmp(&annotated[a].area));

    let candidates = shapes.iter().zip(&areas)
        .map(|(shape, area)| match (shape, area) {
            (Some(shape), Some(_)) => buffered(shape, config.buffer_tolerance),
            _ => None,
        })
        .collect::<Vec<_>>();

    for (k, &i) in order.iter().enumerate() {
        let (Some(shape), Some(area)) = (&shapes[i], areas[i]) else { continue };
        let Some(bbox) = shape.bounding_rect() else { continue };

        // Overlap ratio against a larger record, `None` when they do not touch.
        let overlap = |j: usize| -> Option<f64> {
            let candidate = candidates[j].as_ref()?;
            let touches = candidate.bbox.intersects(&bbox) && candidate.shape.intersects(shape);
            touches.then(|| (candidate.shape.intersection(shape).unsigned_area() / area).min(1.0))
        };
        let ratios = order[..k].iter().map(|&j| overlap(j)).collect::<Vec<_>>();

        // Containers first: walk back from the smallest larger record so the tightest
        // one wins, and keep walking through an equal-area run so the earliest input wins.
        let mut parent: Option<(usize, f64)> = None;
        for (&j, ratio) in order[..k].iter().zip(&ratios).rev() {
            if parent.is_some_and(|(p, _)| annotated[j].area > annotated[p].area) { break }
            if let Some(ratio) = ratio.filter(|r| *r >= config.min_overlap_ratio) { parent = Some((j, ratio)) }
        }

        // Otherwise the largest record that touches it at all.
        if parent.is_none() {
            parent = order[..k].iter().zip(&ratios)
                .find_map(|(&j, ratio)| ratio.map(|ratio| (j, ratio)));
        }

        if let Some((j, ratio)) = parent {
            let (parent_name, parent_depth) = (annotated[j].name.clone(), annotated[j].depth);
            debug!("[hierarchy] {:?} -> parent {:?} (overlap {ratio:.3})", annotated[i].name, parent_name);

            let record = &mut annotated[i];
            record.parent_name = Some(parent_name);
            record.is_top_level = false;
            record.depth = parent_depth + 1;
            record.overlap_ratio = Some(ratio);
        }
    }

    let top_level = annotated.iter().filter(|r| r.is_top_level).count();
    info!(
        "[hierarchy] {} record(s): {top_level} top-level, {} nested, {} without geometry",
        annotated.len(),
        annotated.len() - top_level,
        areas.iter().filter(|a| a.is_none()).count(),
    );

    Ok(annotated)
}

impl Dataset {
    /// Run [`infer_hierarchy`] over the dataset's records.
    ///
    /// Measuring in metres reprojects lon/lat, so `project_to_metric` requires a
    /// WGS84 (EPSG:4326) dataset.
    pub fn infer_hierarchy(&self, config: &HierarchyConfig) -> Result<Dataset> {
        if config.project_to_metric && self.epsg() != 4326 {
            return Err(Error::InvalidParameter(format!(
                "metric measuring needs WGS84 lon/lat input, dataset is EPSG {}", self.epsg(),
            )))
        }
        Ok(Dataset::with_epsg(infer_hierarchy(&self.records, config)?, self.epsg()))
    }
}

/// Buffer once up front so every containment test reuses the enlarged shape.
fn buffered(shape: &MultiPolygon<f64>, tolerance: f64) -> Option<Candidate> {
    let shape = if tolerance > 0.0 { shape.buffer(tolerance) } else { shape.clone() };
    let bbox = shape.bounding_rect()?;
    Some(Candidate { shape, bbox })
}

/// Geometries in the units used for measuring: raw lon/lat, or metres in the UTM
/// zone of the dataset's bounding-box center.
fn working_geometries(records: &[PolygonRecord], project_to_metric: bool) -> Result<Vec<Option<MultiPolygon<f64>>>> {
    let shapes = records.iter()
        .map(|record| record.geometry.clone().filter(|g| !g.0.is_empty()))
        .collect::<Vec<_>>();
    if !project_to_metric { return Ok(shapes) }

    let Some(center) = bounds(shapes.iter().flatten()).map(|b| b.center()) else { return Ok(shapes) };
    let projection = UtmProjection::new(UtmZone::from_point(GeoPoint::from_coord(center)))?;
    debug!("[hierarchy] measuring in UTM zone {}", projection.zone());

    shapes.into_iter()
        .map(|shape| shape.map(|s| projection.project_geometry(&s)).transpose())
        .collect()
}

/// Combined bounding rectangle of all shapes.
fn bounds<'a>(shapes: impl Iterator<Item = &'a MultiPolygon<f64>>) -> Option<Rect<f64>> {
    shapes
        .filter_map(|shape| shape.bounding_rect())
        .reduce(|a, b| Rect::new(
            Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
            Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
        ))
}
