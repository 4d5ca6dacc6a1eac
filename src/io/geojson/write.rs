//! GeoJSON writing operations.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use geo::{LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value, json};

use crate::{Dataset, Footprint, MergedRegion};

fn ring_coords(ring: &LineString<f64>) -> Value {
    Value::Array(ring.coords().map(|c| json!([c.x, c.y])).collect())
}

fn polygon_coords(polygon: &Polygon<f64>) -> Value {
    Value::Array(
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring_coords)
            .collect(),
    )
}

/// GeoJSON geometry object for a MultiPolygon.
pub(crate) fn multipolygon_geometry(mp: &MultiPolygon<f64>) -> Value {
    json!({
        "type": "MultiPolygon",
        "coordinates": Value::Array(mp.0.iter().map(polygon_coords).collect()),
    })
}

fn feature_collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

fn write_value(value: &Value, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("[io::geojson::write] Failed to serialize GeoJSON")?;
    fs::write(path, bytes)
        .with_context(|| format!("[io::geojson::write] Failed to write GeoJSON file: {}", path.display()))
}

/// Export records with their passthrough attributes plus the inferred hierarchy
/// (`parent`, `top_level`, `depth`, `area`, `overlap_ratio`).
pub fn dataset_to_geojson(dataset: &Dataset) -> Value {
    let features = dataset.records.iter()
        .map(|record| {
            let mut properties = record.properties.iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect::<Map<_, _>>();
            properties.insert("name".into(), json!(record.name));
            properties.insert("parent".into(), json!(record.parent_name));
            properties.insert("top_level".into(), json!(record.is_top_level));
            properties.insert("depth".into(), json!(record.depth));
            properties.insert("area".into(), json!(record.area));
            properties.insert("overlap_ratio".into(), json!(record.overlap_ratio));

            json!({
                "type": "Feature",
                "id": record.id,
                "geometry": record.geometry.as_ref().map_or(Value::Null, multipolygon_geometry),
                "properties": properties,
            })
        })
        .collect();

    feature_collection(features)
}

pub fn write_dataset_geojson(dataset: &Dataset, path: &Path) -> Result<()> {
    write_value(&dataset_to_geojson(dataset), path)
}

/// Export footprints as Polygon features.
pub fn footprints_to_geojson(footprints: &[Footprint]) -> Value {
    let features = footprints.iter()
        .map(|footprint| json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": polygon_coords(&footprint.to_polygon()),
            },
            "properties": {
                "name": footprint.name(),
                "direction": footprint.direction(),
                "centroid_lat": footprint.centroid().lat,
                "centroid_lon": footprint.centroid().lon,
                "length_m": footprint.length_m(),
                "width_m": footprint.width_m(),
                "orbit_angle_deg": footprint.orbit_angle_deg(),
                "lateral_offset_m": footprint.lateral_offset_m(),
                "utm_epsg": footprint.zone().epsg(),
            },
        }))
        .collect();

    feature_collection(features)
}

pub fn write_footprints_geojson(footprints: &[Footprint], path: &Path) -> Result<()> {
    write_value(&footprints_to_geojson(footprints), path)
}

/// Export merged AOI regions; `names` lists the point names that `members` index into.
pub fn regions_to_geojson(regions: &[MergedRegion], names: &[String]) -> Value {
    let features = regions.iter().enumerate()
        .map(|(i, region)| json!({
            "type": "Feature",
            "geometry": multipolygon_geometry(&region.geometry),
            "properties": {
                "name": format!("AOI_{}", i + 1),
                "points": region.members.iter()
                    .map(|&m| names.get(m).cloned().unwrap_or_else(|| m.to_string()))
                    .collect::<Vec<_>>(),
            },
        }))
        .collect();

    feature_collection(features)
}

pub fn write_regions_geojson(regions: &[MergedRegion], names: &[String], path: &Path) -> Result<()> {
    write_value(&regions_to_geojson(regions, names), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Direction, GeoPoint, HierarchyConfig, PolygonRecord, build_footprint, config::SSO_INCLINATION_DEG,
        io::read_dataset_geojson_bytes,
    };

    fn square(cx: f64, cy: f64, side: f64) -> MultiPolygon<f64> {
        let h = side / 2.0;
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(cx - h, cy - h), (cx + h, cy - h), (cx + h, cy + h), (cx - h, cy + h)]),
            vec![],
        )])
    }

    #[test]
    fn hierarchy_attributes_survive_export_and_reload() {
        let dataset = Dataset::new(vec![
            PolygonRecord::new(0, "field", Some(square(0.0, 0.0, 0.1))).with_property("crop", "wheat"),
            PolygonRecord::new(1, "plot", Some(square(0.0, 0.0, 0.01))),
            PolygonRecord::new(2, "missing", None),
        ]);
        let config = HierarchyConfig { buffer_tolerance: 1e-6, ..Default::default() };
        let annotated = dataset.infer_hierarchy(&config).unwrap();

        let bytes = serde_json::to_vec(&dataset_to_geojson(&annotated)).unwrap();
        let reloaded = read_dataset_geojson_bytes(&bytes).unwrap();

        assert_eq!(reloaded.records[0].properties["crop"], "wheat");
        assert_eq!(reloaded.records[0].properties["top_level"], "true");
        assert_eq!(reloaded.records[1].properties["parent"], "field");
        assert_eq!(reloaded.records[1].properties["depth"], "1");
        assert!(reloaded.records[2].geometry.is_none());
        assert_eq!(reloaded.records[1].geometry, annotated.records[1].geometry);
    }

    #[test]
    fn footprint_features_carry_orientation() {
        let footprint = build_footprint(GeoPoint::new_unchecked(54.9783, -1.6178), 30_000.0, 20_000.0, Direction::SeToNw, 0.0, SSO_INCLINATION_DEG).unwrap();
        let value = footprints_to_geojson(std::slice::from_ref(&footprint));
        let feature = &value["features"][0];
        assert_eq!(feature["geometry"]["type"], "Polygon");
        assert_eq!(feature["geometry"]["coordinates"][0].as_array().unwrap().len(), 5);
        assert_eq!(feature["properties"]["direction"], "SE->NW");
        assert_eq!(feature["properties"]["utm_epsg"], 32630);
    }

    #[test]
    fn region_features_list_member_names() {
        let region = MergedRegion { geometry: square(0.0, 0.0, 1.0), members: vec![1, 0] };
        let value = regions_to_geojson(&[region], &["a".into(), "b".into()]);
        assert_eq!(value["features"][0]["properties"]["points"], json!(["b", "a"]));
        assert_eq!(value["features"][0]["properties"]["name"], "AOI_1");
    }
}
