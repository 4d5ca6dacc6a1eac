//! GeoJSON reading operations.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use log::warn;
use serde_json::Value;

use crate::{Dataset, PolygonRecord};

/// Property keys tried, in order, for a feature's name.
const NAME_KEYS: [&str; 4] = ["name", "Name", "NAME", "title"];

/// Read a GeoJSON FeatureCollection (or single Feature) of polygons into a dataset.
pub fn read_dataset_geojson(path: &Path) -> Result<Dataset> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::geojson::read] Failed to open GeoJSON file: {}", path.display()))?;
    read_dataset_geojson_bytes(&bytes)
        .with_context(|| format!("[io::geojson::read] Failed to read dataset from {}", path.display()))
}

/// Read a dataset from GeoJSON bytes.
///
/// Polygon and MultiPolygon features become records; null or non-areal geometries
/// become records without geometry. Scalar properties are kept as strings.
pub fn read_dataset_geojson_bytes(bytes: &[u8]) -> Result<Dataset> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson::read] Failed to parse GeoJSON bytes")?;

    let features = match value["type"].as_str() {
        Some("FeatureCollection") => value["features"].as_array()
            .ok_or_else(|| anyhow!("[io::geojson::read] FeatureCollection without features array"))?
            .iter().collect::<Vec<_>>(),
        Some("Feature") => vec![&value],
        other => bail!("[io::geojson::read] Expected a FeatureCollection or Feature, found {other:?}"),
    };

    let records = features.into_iter().enumerate()
        .map(|(id, feature)| {
            let properties = read_properties(&feature["properties"]);
            let name = NAME_KEYS.iter()
                .find_map(|key| properties.get(*key).cloned())
                .unwrap_or_default();
            let geometry = read_geometry(&feature["geometry"])
                .with_context(|| format!("[io::geojson::read] Invalid geometry in feature {id}"))?;
            Ok(PolygonRecord { properties, ..PolygonRecord::new(id, name, geometry) })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset::new(records))
}

fn read_properties(properties: &Value) -> BTreeMap<String, String> {
    properties.as_object()
        .map(|object| object.iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.clone(), text))
            })
            .collect())
        .unwrap_or_default()
}

/// Parse a GeoJSON geometry object into a MultiPolygon, or `None` for null/non-areal geometry.
pub(crate) fn read_geometry(geometry: &Value) -> Result<Option<MultiPolygon<f64>>> {
    if geometry.is_null() { return Ok(None) }
    let coords = &geometry["coordinates"];

    match geometry["type"].as_str() {
        Some("Polygon") => Ok(Some(MultiPolygon(vec![parse_polygon(coords)?]))),
        Some("MultiPolygon") => {
            let polygons = coords.as_array()
                .ok_or_else(|| anyhow!("MultiPolygon coordinates must be an array"))?
                .iter()
                .map(parse_polygon)
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(MultiPolygon(polygons)))
        }
        Some("GeometryCollection") => {
            let polygons = geometry["geometries"].as_array()
                .map(|members| members.iter()
                    .map(read_geometry)
                    .collect::<Result<Vec<_>>>())
                .transpose()?
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .flat_map(|mp| mp.0)
                .collect::<Vec<_>>();
            Ok((!polygons.is_empty()).then_some(MultiPolygon(polygons)))
        }
        other => {
            warn!("[io::geojson::read] ignoring non-areal geometry {other:?}");
            Ok(None)
        }
    }
}

/// Polygon coordinates: `[exterior, hole, hole, ...]`, each ring `[[x, y], ...]`.
fn parse_polygon(coords: &Value) -> Result<Polygon<f64>> {
    let rings = coords.as_array()
        .ok_or_else(|| anyhow!("Polygon coordinates must be an array of rings"))?
        .iter()
        .map(parse_ring)
        .collect::<Result<Vec<_>>>()?;

    let mut rings = rings.into_iter();
    let exterior = rings.next().ok_or_else(|| anyhow!("Polygon is missing its exterior ring"))?;
    Ok(Polygon::new(exterior, rings.collect()))
}

fn parse_ring(coords: &Value) -> Result<LineString<f64>> {
    let points = coords.as_array()
        .ok_or_else(|| anyhow!("ring must be an array of positions"))?
        .iter()
        .map(|position| {
            let x = position[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = position[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut ring = LineString(points);
    ring.close();
    Ok(ring)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "farm", "acres": 120, "organic": true},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
            {"type": "Feature", "properties": {"NAME": "orchard"},
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[0.2,0.2],[0.4,0.2],[0.4,0.4]]]]}},
            {"type": "Feature", "properties": null, "geometry": null},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [0, 0]}}
        ]
    }"#;

    #[test]
    fn reads_polygons_and_properties() {
        let dataset = read_dataset_geojson_bytes(COLLECTION.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.epsg(), 4326);

        let farm = &dataset.records[0];
        assert_eq!(farm.name, "farm");
        assert_eq!(farm.properties["acres"], "120");
        assert_eq!(farm.properties["organic"], "true");
        assert_eq!(farm.geometry.as_ref().unwrap().0.len(), 1);

        // Unclosed ring gets closed.
        let orchard = dataset.records[1].geometry.as_ref().unwrap();
        assert_eq!(dataset.records[1].name, "orchard");
        assert_eq!(orchard.0[0].exterior().0.len(), 4);
    }

    #[test]
    fn null_and_point_geometries_become_empty_records() {
        let dataset = read_dataset_geojson_bytes(COLLECTION.as_bytes()).unwrap();
        assert!(dataset.records[2].geometry.is_none());
        assert!(dataset.records[3].geometry.is_none());
        assert_eq!(dataset.records[2].name, "");
    }

    #[test]
    fn single_feature_is_accepted() {
        let feature = r#"{"type": "Feature", "properties": {"name": "x"},
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}"#;
        assert_eq!(read_dataset_geojson_bytes(feature.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn malformed_coordinates_are_errors() {
        let bad = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon", "coordinates": [[["a", 0]]]}}]}"#;
        assert!(read_dataset_geojson_bytes(bad.as_bytes()).is_err());
        assert!(read_dataset_geojson_bytes(br#"{"type": "Point"}"#).is_err());
    }
}
