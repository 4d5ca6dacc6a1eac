//! Shapefile writing operations.

use std::{collections::BTreeSet, fs, path::Path};

use anyhow::{Context, Result, anyhow};
use geo::MultiPolygon;
use log::warn;
use shapefile::{
    Writer,
    dbase::{FieldName, FieldValue, Record, TableWriterBuilder},
};

use crate::{Dataset, Footprint, common::geo_to_shp, io::shp::{WGS84_EPSG, WGS84_WKT}};

/// dBase field names are limited to 10 bytes.
const MAX_FIELD_NAME: usize = 10;

/// Hierarchy fields appended to every exported record.
const HIERARCHY_FIELDS: [&str; 5] = ["name", "parent", "top_level", "depth", "area"];

fn field_name(name: &str) -> Result<FieldName> {
    FieldName::try_from(name).map_err(|e| anyhow!("[io::shp::write] Invalid dBase field name {name:?}: {e:?}"))
}

fn write_prj(path: &Path) -> Result<()> {
    let prj = path.with_extension("prj");
    fs::write(&prj, WGS84_WKT)
        .with_context(|| format!("[io::shp::write] Failed to write projection file: {}", prj.display()))
}

/// Write records with geometry as a polygon shapefile, with passthrough attributes
/// and the inferred hierarchy. Records without geometry are skipped.
pub fn write_dataset_shp(dataset: &Dataset, path: &Path) -> Result<()> {
    // Passthrough attribute columns that fit dBase naming and do not clash with the hierarchy fields.
    let passthrough = dataset.records.iter()
        .flat_map(|record| record.properties.keys())
        .filter(|key| key.len() <= MAX_FIELD_NAME && !HIERARCHY_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(key)))
        .cloned()
        .collect::<BTreeSet<_>>();

    let mut table = TableWriterBuilder::new()
        .add_character_field(field_name("name")?, 254)
        .add_character_field(field_name("parent")?, 254)
        .add_logical_field(field_name("top_level")?)
        .add_numeric_field(field_name("depth")?, 10, 0)
        .add_numeric_field(field_name("area")?, 24, 6);
    for key in &passthrough {
        table = table.add_character_field(field_name(key)?, 254);
    }

    let mut writer = Writer::from_path(path, table)
        .with_context(|| format!("[io::shp::write] Failed to create shapefile: {}", path.display()))?;

    for record in &dataset.records {
        let Some(geometry) = &record.geometry else {
            warn!("[io::shp::write] skipping {:?}: no geometry", record.name);
            continue
        };

        let mut row = Record::default();
        row.insert("name".into(), FieldValue::Character(Some(record.name.clone())));
        row.insert("parent".into(), FieldValue::Character(record.parent_name.clone()));
        row.insert("top_level".into(), FieldValue::Logical(Some(record.is_top_level)));
        row.insert("depth".into(), FieldValue::Numeric(Some(record.depth as f64)));
        row.insert("area".into(), FieldValue::Numeric(Some(record.area)));
        for key in &passthrough {
            row.insert(key.clone(), FieldValue::Character(record.properties.get(key).cloned()));
        }

        writer.write_shape_and_record(&geo_to_shp(geometry), &row)
            .with_context(|| format!("[io::shp::write] Failed to write record {:?}", record.name))?;
    }

    if dataset.epsg() == WGS84_EPSG {
        write_prj(path)
    } else {
        warn!("[io::shp::write] no projection file written for EPSG {}", dataset.epsg());
        Ok(())
    }
}

/// Write footprints as a polygon shapefile.
pub fn write_footprints_shp(footprints: &[Footprint], path: &Path) -> Result<()> {
    let table = TableWriterBuilder::new()
        .add_character_field(field_name("name")?, 254)
        .add_character_field(field_name("direction")?, 8)
        .add_numeric_field(field_name("angle_deg")?, 18, 6)
        .add_numeric_field(field_name("offset_m")?, 18, 3)
        .add_numeric_field(field_name("length_m")?, 18, 3)
        .add_numeric_field(field_name("width_m")?, 18, 3);

    let mut writer = Writer::from_path(path, table)
        .with_context(|| format!("[io::shp::write] Failed to create shapefile: {}", path.display()))?;

    for footprint in footprints {
        let mut row = Record::default();
        row.insert("name".into(), FieldValue::Character(Some(footprint.name().to_string())));
        row.insert("direction".into(), FieldValue::Character(Some(footprint.direction().to_string())));
        row.insert("angle_deg".into(), FieldValue::Numeric(Some(footprint.orbit_angle_deg())));
        row.insert("offset_m".into(), FieldValue::Numeric(Some(footprint.lateral_offset_m())));
        row.insert("length_m".into(), FieldValue::Numeric(Some(footprint.length_m())));
        row.insert("width_m".into(), FieldValue::Numeric(Some(footprint.width_m())));

        let shape = geo_to_shp(&MultiPolygon(vec![footprint.to_polygon()]));
        writer.write_shape_and_record(&shape, &row)
            .with_context(|| format!("[io::shp::write] Failed to write footprint {:?}", footprint.name()))?;
    }

    write_prj(path)
}

#[cfg(test)]
mod tests {
    use geo::{Area, LineString, Polygon};

    use super::*;
    use crate::{Direction, GeoPoint, HierarchyConfig, PolygonRecord, build_footprint, config::SSO_INCLINATION_DEG, io::read_dataset_shp};

    fn square(cx: f64, cy: f64, side: f64) -> MultiPolygon<f64> {
        let h = side / 2.0;
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(cx - h, cy - h), (cx + h, cy - h), (cx + h, cy + h), (cx - h, cy + h)]),
            vec![],
        )])
    }

    #[test]
    fn dataset_round_trips_through_shapefile() {
        let dataset = Dataset::new(vec![
            PolygonRecord::new(0, "field", Some(square(10.0, 50.0, 0.1))).with_property("crop", "barley"),
            PolygonRecord::new(1, "plot", Some(square(10.0, 50.0, 0.01))),
            PolygonRecord::new(2, "ghost", None),
        ])
        .infer_hierarchy(&HierarchyConfig::default())
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.shp");
        write_dataset_shp(&dataset, &path).unwrap();
        assert!(path.with_extension("prj").exists());

        let reloaded = read_dataset_shp(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.epsg(), WGS84_EPSG);
        assert_eq!(reloaded.records[0].name, "field");
        assert_eq!(reloaded.records[0].properties["crop"], "barley");
        assert_eq!(reloaded.records[1].properties["parent"], "field");
        assert_eq!(reloaded.records[1].properties["top_level"], "false");

        let area = reloaded.records[0].geometry.as_ref().unwrap().unsigned_area();
        approx::assert_abs_diff_eq!(area, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn projected_shapefile_cannot_be_measured_in_metres() {
        let dataset = Dataset::new(vec![PolygonRecord::new(0, "field", Some(square(450_000.0, 200_000.0, 1_000.0)))]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.shp");
        write_dataset_shp(&dataset, &path).unwrap();
        fs::write(path.with_extension("prj"), r#"PROJCS["OSGB 1936 / British National Grid",GEOGCS["OSGB 1936"],PROJECTION["Transverse_Mercator"],AUTHORITY["EPSG","27700"]]"#).unwrap();

        let reloaded = read_dataset_shp(&path).unwrap();
        assert_eq!(reloaded.epsg(), 27700);

        let metric = HierarchyConfig { project_to_metric: true, ..HierarchyConfig::default() };
        assert!(matches!(reloaded.infer_hierarchy(&metric), Err(crate::Error::InvalidParameter(_))));
        assert!(reloaded.infer_hierarchy(&HierarchyConfig::default()).is_ok());
    }

    #[test]
    fn projected_dataset_gets_no_wgs84_prj() {
        let dataset = Dataset::with_epsg(vec![PolygonRecord::new(0, "field", Some(square(450_000.0, 200_000.0, 1_000.0)))], 27700);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.shp");
        write_dataset_shp(&dataset, &path).unwrap();
        assert!(!path.with_extension("prj").exists());
    }

    #[test]
    fn footprints_are_written_with_attributes() {
        let footprint = build_footprint(GeoPoint::new_unchecked(51.5074, -0.1278), 30_000.0, 20_000.0, Direction::NeToSw, 0.0, SSO_INCLINATION_DEG).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("footprints.shp");
        write_footprints_shp(&[footprint], &path).unwrap();

        let reloaded = read_dataset_shp(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.records[0].name, "NE->SW @ 51.5074,-0.1278");
        assert_eq!(reloaded.records[0].properties["direction"], "NE->SW");
    }
}
