//! Shapefile reading operations.

use std::{collections::{BTreeMap, HashMap}, fs, path::Path};

use anyhow::{Context, Result};
use log::warn;
use shapefile::{Reader, Shape, dbase::{FieldValue, Record}};

use crate::{Dataset, PolygonRecord, common::shp_to_geo, io::shp::{UNKNOWN_EPSG, WGS84_EPSG}};

/// Read all polygon features and their attributes from a `.shp` file (with its `.dbf`).
///
/// Null shapes and non-polygon shapes become records without geometry. The CRS
/// comes from the `.prj` sidecar; without one, WGS84 lon/lat is assumed.
pub fn read_dataset_shp(path: &Path) -> Result<Dataset> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp::read] Failed to open shapefile: {}", path.display()))?;

    let mut records = Vec::new();
    for (id, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp::read] Error reading shape+record {id} of {}", path.display()))?;

        let geometry = match shape {
            Shape::Polygon(polygon) => Some(shp_to_geo(&polygon)),
            Shape::NullShape => None,
            other => {
                warn!("[io::shp::read] ignoring non-polygon shape {:?} in record {id}", other.shapetype());
                None
            }
        };

        let properties = attributes(record);
        let name = properties.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("name"))
            .map(|(_, value)| value.clone())
            .unwrap_or_default();

        records.push(PolygonRecord { properties, ..PolygonRecord::new(id, name, geometry) });
    }

    Ok(Dataset::with_epsg(records, read_prj(path)?))
}

/// EPSG code of the `.prj` sidecar next to `path`, if any.
fn read_prj(path: &Path) -> Result<u32> {
    let prj = path.with_extension("prj");
    if !prj.exists() { return Ok(WGS84_EPSG) }

    let wkt = fs::read_to_string(&prj)
        .with_context(|| format!("[io::shp::read] Failed to read projection file: {}", prj.display()))?;
    let epsg = epsg_from_wkt(&wkt);
    if epsg != WGS84_EPSG {
        warn!("[io::shp::read] {} is not WGS84 lon/lat (EPSG {epsg}); metric measuring is unavailable", path.display());
    }
    Ok(epsg)
}

/// Geographic CRSs are read as WGS84; projected ones keep their outermost EPSG
/// authority code, or [`UNKNOWN_EPSG`].
pub(crate) fn epsg_from_wkt(wkt: &str) -> u32 {
    let wkt = wkt.trim_start();
    if wkt.starts_with("GEOGCS") || wkt.starts_with("GEOGCRS") { return WGS84_EPSG }

    // WKT1 lists the outer authority last.
    wkt.rfind("AUTHORITY[\"EPSG\"")
        .and_then(|start| {
            let code = wkt[start..].split(',').nth(1)?;
            code.trim_matches(|c: char| !c.is_ascii_digit()).parse().ok()
        })
        .unwrap_or(UNKNOWN_EPSG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::shp::WGS84_WKT;

    const BNG_WKT: &str = r#"PROJCS["OSGB 1936 / British National Grid",GEOGCS["OSGB 1936",DATUM["OSGB_1936",SPHEROID["Airy 1830",6377563.396,299.3249646,AUTHORITY["EPSG","7001"]],AUTHORITY["EPSG","6277"]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4277"]],PROJECTION["Transverse_Mercator"],UNIT["metre",1],AUTHORITY["EPSG","27700"]]"#;

    #[test]
    fn geographic_prj_is_wgs84() {
        assert_eq!(epsg_from_wkt(WGS84_WKT), WGS84_EPSG);
    }

    #[test]
    fn projected_prj_keeps_outer_authority() {
        assert_eq!(epsg_from_wkt(BNG_WKT), 27700);
        assert_eq!(epsg_from_wkt(r#"PROJCS["Local grid",PROJECTION["Transverse_Mercator"]]"#), UNKNOWN_EPSG);
    }
}

/// Flatten a dBase record into string attributes, dropping empty values.
fn attributes(record: Record) -> BTreeMap<String, String> {
    HashMap::<String, FieldValue>::from(record).into_iter()
        .filter_map(|(field, value)| {
            let text = match value {
                FieldValue::Character(Some(s)) | FieldValue::Memo(s) => s.trim().to_string(),
                FieldValue::Numeric(Some(n)) | FieldValue::Double(n) | FieldValue::Currency(n) => n.to_string(),
                FieldValue::Float(Some(f)) => f.to_string(),
                FieldValue::Integer(i) => i.to_string(),
                FieldValue::Logical(Some(b)) => b.to_string(),
                _ => return None,
            };
            (!text.is_empty()).then_some((field, text))
        })
        .collect()
}
