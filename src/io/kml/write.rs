//! KML/KMZ writing operations.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use super::document::KmlDocument;
use crate::{Dataset, Footprint, MergedRegion};

/// Render footprints as a KML document.
pub fn footprints_to_kml(footprints: &[Footprint]) -> String {
    let mut doc = KmlDocument::new("Imaging areas");
    for footprint in footprints {
        let centroid = footprint.centroid();
        let data = BTreeMap::from([
            ("direction", footprint.direction().to_string()),
            ("centroid", centroid.to_string()),
            ("length_m", footprint.length_m().to_string()),
            ("width_m", footprint.width_m().to_string()),
            ("orbit_angle_deg", format!("{:.6}", footprint.orbit_angle_deg())),
            ("lateral_offset_m", footprint.lateral_offset_m().to_string()),
            ("utm_epsg", footprint.zone().epsg().to_string()),
        ]);
        doc.placemark(footprint.name(), &data, &[&footprint.to_polygon()]);
    }
    doc.finish()
}

/// Render a dataset with its hierarchy as a KML document.
/// Records without geometry are left out.
pub fn dataset_to_kml(dataset: &Dataset) -> String {
    let mut doc = KmlDocument::new("Fields");
    for record in &dataset.records {
        let Some(geometry) = &record.geometry else { continue };

        let mut data = record.properties.iter()
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect::<BTreeMap<_, _>>();
        data.insert("parent", record.parent_name.clone().unwrap_or_default());
        data.insert("top_level", record.is_top_level.to_string());
        data.insert("depth", record.depth.to_string());

        doc.multipolygon(&record.name, &data, geometry);
    }
    doc.finish()
}

/// Render merged AOI regions as a KML document.
pub fn regions_to_kml(regions: &[MergedRegion], names: &[String]) -> String {
    let mut doc = KmlDocument::new("Areas of interest");
    for (i, region) in regions.iter().enumerate() {
        let points = region.members.iter()
            .map(|&m| names.get(m).cloned().unwrap_or_else(|| m.to_string()))
            .collect::<Vec<_>>();
        let data = BTreeMap::from([("points", points.join(", "))]);
        doc.multipolygon(&format!("AOI_{}", i + 1), &data, &region.geometry);
    }
    doc.finish()
}

fn write_kml(text: &str, path: &Path) -> Result<()> {
    fs::write(path, text)
        .with_context(|| format!("[io::kml] Failed to write KML file: {}", path.display()))
}

/// Package a KML document as a KMZ archive holding `doc.kml`.
fn write_kmz(text: &str, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::kml] Failed to create KMZ file: {}", path.display()))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file("doc.kml", options).context("[io::kml] Failed to start doc.kml entry")?;
    zip.write_all(text.as_bytes()).context("[io::kml] Failed to write doc.kml entry")?;

    zip.finish().context("[io::kml] Failed to finalize KMZ archive")?
        .flush().context("[io::kml] Failed to flush KMZ archive")
}

pub fn write_footprints_kml(footprints: &[Footprint], path: &Path) -> Result<()> {
    write_kml(&footprints_to_kml(footprints), path)
}

pub fn write_footprints_kmz(footprints: &[Footprint], path: &Path) -> Result<()> {
    write_kmz(&footprints_to_kml(footprints), path)
}

pub fn write_dataset_kml(dataset: &Dataset, path: &Path) -> Result<()> {
    write_kml(&dataset_to_kml(dataset), path)
}

pub fn write_dataset_kmz(dataset: &Dataset, path: &Path) -> Result<()> {
    write_kmz(&dataset_to_kml(dataset), path)
}

pub fn write_regions_kml(regions: &[MergedRegion], names: &[String], path: &Path) -> Result<()> {
    write_kml(&regions_to_kml(regions, names), path)
}

pub fn write_regions_kmz(regions: &[MergedRegion], names: &[String], path: &Path) -> Result<()> {
    write_kmz(&regions_to_kml(regions, names), path)
}
