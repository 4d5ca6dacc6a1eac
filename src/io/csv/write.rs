//! CSV writing operations.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{df, frame::DataFrame, io::SerWriter, prelude::CsvWriter};

use crate::Footprint;

/// Tabulate footprints: one row per footprint with its centroid, orientation and ring as WKT.
pub fn footprints_to_frame(footprints: &[Footprint]) -> Result<DataFrame> {
    let wkt = |footprint: &Footprint| format!(
        "POLYGON (({}))",
        footprint.ring().iter().map(|p| format!("{} {}", p.lon, p.lat)).collect::<Vec<_>>().join(", "),
    );

    df!(
        "name" => footprints.iter().map(|f| f.name().to_string()).collect::<Vec<_>>(),
        "lat" => footprints.iter().map(|f| f.centroid().lat).collect::<Vec<_>>(),
        "lon" => footprints.iter().map(|f| f.centroid().lon).collect::<Vec<_>>(),
        "direction" => footprints.iter().map(|f| f.direction().to_string()).collect::<Vec<_>>(),
        "orbit_angle_deg" => footprints.iter().map(|f| f.orbit_angle_deg()).collect::<Vec<_>>(),
        "length_m" => footprints.iter().map(|f| f.length_m()).collect::<Vec<_>>(),
        "width_m" => footprints.iter().map(|f| f.width_m()).collect::<Vec<_>>(),
        "lateral_offset_m" => footprints.iter().map(|f| f.lateral_offset_m()).collect::<Vec<_>>(),
        "utm_epsg" => footprints.iter().map(|f| f.zone().epsg()).collect::<Vec<_>>(),
        "wkt" => footprints.iter().map(wkt).collect::<Vec<_>>(),
    )
    .context("[io::csv::write] Failed to build footprint table")
}

/// Write the footprint table to a CSV file.
pub fn write_footprints_csv(footprints: &[Footprint], path: &Path) -> Result<()> {
    let mut df = footprints_to_frame(footprints)?;
    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}
