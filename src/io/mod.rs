//! IO module for format-specific reading and writing operations.
//!
//! Each format module handles reading and writing for one file format. The
//! functions at this level dispatch on the file extension.
//!
//! # Format Modules
//!
//! - `csv` - points of interest in, footprint summaries out
//! - `geojson` - polygon datasets in; datasets, footprints and AOI regions out
//! - `kml` - KML/KMZ export for Google Earth
//! - `shp` - ESRI Shapefile datasets in and out

mod csv;
mod geojson;
mod kml;
mod shp;

use std::path::Path;

use anyhow::{Result, bail};
use log::info;

pub use crate::common::prepare_output;
pub use csv::*;
pub use geojson::*;
pub use kml::*;
pub use shp::*;

use crate::{Dataset, Footprint, MergedRegion, common::extension};

/// Read a polygon dataset from `.geojson`/`.json` or `.shp`.
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    let dataset = match extension(path).as_str() {
        "geojson" | "json" => read_dataset_geojson(path)?,
        "shp" => read_dataset_shp(path)?,
        other => bail!("[io] Unsupported dataset format {other:?}: {}", path.display()),
    };
    info!("[io] read {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Write a dataset as `.geojson`/`.json`, `.shp`, `.kml` or `.kmz`.
pub fn write_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    match extension(path).as_str() {
        "geojson" | "json" => write_dataset_geojson(dataset, path)?,
        "shp" => write_dataset_shp(dataset, path)?,
        "kml" => write_dataset_kml(dataset, path)?,
        "kmz" => write_dataset_kmz(dataset, path)?,
        other => bail!("[io] Unsupported dataset output format {other:?}: {}", path.display()),
    }
    info!("[io] wrote {} records to {}", dataset.len(), path.display());
    Ok(())
}

/// Write footprints as `.kmz`, `.kml`, `.geojson`/`.json`, `.shp` or `.csv`.
pub fn write_footprints(footprints: &[Footprint], path: &Path) -> Result<()> {
    match extension(path).as_str() {
        "kmz" => write_footprints_kmz(footprints, path)?,
        "kml" => write_footprints_kml(footprints, path)?,
        "geojson" | "json" => write_footprints_geojson(footprints, path)?,
        "shp" => write_footprints_shp(footprints, path)?,
        "csv" => write_footprints_csv(footprints, path)?,
        other => bail!("[io] Unsupported footprint output format {other:?}: {}", path.display()),
    }
    info!("[io] wrote {} footprints to {}", footprints.len(), path.display());
    Ok(())
}

/// Write merged AOI regions as `.geojson`/`.json`, `.kml` or `.kmz`.
/// `names` lists the point names that region members index into.
pub fn write_regions(regions: &[MergedRegion], names: &[String], path: &Path) -> Result<()> {
    match extension(path).as_str() {
        "geojson" | "json" => write_regions_geojson(regions, names, path)?,
        "kml" => write_regions_kml(regions, names, path)?,
        "kmz" => write_regions_kmz(regions, names, path)?,
        other => bail!("[io] Unsupported region output format {other:?}: {}", path.display()),
    }
    info!("[io] wrote {} regions to {}", regions.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extensions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_dataset(&dir.path().join("fields.gpkg")).is_err());
        assert!(write_footprints(&[], &dir.path().join("out.txt")).is_err());
        assert!(write_regions(&[], &[], &dir.path().join("out.shp")).is_err());
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("OUT.GeoJSON");
        write_footprints(&[], &path).unwrap();
        assert!(path.exists());
    }
}
