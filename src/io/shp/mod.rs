//! ESRI Shapefile reading and writing of polygon datasets and footprints.

mod read;
mod write;

pub use read::*;
pub use write::*;

/// EPSG code of WGS84 lon/lat.
pub(crate) const WGS84_EPSG: u32 = 4326;

/// Placeholder for a projected CRS without an EPSG authority.
pub(crate) const UNKNOWN_EPSG: u32 = 0;

/// WGS84 geographic CRS, written to the `.prj` sidecar.
pub(crate) const WGS84_WKT: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;
