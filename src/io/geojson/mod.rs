//! GeoJSON reading of polygon datasets and writing of datasets, footprints and AOI regions.

mod read;
mod write;

pub use read::*;
pub use write::*;
