//! KML and KMZ export for viewing footprints and datasets in Google Earth.

mod document;
mod write;

pub use write::*;
