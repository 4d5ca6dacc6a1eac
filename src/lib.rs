#![doc = "Oriented satellite imaging footprints, AOI merging and field/sub-field hierarchy inference"]
mod common;
pub mod config;
mod error;
mod geom;
pub mod io;
mod types;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use types::{Dataset, Direction, Footprint, GeoPoint, NamedPoint, PolygonRecord, RecordEdit};

#[doc(inline)]
pub use config::{AoiConfig, BatchConfig, Config, FootprintConfig, HierarchyConfig};

#[doc(inline)]
pub use geom::{
    BatchEntry, BatchSpec, MergedRegion, Projection, Square, UtmProjection, UtmZone,
    build_batch, build_footprint, build_footprint_with, fan_offsets, generate_footprints, infer_hierarchy,
    merge_overlapping, merge_points, orbit_angle, parse_centroid, parse_centroids, parse_lat_lon,
};
