mod aoi;
mod batch;
mod bbox;
mod footprint;
mod hierarchy;
mod orbit;
mod proj;

pub use aoi::{MergedRegion, Square, merge_overlapping, merge_points};
pub use batch::{BatchEntry, BatchSpec, build_batch, fan_offsets, generate_footprints, parse_centroid, parse_centroids, parse_lat_lon};
pub use footprint::{build_footprint, build_footprint_with};
pub use hierarchy::infer_hierarchy;
pub use orbit::orbit_angle;
pub use proj::{Projection, UtmProjection, UtmZone};
