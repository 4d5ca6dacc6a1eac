pub mod footprints;
pub mod hierarchy;
pub mod merge_aoi;

use imaging_areas::{NamedPoint, Result as CoreResult};
use log::warn;

/// Keep the rows that parsed, logging the rest.
pub(crate) fn valid_points(rows: Vec<CoreResult<NamedPoint>>) -> Vec<NamedPoint> {
    rows.into_iter()
        .filter_map(|row| row.inspect_err(|e| warn!("[cli] skipping row: {e}")).ok())
        .collect()
}
