mod direction;
mod footprint;
mod point;
mod record;

pub use direction::Direction;
pub use footprint::Footprint;
pub use point::{GeoPoint, NamedPoint};
pub use record::{Dataset, PolygonRecord, RecordEdit};
