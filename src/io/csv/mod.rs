//! CSV reading of points of interest and writing of footprint summaries.

mod read;
mod write;

pub use read::*;
pub use write::*;
