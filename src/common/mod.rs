mod fs;
mod polygon;

pub use fs::prepare_output;
pub(crate) use fs::extension;
pub(crate) use polygon::*;
