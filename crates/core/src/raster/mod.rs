//! Depth grid data structures

mod geotransform;
mod grid;
mod neighborhood;
pub mod nodata;

pub use geotransform::GeoTransform;
pub use grid::{DepthGrid, GridStatistics};
pub use neighborhood::{offset_position, Neighborhood};
pub use nodata::{is_nodata, DEFAULT_NODATA, NODATA_EPSILON};
