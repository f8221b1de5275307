//! Reading and writing depth grids

mod geotiff;

pub use geotiff::{
    default_output_path, read_geotiff, read_geotiff_from_buffer, write_geotiff,
    write_geotiff_to_buffer, OUTPUT_SUFFIX,
};
