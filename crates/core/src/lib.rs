//! # bathysmooth core
//!
//! Core types and I/O for navigationally safe bathymetric surface
//! generalization.
//!
//! This crate provides:
//! - `DepthGrid`: rectangular grid of `f32` soundings with a no-data sentinel
//! - `GeoTransform`: north-up georeferencing and X/Y resolutions
//! - epsilon-based no-data comparison shared by every algorithm
//! - `Algorithm` trait for a consistent transform API
//! - minimal native GeoTIFF reading and writing

pub mod error;
pub mod io;
pub mod raster;

pub use error::{Error, Result};
pub use raster::{DepthGrid, GeoTransform, GridStatistics};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::raster::{is_nodata, DepthGrid, GeoTransform, NODATA_EPSILON};
    pub use crate::Algorithm;
}

/// Core trait for every surface transform.
///
/// A transform takes ownership of its input, validates its parameters
/// before touching any data, and hands the result back. A failed
/// validation returns the error without modifying anything.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
