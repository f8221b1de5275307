//! Vertical offset of a depth surface
//!
//! Adds a constant to every sounding, e.g. to move a surface between
//! vertical datums before generalising it. Holes are left as they are.

use bathysmooth_core::raster::{is_nodata, DepthGrid};
use bathysmooth_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters for a vertical offset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OffsetParams {
    /// Value added to every data cell (positive = shoaler)
    pub value: f32,
}

/// Vertical offset algorithm
#[derive(Debug, Clone, Default)]
pub struct VerticalOffset;

impl Algorithm for VerticalOffset {
    type Input = DepthGrid;
    type Output = DepthGrid;
    type Params = OffsetParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "VerticalOffset"
    }

    fn description(&self) -> &'static str {
        "Add a constant to every data cell of the surface"
    }

    fn execute(&self, mut input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        vertical_offset(&mut input, params.value)?;
        Ok(input)
    }
}

/// Reject offsets that would poison the surface
pub fn validate_offset(value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::invalid_parameter(
            "offset",
            value,
            "offset must be a finite number",
        ));
    }
    Ok(())
}

/// Add `value` to every data cell of `grid` in place
pub fn vertical_offset(grid: &mut DepthGrid, value: f32) -> Result<()> {
    validate_offset(value)?;
    let nodata = grid.nodata();
    let shifted = grid
        .data()
        .mapv(|z| if is_nodata(z, nodata) { z } else { z + value });
    grid.replace_cells(shifted)
}
