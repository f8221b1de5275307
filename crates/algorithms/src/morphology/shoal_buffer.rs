//! Shoal buffering (3x3 focal maximum)
//!
//! Expands shoals by one cell in every direction so contours drawn from the
//! surface keep a safety margin around them. Each cell takes the shoalest
//! (numerically largest) value among its immediate neighbours when that is
//! shoaler than the cell itself:
//!
//! ```text
//!     + + +
//!     + X +
//!     + + +
//! ```
//!
//! Border cells use only their in-bounds neighbours (5 on edges, 3 in
//! corners). All reads come from the grid as it was before the pass.

use bathysmooth_core::raster::{is_nodata, DepthGrid, Neighborhood};
use bathysmooth_core::{Algorithm, Error, Result};
use ndarray::Array2;

use crate::maybe_rayon::collect_rows;

/// Parameters for shoal buffering (the 3x3 window is fixed)
#[derive(Debug, Clone, Default)]
pub struct ShoalBufferParams;

/// Shoal buffering algorithm
#[derive(Debug, Clone, Default)]
pub struct ShoalBuffer;

impl Algorithm for ShoalBuffer {
    type Input = DepthGrid;
    type Output = DepthGrid;
    type Params = ShoalBufferParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ShoalBuffer"
    }

    fn description(&self) -> &'static str {
        "Expand shoals by one cell with a 3x3 focal maximum filter"
    }

    fn execute(&self, mut input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        shoal_buffer(&mut input)?;
        Ok(input)
    }
}

/// Buffer shoals of `grid` in place.
///
/// The neighbourhood maximum is taken over every in-bounds neighbour,
/// holes included; the update is then applied only when neither that
/// maximum nor the cell itself is no-data. A hole that happens to be the
/// numeric maximum of a neighbourhood therefore blocks buffering of that
/// cell rather than letting a lower neighbour win. Holes are never
/// overwritten.
pub fn shoal_buffer(grid: &mut DepthGrid) -> Result<()> {
    let (rows, cols) = grid.shape();
    let nodata = grid.nodata();
    let src = grid.data();

    let output_data = collect_rows(rows, |row| {
        let mut row_data = vec![0.0_f32; cols];

        for (col, out) in row_data.iter_mut().enumerate() {
            let z = src[(row, col)];
            *out = z;

            let shoalest = Neighborhood::Queen
                .around(rows, cols, row, col)
                .map(|(_, pos)| src[pos])
                .fold(None, |acc: Option<f32>, v| match acc {
                    Some(m) if m >= v => Some(m),
                    _ if v.is_nan() => acc,
                    _ => Some(v),
                });

            if let Some(max) = shoalest
                && max > z
                && !is_nodata(max, nodata)
                && !is_nodata(z, nodata)
            {
                *out = max;
            }
        }

        row_data
    });

    let filtered =
        Array2::from_shape_vec((rows, cols), output_data).map_err(|e| Error::Other(e.to_string()))?;
    grid.replace_cells(filtered)
}
