//! Navigationally safe Laplacian smoothing
//!
//! Each iteration replaces every sounding by the weighted mean of its
//! north/south/east/west neighbours, unless the original sounding is
//! already the shallower of the two. Weights follow the cell aspect ratio:
//!
//! ```text
//!                 |  0    x/y   0  |
//!   1 / sum(w) *  | y/x    0   y/x |
//!                 |  0    x/y   0  |
//! ```
//!
//! which is the familiar `1/4 * [0 1 0; 1 0 1; 0 1 0]` kernel for square
//! cells. Holes are treated as missing neighbours, not as zero.

use bathysmooth_core::raster::{is_nodata, DepthGrid, Neighborhood};
use bathysmooth_core::{Algorithm, Error, Result};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::maybe_rayon::collect_rows;

/// Parameters for Laplacian smoothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaplacianParams {
    /// Number of smoothing iterations (at least 1)
    pub iterations: usize,
}

impl Default for LaplacianParams {
    fn default() -> Self {
        Self { iterations: 1 }
    }
}

/// Laplacian smoothing algorithm
#[derive(Debug, Clone, Default)]
pub struct LaplacianSmooth;

impl Algorithm for LaplacianSmooth {
    type Input = DepthGrid;
    type Output = DepthGrid;
    type Params = LaplacianParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "LaplacianSmooth"
    }

    fn description(&self) -> &'static str {
        "Iterative anisotropic 4-neighbour smoothing that never deepens a sounding beyond its estimate"
    }

    fn execute(&self, mut input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        laplacian_smooth(&mut input, params.iterations)?;
        Ok(input)
    }
}

/// Neighbour weights derived from the cell resolutions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisWeights {
    /// Weight of an east or west neighbour: `y_res / x_res`
    pub east_west: f64,
    /// Weight of a north or south neighbour: `x_res / y_res`
    pub north_south: f64,
}

impl AxisWeights {
    pub fn from_resolution(x_res: f64, y_res: f64) -> Self {
        Self {
            east_west: y_res / x_res,
            north_south: x_res / y_res,
        }
    }
}

/// Reject an iteration count of zero
pub fn validate_iterations(iterations: usize) -> Result<()> {
    if iterations == 0 {
        return Err(Error::invalid_parameter(
            "iterations",
            iterations,
            "at least one smoothing iteration is required",
        ));
    }
    Ok(())
}

/// Smooth `grid` in place for the given number of iterations.
///
/// Every iteration reads only from the previous iteration's surface. Zero
/// iterations is rejected before the grid is touched.
pub fn laplacian_smooth(grid: &mut DepthGrid, iterations: usize) -> Result<()> {
    validate_iterations(iterations)?;

    let (rows, cols) = grid.shape();
    let nodata = grid.nodata();
    let weights = AxisWeights::from_resolution(grid.x_res(), grid.y_res());

    let mut current = grid.data().clone();

    for _ in 0..iterations {
        let prev = current.view();

        let new_data = collect_rows(rows, |row| {
            (0..cols)
                .map(|col| safe_smooth_depth(&prev, row, col, nodata, weights))
                .collect()
        });

        current = Array2::from_shape_vec((rows, cols), new_data)
            .map_err(|e| Error::Other(e.to_string()))?;
    }

    grid.replace_cells(current)
}

/// Weighted mean of the valid rook neighbours of `(row, col)`, or `None`
/// when fewer than two neighbours carry data.
pub fn interpolated_depth(
    surface: &ArrayView2<'_, f32>,
    row: usize,
    col: usize,
    nodata: f32,
    weights: AxisWeights,
) -> Option<f32> {
    let (rows, cols) = surface.dim();
    let mut weighted_sum = 0.0_f64;
    let mut weight_total = 0.0_f64;
    let mut count = 0_usize;

    for ((dr, _), pos) in Neighborhood::Rook.around(rows, cols, row, col) {
        let v = surface[pos];
        if is_nodata(v, nodata) {
            continue;
        }
        let w = if dr != 0 {
            weights.north_south
        } else {
            weights.east_west
        };
        weighted_sum += v as f64 * w;
        weight_total += w;
        count += 1;
    }

    (count >= 2).then(|| (weighted_sum / weight_total) as f32)
}

/// Smoothed value of one cell: the estimate if it is strictly closer to the
/// surface (smaller magnitude) than the original, otherwise the original.
/// Holes come back as the exact sentinel.
pub fn safe_smooth_depth(
    surface: &ArrayView2<'_, f32>,
    row: usize,
    col: usize,
    nodata: f32,
    weights: AxisWeights,
) -> f32 {
    let z = surface[(row, col)];
    if is_nodata(z, nodata) {
        return nodata;
    }
    match interpolated_depth(surface, row, col, nodata, weights) {
        Some(estimate) if estimate.abs() < z.abs() => estimate,
        _ => z,
    }
}
