//! Main depth grid type

use crate::error::{Error, Result};
use crate::raster::{nodata, GeoTransform};
use ndarray::{Array2, ArrayView2};

/// A rectangular grid of depth soundings.
///
/// Cells are `f32` depths stored row-major. Larger values are shallower
/// ("shoaler"). Cells within [`nodata::NODATA_EPSILON`] of the sentinel are
/// holes: every transform in this workspace leaves them holes and never
/// writes anything else into them.
///
/// The cell buffer is always kept in standard (row-major, contiguous)
/// layout, so [`DepthGrid::cells`] can hand it out as a plain slice.
///
/// # Example
///
/// ```
/// use bathysmooth_core::DepthGrid;
///
/// let grid = DepthGrid::from_samples(2, 3, vec![-4.0; 6], -9999.0, 1.0, 1.0)?;
/// assert_eq!(grid.shape(), (2, 3));
/// assert_eq!(grid.cells().len(), 6);
/// # Ok::<(), bathysmooth_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DepthGrid {
    /// Depths in row-major order (row, col)
    data: Array2<f32>,
    /// Georeferencing; also the source of the X/Y resolutions
    transform: GeoTransform,
    /// No-data sentinel
    nodata: f32,
}

impl DepthGrid {
    /// Build a grid from externally read samples.
    ///
    /// `x_res` and `y_res` are absolute pixel sizes and must be finite and
    /// positive. `cells` must hold exactly `rows * cols` row-major values.
    pub fn from_samples(
        rows: usize,
        cols: usize,
        cells: Vec<f32>,
        nodata: f32,
        x_res: f64,
        y_res: f64,
    ) -> Result<Self> {
        validate_resolution("x_res", x_res)?;
        validate_resolution("y_res", y_res)?;
        validate_shape(rows, cols)?;
        if cells.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                rows,
                cols,
                reason: format!("expected {} samples, got {}", rows * cols, cells.len()),
            });
        }

        let data = Array2::from_shape_vec((rows, cols), cells)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self {
            data,
            transform: GeoTransform::from_resolution(x_res, y_res),
            nodata,
        })
    }

    /// Build a grid from an ndarray and a full georeferencing transform
    pub fn from_array(data: Array2<f32>, nodata: f32, transform: GeoTransform) -> Result<Self> {
        validate_resolution("x_res", transform.x_res())?;
        validate_resolution("y_res", transform.y_res())?;
        let (rows, cols) = data.dim();
        validate_shape(rows, cols)?;

        Ok(Self {
            data: into_standard_layout(data),
            transform,
            nodata,
        })
    }

    // Dimensions

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed grid; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get depth at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<f32> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set depth at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
        let (rows, cols) = self.shape();
        match self.data.get_mut((row, col)) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            }),
        }
    }

    /// Row-major depth samples, ready for export
    pub fn cells(&self) -> &[f32] {
        // Every constructor and `replace_cells` enforce standard layout.
        self.data.as_slice().unwrap_or_default()
    }

    /// Read-only view of the cells
    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    /// Reference to the underlying array
    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// Swap in a freshly computed cell buffer of the same shape.
    ///
    /// The previous buffer is dropped. This is how every smoothing pass
    /// commits its result: build the new buffer from an immutable view, then
    /// hand ownership to the grid.
    pub fn replace_cells(&mut self, cells: Array2<f32>) -> Result<()> {
        if cells.dim() != self.shape() {
            let (rows, cols) = cells.dim();
            return Err(Error::InvalidDimensions {
                rows,
                cols,
                reason: format!(
                    "replacement must match grid shape {}x{}",
                    self.cols(),
                    self.rows()
                ),
            });
        }
        self.data = into_standard_layout(cells);
        Ok(())
    }

    // Metadata

    pub fn nodata(&self) -> f32 {
        self.nodata
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Replace the georeferencing; resolutions must stay positive
    pub fn set_transform(&mut self, transform: GeoTransform) -> Result<()> {
        validate_resolution("x_res", transform.x_res())?;
        validate_resolution("y_res", transform.y_res())?;
        self.transform = transform;
        Ok(())
    }

    /// Absolute W-E resolution
    pub fn x_res(&self) -> f64 {
        self.transform.x_res()
    }

    /// Absolute N-S resolution
    pub fn y_res(&self) -> f64 {
        self.transform.y_res()
    }

    /// Map bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    // Value checks

    /// Check if a value is no-data for this grid's sentinel
    #[inline]
    pub fn is_nodata(&self, value: f32) -> bool {
        nodata::is_nodata(value, self.nodata)
    }

    /// Check if cell at (row, col) is a hole
    pub fn is_nodata_at(&self, row: usize, col: usize) -> Result<bool> {
        let value = self.get(row, col)?;
        Ok(self.is_nodata(value))
    }

    // Statistics

    /// Basic statistics over the data cells
    pub fn statistics(&self) -> GridStatistics {
        let mut min: Option<f32> = None;
        let mut max: Option<f32> = None;
        let mut sum = 0.0_f64;
        let mut count = 0_usize;

        for &value in self.data.iter() {
            if self.is_nodata(value) {
                continue;
            }
            min = Some(min.map_or(value, |m| m.min(value)));
            max = Some(max.map_or(value, |m| m.max(value)));
            sum += value as f64;
            count += 1;
        }

        GridStatistics {
            min,
            max,
            mean: (count > 0).then(|| sum / count as f64),
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a depth grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridStatistics {
    /// Deepest sounding
    pub min: Option<f32>,
    /// Shoalest sounding
    pub max: Option<f32>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}

fn validate_shape(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions {
            rows,
            cols,
            reason: "grid must have at least one row and one column".to_string(),
        });
    }
    Ok(())
}

fn validate_resolution(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid_parameter(
            name,
            value,
            "resolution must be finite and positive",
        ));
    }
    Ok(())
}

fn into_standard_layout(data: Array2<f32>) -> Array2<f32> {
    if data.is_standard_layout() {
        data
    } else {
        data.as_standard_layout().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(rows: usize, cols: usize, value: f32) -> DepthGrid {
        DepthGrid::from_samples(rows, cols, vec![value; rows * cols], -9999.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_grid_creation() {
        let g = DepthGrid::from_samples(4, 6, vec![-3.0; 24], -9999.0, 2.0, 0.5).unwrap();
        assert_eq!(g.shape(), (4, 6));
        assert_eq!(g.rows(), 4);
        assert_eq!(g.cols(), 6);
        assert_relative_eq!(g.x_res(), 2.0);
        assert_relative_eq!(g.y_res(), 0.5);
        assert_eq!(g.nodata(), -9999.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(DepthGrid::from_samples(0, 3, vec![], -9999.0, 1.0, 1.0).is_err());
        assert!(DepthGrid::from_samples(2, 2, vec![0.0; 3], -9999.0, 1.0, 1.0).is_err());
        assert!(DepthGrid::from_samples(2, 2, vec![0.0; 4], -9999.0, 0.0, 1.0).is_err());
        assert!(DepthGrid::from_samples(2, 2, vec![0.0; 4], -9999.0, 1.0, -1.0).is_err());
        assert!(DepthGrid::from_samples(2, 2, vec![0.0; 4], -9999.0, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_cells_are_row_major() {
        let g = DepthGrid::from_samples(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], -9999.0, 1.0, 1.0)
            .unwrap();
        assert_eq!(g.get(1, 0).unwrap(), 4.0);
        assert_eq!(g.cells(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_access_out_of_bounds() {
        let mut g = grid(3, 3, -1.0);
        assert!(g.get(3, 0).is_err());
        assert!(g.set(0, 3, 1.0).is_err());
        g.set(2, 2, -7.5).unwrap();
        assert_eq!(g.get(2, 2).unwrap(), -7.5);
    }

    #[test]
    fn test_replace_cells_checks_shape() {
        let mut g = grid(3, 3, -1.0);
        assert!(g.replace_cells(Array2::zeros((2, 3))).is_err());
        assert_eq!(g.get(0, 0).unwrap(), -1.0);

        g.replace_cells(Array2::from_elem((3, 3), -2.0)).unwrap();
        assert_eq!(g.get(1, 1).unwrap(), -2.0);
    }

    #[test]
    fn test_replace_cells_normalizes_layout() {
        let mut g = grid(2, 3, 0.0);
        let transposed = Array2::from_shape_vec((3, 2), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0])
            .unwrap()
            .reversed_axes();
        g.replace_cells(transposed).unwrap();
        assert_eq!(g.cells(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_statistics_skip_nodata() {
        let mut g = grid(2, 2, -10.0);
        g.set(0, 0, -9999.0).unwrap();
        g.set(1, 1, -2.0).unwrap();

        let stats = g.statistics();
        assert_eq!(stats.min, Some(-10.0));
        assert_eq!(stats.max, Some(-2.0));
        assert_relative_eq!(stats.mean.unwrap(), -22.0 / 3.0, epsilon = 1e-9);
        assert_eq!(stats.valid_count, 3);
        assert_eq!(stats.nodata_count, 1);
        assert!(g.is_nodata_at(0, 0).unwrap());
    }
}
