//! North-up georeferencing for depth grids

use serde::{Deserialize, Serialize};

/// Georeferencing of a north-up depth grid.
///
/// Maps pixel coordinates (col, row) to map coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width
/// y = origin_y + row * pixel_height
/// ```
///
/// `pixel_height` is negative for north-up surfaces. The smoothing
/// algorithms only ever look at the absolute resolutions; the origin is
/// carried through untouched so exported surfaces line up with their input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Cell size in X direction
    pub pixel_width: f64,
    /// Cell size in Y direction, usually negative
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Transform anchored at the origin with the given absolute resolutions
    pub fn from_resolution(x_res: f64, y_res: f64) -> Self {
        Self::new(0.0, 0.0, x_res.abs(), -y_res.abs())
    }

    /// Absolute W-E cell size
    pub fn x_res(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Absolute N-S cell size
    pub fn y_res(&self) -> f64 {
        self.pixel_height.abs()
    }

    /// Map coordinates of the pixel's upper-left corner
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.origin_x + col as f64 * self.pixel_width,
            self.origin_y + row as f64 * self.pixel_height,
        )
    }

    /// Bounding box (min_x, min_y, max_x, max_y) of a grid of the given size
    pub fn bounds(&self, cols: usize, rows: usize) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.pixel_to_geo_corner(0, 0);
        let (x1, y1) = self.pixel_to_geo_corner(cols, rows);
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolution_is_absolute() {
        let gt = GeoTransform::new(500.0, 7000.0, 2.0, -4.0);
        assert_relative_eq!(gt.x_res(), 2.0);
        assert_relative_eq!(gt.y_res(), 4.0);

        let gt = GeoTransform::from_resolution(-2.0, 4.0);
        assert_relative_eq!(gt.pixel_width, 2.0);
        assert_relative_eq!(gt.pixel_height, -4.0);
    }

    #[test]
    fn test_pixel_corner() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);
        let (x, y) = gt.pixel_to_geo_corner(5, 10);
        assert_relative_eq!(x, 150.0, epsilon = 1e-10);
        assert_relative_eq!(y, 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(0.0, 100.0, 1.0, -1.0);
        let (min_x, min_y, max_x, max_y) = gt.bounds(100, 100);

        assert_relative_eq!(min_x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(min_y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(max_x, 100.0, epsilon = 1e-10);
        assert_relative_eq!(max_y, 100.0, epsilon = 1e-10);
    }
}
