//! Rolling-coin smoothing (navigationally safe morphological closing)
//!
//! A coin is centered on every cell in turn. The shoalest sounding under
//! the coin is found, then pressed onto every cell the coin covers; each
//! cell ends up with the deepest of the values pressed onto it. The result
//! is a closing with a disk: small deep pits narrower than the coin are
//! filled up, shoals are kept, and no sounding is ever made deeper.
//!
//! Near the grid border the coin is clipped to the part that overlaps the
//! grid and used as-is (no renormalisation, no fallback to a full coin).

use bathysmooth_core::raster::{is_nodata, DepthGrid};
use bathysmooth_core::{Algorithm, Error, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::element::StructuringElement;
use crate::maybe_rayon::collect_rows;

/// Value a cell holds before any coin has been pressed onto it. The press
/// keeps the minimum of the pressed values, so this is that minimum's
/// identity; every data cell is pressed at least by its own coin.
pub const UNPRESSED_DEPTH: f32 = f32::INFINITY;

/// Parameters for rolling-coin smoothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingCoinParams {
    /// Coin radius in cells (before trimming)
    pub radius: usize,
    /// Strip the outer ring of the coin
    pub trim: bool,
}

impl Default for RollingCoinParams {
    fn default() -> Self {
        Self {
            radius: 5,
            trim: false,
        }
    }
}

/// Rolling-coin smoothing algorithm
#[derive(Debug, Clone, Default)]
pub struct RollingCoin;

impl Algorithm for RollingCoin {
    type Input = DepthGrid;
    type Output = DepthGrid;
    type Params = RollingCoinParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "RollingCoin"
    }

    fn description(&self) -> &'static str {
        "Navigationally safe morphological closing with a disk-shaped coin"
    }

    fn execute(&self, mut input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let coin = StructuringElement::build(params.radius, params.trim)?;
        rolling_coin(&mut input, &coin)?;
        Ok(input)
    }
}

/// Inclusive range of coin offsets that stay inside the grid for one
/// center cell.
///
/// Away from the border this is `[-radius, radius]` on both axes; near it
/// each bound is clipped independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinWindow {
    pub row_min: isize,
    pub col_min: isize,
    pub row_max: isize,
    pub col_max: isize,
}

impl CoinWindow {
    /// Window of a coin of `radius` centered at `(row, col)` in a
    /// `rows x cols` grid
    pub fn clipped(rows: usize, cols: usize, row: usize, col: usize, radius: usize) -> Self {
        Self {
            row_min: -(row.min(radius) as isize),
            col_min: -(col.min(radius) as isize),
            row_max: (rows - 1 - row).min(radius) as isize,
            col_max: (cols - 1 - col).min(radius) as isize,
        }
    }

    /// Offsets inside the window that are on the coin
    pub fn coin_offsets<'a>(
        &self,
        coin: &'a StructuringElement,
    ) -> impl Iterator<Item = (isize, isize)> + 'a {
        let Self {
            row_min,
            col_min,
            row_max,
            col_max,
        } = *self;
        (row_min..=row_max)
            .flat_map(move |dr| (col_min..=col_max).map(move |dc| (dr, dc)))
            .filter(move |&(dr, dc)| coin.contains(dr, dc))
    }
}

/// Shoalest data value under the (clipped) coin centered at `(row, col)`,
/// or `None` when the coin only covers holes.
pub fn shoalest_on_coin(
    grid: &DepthGrid,
    coin: &StructuringElement,
    row: usize,
    col: usize,
) -> Option<f32> {
    let (rows, cols) = grid.shape();
    let window = CoinWindow::clipped(rows, cols, row, col, coin.radius());
    shoalest_in_window(grid, coin, &window, row, col)
}

fn shoalest_in_window(
    grid: &DepthGrid,
    coin: &StructuringElement,
    window: &CoinWindow,
    row: usize,
    col: usize,
) -> Option<f32> {
    let src = grid.data();
    let nodata = grid.nodata();
    window
        .coin_offsets(coin)
        .map(|(dr, dc)| src[(offset(row, dr), offset(col, dc))])
        .filter(|&v| !is_nodata(v, nodata))
        .fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
}

/// Apply rolling-coin smoothing to `grid` in place.
///
/// Every cell of the result is at least as shoal as its input value and no
/// shoaler than the shoalest sounding of any coin covering it. Holes stay
/// holes and are written back with the exact sentinel.
///
/// Runs in two passes:
/// 1. the shoalest-on-coin value of every center cell;
/// 2. the press: each destination takes the minimum over the shoalest
///    values of all coins that cover it. This is evaluated per destination
///    by looking back through the reflected coin offsets, which gives the
///    same result as pressing coin by coin and lets rows run independently.
pub fn rolling_coin(grid: &mut DepthGrid, coin: &StructuringElement) -> Result<()> {
    let source: &DepthGrid = grid;
    let (rows, cols) = source.shape();
    let nodata = source.nodata();
    let radius = coin.radius();

    let shoalest: Vec<Option<f32>> = collect_rows(rows, |row| {
        (0..cols)
            .map(|col| {
                let window = CoinWindow::clipped(rows, cols, row, col, radius);
                shoalest_in_window(source, coin, &window, row, col)
            })
            .collect()
    });

    let offsets = coin.offsets();
    let src = source.data();

    let pressed = collect_rows(rows, |row| {
        let mut row_data = vec![UNPRESSED_DEPTH; cols];

        for (col, out) in row_data.iter_mut().enumerate() {
            if is_nodata(src[(row, col)], nodata) {
                *out = nodata;
                continue;
            }

            // (row, col) lies at offset (dr, dc) from center (row - dr, col - dc)
            for &(dr, dc) in &offsets {
                let (Some(cr), Some(cc)) = (
                    row.checked_add_signed(-dr).filter(|&r| r < rows),
                    col.checked_add_signed(-dc).filter(|&c| c < cols),
                ) else {
                    continue;
                };
                if let Some(value) = shoalest[cr * cols + cc]
                    && *out > value
                {
                    *out = value;
                }
            }
        }

        row_data
    });

    let smoothed =
        Array2::from_shape_vec((rows, cols), pressed).map_err(|e| Error::Other(e.to_string()))?;
    grid.replace_cells(smoothed)
}

#[inline]
fn offset(index: usize, delta: isize) -> usize {
    (index as isize + delta) as usize
}
