//! Disk-shaped structuring element ("coin") for rolling-coin smoothing
//!
//! The coin is a boolean mask of side `2 * radius + 1`. A cell at offset
//! `(dr, dc)` from the center is on the coin when `dr² + dc² <= radius²`.
//!
//! Trimming strips the outermost row and column on every side of the full
//! disk instead of recomputing a smaller disk. The two are not the same:
//! `build(4, true)` keeps the diagonal shoulders of the radius-4 disk that a
//! fresh radius-3 disk would not have.

use std::fmt;

use bathysmooth_core::{Error, Result};
use ndarray::{s, Array2, ArrayView2};

/// Largest coin radius accepted, in cells
pub const MAX_COIN_RADIUS: usize = 50;

/// Disk-shaped boolean mask, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    radius: usize,
    mask: Array2<bool>,
}

impl StructuringElement {
    /// Build a coin of the given radius, optionally trimmed.
    ///
    /// Untrimmed coins have radius `radius`; trimmed coins have radius
    /// `radius - 1` and their mask is the interior of the untrimmed one.
    ///
    /// # Errors
    /// `InvalidParameter` when `radius` is outside `1..=MAX_COIN_RADIUS`, or
    /// when `trim` is requested with `radius < 2` (the trimmed coin would
    /// have radius 0).
    pub fn build(radius: usize, trim: bool) -> Result<Self> {
        Self::validate_params(radius, trim)?;

        let full = disk_mask(radius);
        if !trim {
            return Ok(Self { radius, mask: full });
        }

        let d = full.nrows();
        let mask = full.slice(s![1..d - 1, 1..d - 1]).to_owned();
        Ok(Self {
            radius: radius - 1,
            mask,
        })
    }

    /// Untrimmed coin of the given radius
    pub fn disk(radius: usize) -> Result<Self> {
        Self::build(radius, false)
    }

    /// Check coin parameters without building the mask
    pub fn validate_params(radius: usize, trim: bool) -> Result<()> {
        if radius == 0 {
            return Err(Error::invalid_parameter(
                "radius",
                radius,
                "coin radius must be at least 1",
            ));
        }
        if radius > MAX_COIN_RADIUS {
            return Err(Error::invalid_parameter(
                "radius",
                radius,
                format!("coin radius must be at most {MAX_COIN_RADIUS}"),
            ));
        }
        if trim && radius < 2 {
            return Err(Error::invalid_parameter(
                "radius",
                radius,
                "a trimmed coin needs radius of at least 2",
            ));
        }
        Ok(())
    }

    /// Effective radius (after trimming)
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Side length of the mask: `2 * radius + 1`
    pub fn diameter(&self) -> usize {
        2 * self.radius + 1
    }

    /// The mask, indexed `[i][j]` for offset `(i - radius, j - radius)`
    pub fn mask(&self) -> ArrayView2<'_, bool> {
        self.mask.view()
    }

    /// Whether offset `(dr, dc)` from the center lies on the coin
    #[inline]
    pub fn contains(&self, dr: isize, dc: isize) -> bool {
        let r = self.radius as isize;
        if dr.abs() > r || dc.abs() > r {
            return false;
        }
        self.mask[((dr + r) as usize, (dc + r) as usize)]
    }

    /// (dr, dc) offsets of every cell on the coin, row by row
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let r = self.radius as isize;
        self.mask
            .indexed_iter()
            .filter(|&(_, &on)| on)
            .map(|((i, j), _)| (i as isize - r, j as isize - r))
            .collect()
    }

    /// Number of cells on the coin
    pub fn active_count(&self) -> usize {
        self.mask.iter().filter(|&&on| on).count()
    }
}

/// Renders the coin as rows of `1` (on) and blanks (off)
impl fmt::Display for StructuringElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.mask.rows() {
            let line: String = row
                .iter()
                .map(|&on| if on { "1 " } else { "  " })
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

fn disk_mask(radius: usize) -> Array2<bool> {
    let d = 2 * radius + 1;
    let r = radius as isize;
    Array2::from_shape_fn((d, d), |(i, j)| {
        let dy = i as isize - r;
        let dx = j as isize - r;
        dx * dx + dy * dy <= r * r
    })
}
