//! # Bathysmooth Algorithms
//!
//! Generalization of bathymetric depth grids into navigationally safe
//! surfaces. Depths are signed with larger values shoaler, and every
//! transform here only ever moves a sounding toward the surface.
//!
//! ## Available Algorithm Categories
//!
//! - **morphology**: Shoal buffering, rolling-coin closing
//! - **smoothing**: Anisotropic Laplacian smoothing
//! - **surface**: Vertical offset
//! - **pipeline**: Ordered, serializable chains of the above

mod maybe_rayon;
pub mod morphology;
pub mod pipeline;
pub mod smoothing;
pub mod surface;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::morphology::{
        rolling_coin, shoal_buffer, shoalest_on_coin, RollingCoin, RollingCoinParams, ShoalBuffer,
        ShoalBufferParams, StructuringElement,
    };
    pub use crate::pipeline::{Pipeline, Step};
    pub use crate::smoothing::{laplacian_smooth, LaplacianParams, LaplacianSmooth};
    pub use crate::surface::{vertical_offset, OffsetParams, VerticalOffset};
    pub use bathysmooth_core::prelude::*;
}
