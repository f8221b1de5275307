//! Iterative surface smoothing that keeps soundings navigationally safe

mod laplacian;

pub use laplacian::{
    interpolated_depth, laplacian_smooth, safe_smooth_depth, validate_iterations, AxisWeights,
    LaplacianParams, LaplacianSmooth,
};
