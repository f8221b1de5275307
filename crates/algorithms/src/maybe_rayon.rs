//! Row-parallel execution with a sequential fallback.
//!
//! With the `parallel` feature the row loops of every transform run on
//! rayon's pool. Without it (wasm, single-threaded embedding) the same code
//! runs on plain iterators. Each row only reads an immutable snapshot, so
//! both paths produce identical surfaces.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
use sequential::IntoParallelIterator;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Stand-in for rayon's `IntoParallelIterator`; `into_par_iter` is
    /// just `into_iter`, so the rest of the chain resolves to `Iterator`.
    pub trait IntoParallelIterator: IntoIterator + Sized {
        fn into_par_iter(self) -> Self::IntoIter {
            self.into_iter()
        }
    }

    impl<I: IntoIterator> IntoParallelIterator for I {}
}

/// Build a row-major buffer by computing each of `rows` rows independently
pub fn collect_rows<T, F>(rows: usize, row_fn: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> Vec<T> + Sync + Send,
{
    (0..rows).into_par_iter().flat_map(row_fn).collect()
}
