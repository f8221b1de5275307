//! Plain surface adjustments

mod offset;

pub use offset::{validate_offset, vertical_offset, OffsetParams, VerticalOffset};
