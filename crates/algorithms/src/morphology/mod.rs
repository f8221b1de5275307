//! Navigationally safe morphology for depth surfaces
//!
//! Under the larger-is-shoaler convention both transforms only ever move a
//! sounding up (shoaler) or leave it where it is:
//! - **Shoal buffering**: 3x3 focal maximum, expands shoals by one cell
//! - **Rolling coin**: closing with a disk ("coin"), fills pits narrower
//!   than the coin

mod element;
mod rolling_coin;
mod shoal_buffer;

pub use element::{StructuringElement, MAX_COIN_RADIUS};
pub use rolling_coin::{
    rolling_coin, shoalest_on_coin, CoinWindow, RollingCoin, RollingCoinParams, UNPRESSED_DEPTH,
};
pub use shoal_buffer::{shoal_buffer, ShoalBuffer, ShoalBufferParams};
