//! Trend indicators: SMA, EMA, ADX, Ichimoku Cloud

pub mod adx;
pub mod ema;
pub mod ichimoku;
pub mod sma;

pub use adx::*;
pub use ema::*;
pub use ichimoku::*;
pub use sma::*;
