//! Indicator engine: pure functions from price history to aligned series.

pub mod error;
pub mod validation;

pub mod momentum;
pub mod structure;
pub mod trend;
pub mod volatility;

pub use error::IndicatorError;
pub use validation::*;
