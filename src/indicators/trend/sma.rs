//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{closes, require_bars, require_period};
use crate::models::indicators::{IndicatorSeries, PricePoint};

/// Calculate the SMA of closes; undefined for the first `period - 1` bars
pub fn calculate_sma(
    prices: &[PricePoint],
    period: usize,
) -> Result<IndicatorSeries<f64>, IndicatorError> {
    require_period("SMA", "period", period)?;
    require_bars("SMA", prices, period)?;

    let closes = closes(prices);
    let values = (0..closes.len())
        .map(|i| math::sma(&closes[..=i], period))
        .collect();
    Ok(IndicatorSeries::from_values(values))
}
