//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{closes, require_bars, require_period};
use crate::models::indicators::{IndicatorSeries, PricePoint};

/// Calculate the EMA of closes, seeded with the SMA of the first `period` bars
pub fn calculate_ema(
    prices: &[PricePoint],
    period: usize,
) -> Result<IndicatorSeries<f64>, IndicatorError> {
    require_period("EMA", "period", period)?;
    require_bars("EMA", prices, period)?;

    Ok(IndicatorSeries::from_values(math::ema_series(
        &closes(prices),
        period,
    )))
}
