//! Bollinger Bands indicator

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{closes, require_bars, require_period};
use crate::models::indicators::{BollingerPoint, IndicatorSeries, PricePoint};

const NAME: &str = "Bollinger";

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * population standard deviation)
/// Lower Band = Middle - (std_dev * population standard deviation)
pub fn calculate_bollinger_bands(
    prices: &[PricePoint],
    period: usize,
    std_dev: f64,
) -> Result<IndicatorSeries<BollingerPoint>, IndicatorError> {
    require_period(NAME, "period", period)?;
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(IndicatorError::invalid(
            NAME,
            format!("standard deviation multiplier must be non-negative, got {}", std_dev),
        ));
    }
    require_bars(NAME, prices, period)?;

    let closes = closes(prices);
    let values = (0..closes.len())
        .map(|i| {
            let window = &closes[..=i];
            let middle = math::sma(window, period)?;
            let std = math::standard_deviation(window, period)?;
            Some(BollingerPoint {
                upper: middle + std_dev * std,
                middle,
                lower: middle - std_dev * std,
            })
        })
        .collect();

    Ok(IndicatorSeries::from_values(values))
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(
    prices: &[PricePoint],
) -> Result<IndicatorSeries<BollingerPoint>, IndicatorError> {
    calculate_bollinger_bands(prices, 20, 2.0)
}
