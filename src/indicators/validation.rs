//! Input checks shared by every series indicator

use crate::indicators::error::IndicatorError;
use crate::models::indicators::PricePoint;

/// Dates must be strictly increasing (chronological, no duplicates)
pub fn validate_series(prices: &[PricePoint]) -> Result<(), IndicatorError> {
    for (i, pair) in prices.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            return Err(IndicatorError::UnorderedSeries { index: i + 1 });
        }
    }
    Ok(())
}

/// Fail with `InsufficientData` below `required` bars, then check ordering
pub fn require_bars(
    indicator: &'static str,
    prices: &[PricePoint],
    required: usize,
) -> Result<(), IndicatorError> {
    if prices.len() < required {
        return Err(IndicatorError::InsufficientData {
            indicator,
            required,
            available: prices.len(),
        });
    }
    validate_series(prices)
}

pub fn require_period(
    indicator: &'static str,
    name: &str,
    period: usize,
) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::invalid(
            indicator,
            format!("{} must be greater than zero", name),
        ));
    }
    Ok(())
}

pub fn closes(prices: &[PricePoint]) -> Vec<f64> {
    prices.iter().map(|p| p.close).collect()
}
