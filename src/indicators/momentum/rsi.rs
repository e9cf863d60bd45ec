//! RSI (Relative Strength Index) indicator

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{require_bars, require_period};
use crate::models::indicators::{IndicatorSeries, PricePoint};

const NAME: &str = "RSI";

/// Calculate RSI with Wilder's smoothing
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// The first value lands on bar `period` (index), seeded from the first
/// `period` price changes. A zero average loss yields exactly 100.
pub fn calculate_rsi(
    prices: &[PricePoint],
    period: usize,
) -> Result<IndicatorSeries<f64>, IndicatorError> {
    require_period(NAME, "period", period)?;
    require_bars(NAME, prices, period + 1)?;

    let mut values = vec![None; prices.len()];
    let change = |i: usize| prices[i].close - prices[i - 1].close;

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let delta = change(i);
        if delta > 0.0 {
            avg_gain += delta;
        } else {
            avg_loss -= delta;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    values[period] = Some(rsi_value(avg_gain, avg_loss));

    let p = period as f64;
    for i in period + 1..prices.len() {
        let delta = change(i);
        let (gain, loss) = if delta > 0.0 { (delta, 0.0) } else { (0.0, -delta) };
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        values[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    Ok(IndicatorSeries::from_values(values))
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(prices: &[PricePoint]) -> Result<IndicatorSeries<f64>, IndicatorError> {
    calculate_rsi(prices, 14)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    math::bounded(100.0 - (100.0 / (1.0 + rs)), 0.0, 100.0)
}
