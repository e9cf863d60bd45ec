//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{closes, require_bars, require_period};
use crate::models::indicators::{IndicatorSeries, MacdPoint, PricePoint};
use serde::{Deserialize, Serialize};

const NAME: &str = "MACD";

/// Calculate the MACD series
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
///
/// The MACD line is defined from bar `slow`; signal and histogram from bar
/// `slow + signal - 1`.
pub fn calculate_macd(
    prices: &[PricePoint],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<IndicatorSeries<MacdPoint>, IndicatorError> {
    require_period(NAME, "fast period", fast_period)?;
    require_period(NAME, "slow period", slow_period)?;
    require_period(NAME, "signal period", signal_period)?;
    if fast_period >= slow_period {
        return Err(IndicatorError::invalid(
            NAME,
            format!("fast period {} must be below slow period {}", fast_period, slow_period),
        ));
    }
    require_bars(NAME, prices, slow_period)?;

    let closes = closes(prices);
    let fast = math::ema_series(&closes, fast_period);
    let slow = math::ema_series(&closes, slow_period);

    let start = slow_period - 1;
    let macd_line: Vec<f64> = fast[start..]
        .iter()
        .zip(&slow[start..])
        .filter_map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = math::ema_series(&macd_line, signal_period);

    let mut values = vec![None; start];
    for (macd, signal) in macd_line.iter().zip(signal_line) {
        values.push(Some(MacdPoint {
            macd: *macd,
            signal,
            histogram: signal.map(|s| macd - s),
        }));
    }

    Ok(IndicatorSeries::from_values(values))
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(
    prices: &[PricePoint],
) -> Result<IndicatorSeries<MacdPoint>, IndicatorError> {
    calculate_macd(prices, 12, 26, 9)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacdTrend {
    /// Histogram turned positive on the latest bar
    BullishCrossover,
    /// Histogram turned negative on the latest bar
    BearishCrossover,
    Bullish,
    Bearish,
    Flat,
}

impl MacdTrend {
    pub fn is_bullish(&self) -> bool {
        matches!(self, MacdTrend::BullishCrossover | MacdTrend::Bullish)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, MacdTrend::BearishCrossover | MacdTrend::Bearish)
    }
}

/// Classify the latest bar from the histogram sign and its previous value.
/// Returns `None` while the signal line is still undefined.
pub fn detect_crossover(series: &IndicatorSeries<MacdPoint>) -> Option<MacdTrend> {
    let current = series.last()?.histogram?;
    let previous = series
        .len()
        .checked_sub(2)
        .and_then(|i| series.get(i))
        .and_then(|p| p.histogram);

    let trend = match previous {
        Some(prev) if prev <= 0.0 && current > 0.0 => MacdTrend::BullishCrossover,
        Some(prev) if prev >= 0.0 && current < 0.0 => MacdTrend::BearishCrossover,
        _ if current > 0.0 => MacdTrend::Bullish,
        _ if current < 0.0 => MacdTrend::Bearish,
        _ => MacdTrend::Flat,
    };
    Some(trend)
}
