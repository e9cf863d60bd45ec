//! Fibonacci retracement / extension levels and time zones

use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{require_bars, require_period};
use crate::models::indicators::{FibonacciLevel, PricePoint};
use chrono::{DateTime, Duration, Utc};

const NAME: &str = "Fibonacci";

pub const RETRACEMENT_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];
pub const EXTENSION_RATIOS: [f64; 4] = [1.272, 1.618, 2.0, 2.618];

/// Retracement level `L` sits at `high - (high - low) * L`
pub fn retracement_levels(
    high: f64,
    low: f64,
    ratios: &[f64],
) -> Result<Vec<FibonacciLevel>, IndicatorError> {
    let range = swing_width(high, low)?;
    Ok(ratios
        .iter()
        .map(|&ratio| FibonacciLevel {
            ratio,
            price: high - range * ratio,
        })
        .collect())
}

/// Extension level `L` sits at `low + (high - low) * L`
pub fn extension_levels(
    high: f64,
    low: f64,
    ratios: &[f64],
) -> Result<Vec<FibonacciLevel>, IndicatorError> {
    let range = swing_width(high, low)?;
    Ok(ratios
        .iter()
        .map(|&ratio| FibonacciLevel {
            ratio,
            price: low + range * ratio,
        })
        .collect())
}

/// Swing high and low over the trailing `lookback` bars
pub fn swing_range(prices: &[PricePoint], lookback: usize) -> Result<(f64, f64), IndicatorError> {
    require_period(NAME, "lookback", lookback)?;
    require_bars(NAME, prices, 1)?;

    let window = &prices[prices.len().saturating_sub(lookback)..];
    let high = window.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
    Ok((high, low))
}

/// Distinct Fibonacci numbers used as zone offsets: 0, 1, 2, 3, 5, 8, ...
pub fn fibonacci_zone_levels(count: usize) -> Vec<u32> {
    let mut levels = Vec::with_capacity(count);
    let (mut a, mut b) = (0u32, 1u32);
    while levels.len() < count {
        if levels.last() != Some(&a) {
            levels.push(a);
        }
        let Some(next) = a.checked_add(b) else {
            break;
        };
        a = b;
        b = next;
    }
    levels
}

/// Project dates at `start + unit * level` for each level
pub fn time_zones(
    start: DateTime<Utc>,
    unit: Duration,
    levels: &[u32],
) -> Result<Vec<DateTime<Utc>>, IndicatorError> {
    if unit <= Duration::zero() {
        return Err(IndicatorError::invalid(NAME, "time zone unit must be positive"));
    }
    levels
        .iter()
        .map(|&level| {
            i32::try_from(level)
                .ok()
                .and_then(|level| unit.checked_mul(level))
                .and_then(|offset| start.checked_add_signed(offset))
                .ok_or_else(|| {
                    IndicatorError::invalid(NAME, format!("time zone level {} overflows", level))
                })
        })
        .collect()
}

fn swing_width(high: f64, low: f64) -> Result<f64, IndicatorError> {
    if !high.is_finite() || !low.is_finite() {
        return Err(IndicatorError::invalid(NAME, "swing high and low must be finite"));
    }
    if high < low {
        return Err(IndicatorError::invalid(
            NAME,
            format!("swing high {} is below swing low {}", high, low),
        ));
    }
    Ok(high - low)
}
