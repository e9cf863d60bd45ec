//! Rolling-window arithmetic shared by the indicator modules.

/// Simple moving average of the trailing `period` values
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Population standard deviation of the trailing `period` values
pub fn standard_deviation(values: &[f64], period: usize) -> Option<f64> {
    let mean = sma(values, period)?;
    let window = &values[values.len() - period..];
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
    Some(variance.sqrt())
}

/// EMA smoothing multiplier `2 / (period + 1)`
pub fn ema_multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// One recursive EMA step
pub fn ema_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    (value - previous) * ema_multiplier(period) + previous
}

/// EMA aligned with `values`: undefined for the first `period - 1` entries,
/// seeded with the SMA of the first `period` values.
pub fn ema_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(prev);
    for i in period..values.len() {
        prev = ema_from_previous(values[i], prev, period);
        out[i] = Some(prev);
    }
    out
}

/// True range of a bar given the prior close
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Donchian midpoint `(highest high + lowest low) / 2` of a window
pub fn donchian_midpoint(highs: &[f64], lows: &[f64]) -> Option<f64> {
    if highs.is_empty() || lows.is_empty() {
        return None;
    }
    let highest = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = lows.iter().copied().fold(f64::INFINITY, f64::min);
    Some((highest + lowest) / 2.0)
}

/// Wilder smoothing aligned with `values`. The seed is the plain sum of
/// `values[first..first + period]`, then
/// `smoothed[i] = smoothed[i-1] - smoothed[i-1] / period + value[i]`.
pub fn wilder_sum_series(values: &[f64], first: usize, period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let seed_end = first + period;
    if period == 0 || values.len() < seed_end {
        return out;
    }
    let mut prev: f64 = values[first..seed_end].iter().sum();
    out[seed_end - 1] = Some(prev);
    for i in seed_end..values.len() {
        prev = prev - prev / period as f64 + values[i];
        out[i] = Some(prev);
    }
    out
}

/// Clamp into `[lo, hi]`, mapping NaN to `lo`
pub fn bounded(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}
