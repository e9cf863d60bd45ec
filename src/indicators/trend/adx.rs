//! ADX (Average Directional Index) indicator

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{require_bars, require_period};
use crate::models::indicators::{AdxPoint, IndicatorSeries, PricePoint};

const NAME: &str = "ADX";

/// Calculate ADX with +DI / -DI
///
/// ADX measures trend strength regardless of direction. +DM, -DM and TR are
/// Wilder-smoothed (seeded with a plain sum over `period`), DI lines are
/// defined from bar `period` and ADX, the smoothed DX, from bar `2 * period - 1`.
pub fn calculate_adx(
    prices: &[PricePoint],
    period: usize,
) -> Result<IndicatorSeries<AdxPoint>, IndicatorError> {
    require_period(NAME, "period", period)?;
    require_bars(NAME, prices, 2 * period)?;

    let n = prices.len();
    let mut tr = vec![0.0; n];
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];

    for i in 1..n {
        let (cur, prev) = (&prices[i], &prices[i - 1]);
        tr[i] = math::true_range(cur.high, cur.low, prev.close);

        let up_move = cur.high - prev.high;
        let down_move = prev.low - cur.low;
        if up_move > down_move && up_move > 0.0 {
            plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm[i] = down_move;
        }
    }

    let smoothed_tr = math::wilder_sum_series(&tr, 1, period);
    let smoothed_plus = math::wilder_sum_series(&plus_dm, 1, period);
    let smoothed_minus = math::wilder_sum_series(&minus_dm, 1, period);

    let mut points: Vec<Option<AdxPoint>> = vec![None; n];
    for i in period..n {
        let (Some(tr), Some(plus), Some(minus)) = (smoothed_tr[i], smoothed_plus[i], smoothed_minus[i])
        else {
            continue;
        };
        let (plus_di, minus_di) = if tr > 0.0 {
            (
                math::bounded(100.0 * plus / tr, 0.0, 100.0),
                math::bounded(100.0 * minus / tr, 0.0, 100.0),
            )
        } else {
            (0.0, 0.0)
        };
        let di_sum = plus_di + minus_di;
        let dx = if di_sum > 0.0 {
            100.0 * (plus_di - minus_di).abs() / di_sum
        } else {
            0.0
        };
        points[i] = Some(AdxPoint {
            plus_di,
            minus_di,
            dx,
            adx: None,
        });
    }

    let p = period as f64;
    let first_adx = 2 * period - 1;
    let mut adx: Option<f64> = None;
    for i in first_adx..n {
        let next = match adx {
            None => {
                let seed: f64 = points[period..=first_adx]
                    .iter()
                    .flatten()
                    .map(|pt| pt.dx)
                    .sum();
                seed / p
            }
            Some(prev) => {
                let dx = points[i].map(|pt| pt.dx).unwrap_or(0.0);
                (prev * (p - 1.0) + dx) / p
            }
        };
        let next = math::bounded(next, 0.0, 100.0);
        adx = Some(next);
        if let Some(point) = points[i].as_mut() {
            point.adx = Some(next);
        }
    }

    Ok(IndicatorSeries::from_values(points))
}

/// Calculate ADX with default period (14)
pub fn calculate_adx_default(
    prices: &[PricePoint],
) -> Result<IndicatorSeries<AdxPoint>, IndicatorError> {
    calculate_adx(prices, 14)
}
