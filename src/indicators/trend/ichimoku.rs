//! Ichimoku Cloud indicator

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{require_bars, require_period};
use crate::models::indicators::{
    CloudProjection, IchimokuCloud, IchimokuPoint, IndicatorSeries, PricePoint,
};
use serde::{Deserialize, Serialize};

const NAME: &str = "Ichimoku";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IchimokuParams {
    pub tenkan: usize,
    pub kijun: usize,
    pub senkou_b: usize,
    pub displacement: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            tenkan: 9,
            kijun: 26,
            senkou_b: 52,
            displacement: 26,
        }
    }
}

impl IchimokuParams {
    pub fn required_bars(&self) -> usize {
        self.tenkan.max(self.kijun).max(self.senkou_b) + self.displacement
    }
}

/// Calculate the Ichimoku Cloud
///
/// Tenkan-sen / Kijun-sen / Senkou B are Donchian midpoints over their
/// windows. Senkou A = (Tenkan + Kijun) / 2. Both spans are plotted
/// `displacement` bars ahead; spans landing past the last bar go into
/// `projection`. Chikou is the close plotted `displacement` bars back.
pub fn calculate_ichimoku(
    prices: &[PricePoint],
    params: IchimokuParams,
) -> Result<IchimokuCloud, IndicatorError> {
    require_period(NAME, "tenkan", params.tenkan)?;
    require_period(NAME, "kijun", params.kijun)?;
    require_period(NAME, "senkou B", params.senkou_b)?;
    require_bars(NAME, prices, params.required_bars())?;

    let n = prices.len();
    let d = params.displacement;
    let highs: Vec<f64> = prices.iter().map(|p| p.high).collect();
    let lows: Vec<f64> = prices.iter().map(|p| p.low).collect();

    let tenkan = donchian_series(&highs, &lows, params.tenkan);
    let kijun = donchian_series(&highs, &lows, params.kijun);
    let span_b = donchian_series(&highs, &lows, params.senkou_b);

    let span_a_at = |source: usize| -> Option<f64> { Some((tenkan[source]? + kijun[source]?) / 2.0) };

    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let source = i.checked_sub(d);
        let point = IchimokuPoint {
            tenkan_sen: tenkan[i],
            kijun_sen: kijun[i],
            senkou_span_a: source.and_then(span_a_at),
            senkou_span_b: source.and_then(|s| span_b[s]),
            chikou_span: prices.get(i + d).map(|p| p.close),
        };
        let defined = point != IchimokuPoint::default();
        points.push(defined.then_some(point));
    }

    let projection = (1..=d)
        .map(|offset| {
            let source = n - 1 + offset - d;
            CloudProjection {
                offset,
                senkou_span_a: span_a_at(source),
                senkou_span_b: span_b[source],
            }
        })
        .collect();

    Ok(IchimokuCloud {
        series: IndicatorSeries::from_values(points),
        projection,
        displacement: d,
    })
}

/// Calculate Ichimoku with default parameters (9, 26, 52, 26)
pub fn calculate_ichimoku_default(prices: &[PricePoint]) -> Result<IchimokuCloud, IndicatorError> {
    calculate_ichimoku(prices, IchimokuParams::default())
}

fn donchian_series(highs: &[f64], lows: &[f64], period: usize) -> Vec<Option<f64>> {
    (0..highs.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let start = i + 1 - period;
            math::donchian_midpoint(&highs[start..=i], &lows[start..=i])
        })
        .collect()
}
