use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One bar of price history as delivered by the market-data feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub volume: Option<f64>,
}

impl PricePoint {
    pub fn new(date: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// A derived series aligned index-for-index with its input prices.
/// Entries without enough look-back are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSeries<T> {
    values: Vec<Option<T>>,
}

impl<T> IndicatorSeries<T> {
    pub fn from_values(values: Vec<Option<T>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Value at the final index, if defined there
    pub fn last(&self) -> Option<&T> {
        self.values.last().and_then(Option::as_ref)
    }

    /// Most recent defined value with its index
    pub fn last_defined(&self) -> Option<(usize, &T)> {
        self.values
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, v)| v.as_ref().map(|v| (i, v)))
    }

    /// Index of the first defined value
    pub fn first_defined_index(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }

    /// Defined values with their indices
    pub fn defined(&self) -> impl Iterator<Item = (usize, &T)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (i, v)))
    }

    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub macd: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdxPoint {
    pub plus_di: f64,
    pub minus_di: f64,
    pub dx: f64,
    /// Defined once `2 * period` bars have been seen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adx: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerPoint {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerPoint {
    /// Position of `price` inside the bands: 0 at the lower band, 1 at the upper
    pub fn percent_b(&self, price: f64) -> Option<f64> {
        let width = self.upper - self.lower;
        if width <= 0.0 {
            return None;
        }
        Some((price - self.lower) / width)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IchimokuPoint {
    pub tenkan_sen: Option<f64>,
    pub kijun_sen: Option<f64>,
    pub senkou_span_a: Option<f64>,
    pub senkou_span_b: Option<f64>,
    pub chikou_span: Option<f64>,
}

/// Leading spans plotted past the final bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudProjection {
    /// Bars after the last input bar (1-based)
    pub offset: usize,
    pub senkou_span_a: Option<f64>,
    pub senkou_span_b: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IchimokuCloud {
    pub series: IndicatorSeries<IchimokuPoint>,
    pub projection: Vec<CloudProjection>,
    pub displacement: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
}
