//! Unit tests for price-series validation

use crate::test_utils::{base_date, trending_prices};
use chrono::Duration;
use embassy_signals::indicators::{require_bars, validate_series, IndicatorError};
use embassy_signals::models::PricePoint;

#[test]
fn test_ordered_series_passes() {
    assert!(validate_series(&trending_prices(10, 100.0, 1.0)).is_ok());
    assert!(validate_series(&[]).is_ok());
}

#[test]
fn test_duplicate_date_rejected() {
    let mut prices = trending_prices(5, 100.0, 1.0);
    prices[3].date = prices[2].date;
    assert_eq!(
        validate_series(&prices),
        Err(IndicatorError::UnorderedSeries { index: 3 })
    );
}

#[test]
fn test_out_of_order_rejected() {
    let prices = vec![
        PricePoint::new(base_date() + Duration::days(1), 1.0, 1.0, 1.0, 1.0),
        PricePoint::new(base_date(), 1.0, 1.0, 1.0, 1.0),
    ];
    assert_eq!(
        validate_series(&prices),
        Err(IndicatorError::UnorderedSeries { index: 1 })
    );
}

#[test]
fn test_require_bars_reports_counts() {
    let prices = trending_prices(3, 100.0, 1.0);
    match require_bars("RSI", &prices, 15) {
        Err(IndicatorError::InsufficientData {
            indicator,
            required,
            available,
        }) => {
            assert_eq!(indicator, "RSI");
            assert_eq!(required, 15);
            assert_eq!(available, 3);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}
