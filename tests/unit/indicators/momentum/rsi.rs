//! Unit tests for RSI indicator

use crate::test_utils::{choppy_prices, trending_prices};
use embassy_signals::indicators::momentum::{calculate_rsi, calculate_rsi_default};
use embassy_signals::indicators::IndicatorError;

#[test]
fn test_rsi_insufficient_data() {
    let prices = trending_prices(13, 100.0, 1.0);
    assert!(matches!(
        calculate_rsi_default(&prices),
        Err(IndicatorError::InsufficientData {
            required: 15,
            available: 13,
            ..
        })
    ));
}

#[test]
fn test_rsi_first_value_at_period() {
    let prices = choppy_prices(15, 100.0);
    let rsi = calculate_rsi(&prices, 14).unwrap();
    assert_eq!(rsi.first_defined_index(), Some(14));
    assert_eq!(rsi.len(), 15);
}

#[test]
fn test_rsi_no_losses_is_100() {
    let prices = trending_prices(30, 100.0, 1.0);
    let rsi = calculate_rsi_default(&prices).unwrap();
    assert!(rsi.defined().all(|(_, v)| *v == 100.0));
}

#[test]
fn test_rsi_downtrend_is_low() {
    let prices = trending_prices(30, 100.0, -1.0);
    let rsi = calculate_rsi_default(&prices).unwrap();
    assert_eq!(rsi.last(), Some(&0.0));
}

#[test]
fn test_rsi_bounded() {
    let prices = choppy_prices(120, 40.0);
    let rsi = calculate_rsi_default(&prices).unwrap();
    assert!(rsi.defined().all(|(_, v)| (0.0..=100.0).contains(v)));
}

#[test]
fn test_rsi_zero_period_rejected() {
    let prices = trending_prices(30, 100.0, 1.0);
    assert!(matches!(
        calculate_rsi(&prices, 0),
        Err(IndicatorError::InvalidParameter { .. })
    ));
}
