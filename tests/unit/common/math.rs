//! Unit tests for shared numeric helpers

use embassy_signals::common::math::{
    bounded, donchian_midpoint, ema_series, sma, standard_deviation, true_range,
};

#[test]
fn test_sma_uses_trailing_window() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(sma(&values, 2), Some(4.5));
    assert_eq!(sma(&values, 5), Some(3.0));
    assert_eq!(sma(&values, 6), None);
    assert_eq!(sma(&values, 0), None);
}

#[test]
fn test_standard_deviation_is_population() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let std = standard_deviation(&values, values.len()).unwrap();
    assert!((std - 2.0).abs() < 1e-12);
}

#[test]
fn test_ema_series_alignment() {
    let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
    let ema = ema_series(&values, 4);
    assert_eq!(ema.len(), values.len());
    assert!(ema[..3].iter().all(Option::is_none));
    assert_eq!(ema[3], Some(2.5));
    assert!(ema[4..].iter().all(Option::is_some));
}

#[test]
fn test_true_range_covers_gaps() {
    assert_eq!(true_range(10.0, 8.0, 9.0), 2.0);
    assert_eq!(true_range(10.0, 9.5, 6.0), 4.0);
    assert_eq!(true_range(7.0, 6.0, 9.0), 3.0);
}

#[test]
fn test_donchian_midpoint() {
    assert_eq!(donchian_midpoint(&[3.0, 5.0, 4.0], &[1.0, 2.0, 2.5]), Some(3.0));
    assert_eq!(donchian_midpoint(&[], &[]), None);
}

#[test]
fn test_bounded() {
    assert_eq!(bounded(-0.3, 0.0, 1.0), 0.0);
    assert_eq!(bounded(0.4, 0.0, 1.0), 0.4);
    assert_eq!(bounded(f64::NAN, 0.0, 0.95), 0.0);
}
