//! Mathematical correctness tests for derived metrics
//!
//! These tests pin down the numeric behavior of CAGR, annualized volatility
//! and the normalization/trend helpers against hand-computable inputs.

use finlens_core::{
    annualized_volatility, cagr, linear_trend, normalize_base_100, MetricUnavailable, PricePoint,
    PriceSeries, Symbol, SymbolMetrics, TradingDate, TRADING_DAYS_PER_YEAR,
};
use time::Duration;

fn series_of(closes: &[f64]) -> PriceSeries {
    let symbol = Symbol::parse("TEST").expect("valid symbol");
    let anchor = TradingDate::parse("2019-01-01").expect("date").into_inner();
    let points = closes
        .iter()
        .enumerate()
        .map(|(index, close)| {
            let date = TradingDate::from(anchor + Duration::days(index as i64));
            PricePoint::new(date, *close).expect("valid point")
        })
        .collect();
    PriceSeries::new(symbol, points).expect("valid series")
}

// =============================================================================
// CAGR: Horizon Windows
// =============================================================================

#[test]
fn cagr_horizons_unlock_exactly_at_their_observation_counts() {
    // Given: Exactly one year of observations
    let series = series_of(&vec![50.0; TRADING_DAYS_PER_YEAR]);

    // Then: Only the one-year horizon is computable
    assert!(cagr(&series, 1).is_ok());
    assert!(matches!(
        cagr(&series, 3),
        Err(MetricUnavailable::InsufficientHistory { .. })
    ));
    assert!(matches!(
        cagr(&series, 5),
        Err(MetricUnavailable::InsufficientHistory { .. })
    ));
}

#[test]
fn cagr_lookback_counts_observations_not_calendar_days() {
    // Given: Five years of observations where only the last 252 move
    let mut closes = vec![100.0; 5 * TRADING_DAYS_PER_YEAR];
    let len = closes.len();
    for (offset, close) in closes[len - TRADING_DAYS_PER_YEAR..].iter_mut().enumerate() {
        *close = 100.0 + offset as f64;
    }
    let series = series_of(&closes);

    // Then: The one-year window starts 252 observations back, so its start
    // price is the first moved observation, not a calendar lookup
    let start = closes[len - TRADING_DAYS_PER_YEAR];
    let last = closes[len - 1];
    let expected = last / start - 1.0;
    let value = cagr(&series, 1).expect("must compute");
    assert!((value - expected).abs() < 1e-12);
}

#[test]
fn cagr_is_negative_for_a_declining_series() {
    // Given: A series that loses value over the year
    let closes: Vec<f64> = (0..TRADING_DAYS_PER_YEAR)
        .map(|index| 200.0 - index as f64 * 0.2)
        .collect();
    let series = series_of(&closes);

    // Then: The derived growth rate is negative
    let value = cagr(&series, 1).expect("must compute");
    assert!(value < 0.0);
}

#[test]
fn multi_year_cagr_annualizes_the_total_return() {
    // Given: Five years over which the price exactly quadruples
    let count = 5 * TRADING_DAYS_PER_YEAR;
    let closes: Vec<f64> = (0..count)
        .map(|index| 100.0 * 4.0_f64.powf(index as f64 / (count - 1) as f64))
        .collect();
    let series = series_of(&closes);

    // Then: The five-year CAGR is the annualized fifth root of 4
    let value = cagr(&series, 5).expect("must compute");
    let expected = 4.0_f64.powf(1.0 / 5.0) - 1.0;
    assert!((value - expected).abs() < 1e-9);
}

// =============================================================================
// Volatility: Dispersion of Daily Returns
// =============================================================================

#[test]
fn constant_growth_rate_has_zero_volatility() {
    // Given: A geometric series with identical daily returns
    let closes: Vec<f64> = (0..500).map(|index| 100.0 * 1.001_f64.powi(index)).collect();
    let series = series_of(&closes);

    // Then: The return dispersion is zero up to floating point noise
    let value = annualized_volatility(&series).expect("must compute");
    assert!(value.abs() < 1e-9);
}

#[test]
fn alternating_returns_produce_strictly_positive_volatility() {
    // Given: A series oscillating between two levels
    let closes: Vec<f64> = (0..100)
        .map(|index| if index % 2 == 0 { 100.0 } else { 102.0 })
        .collect();
    let series = series_of(&closes);

    let value = annualized_volatility(&series).expect("must compute");
    assert!(value > 0.0);
}

#[test]
fn volatility_never_goes_negative() {
    // Given: Several qualitatively different series
    let candidates = [
        series_of(&[100.0, 101.0]),
        series_of(&vec![10.0; 50]),
        series_of(&(0..300).map(|i| 100.0 + (i as f64).sin().abs() * 5.0 + i as f64 * 0.01).collect::<Vec<_>>()),
    ];

    for series in &candidates {
        let value = annualized_volatility(series).expect("must compute");
        assert!(value >= 0.0);
    }
}

// =============================================================================
// Normalization and Trend
// =============================================================================

#[test]
fn normalization_preserves_relative_shape() {
    // Given: The same shape at two different price levels
    let low = series_of(&[10.0, 11.0, 12.5, 11.5]);
    let high = series_of(&[1000.0, 1100.0, 1250.0, 1150.0]);

    // Then: Both normalize to identical sequences
    let low_normalized = normalize_base_100(&low).expect("must normalize");
    let high_normalized = normalize_base_100(&high).expect("must normalize");
    for (a, b) in low_normalized.iter().zip(&high_normalized) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn fitting_a_trend_twice_is_a_fixed_point() {
    // Given: A noisy but trending sequence
    let values: Vec<f64> = (0..100)
        .map(|index| 100.0 + index as f64 * 0.3 + if index % 2 == 0 { 1.0 } else { -1.0 })
        .collect();

    // When: The fitted output is fitted again
    let once = linear_trend(&values).expect("must fit");
    let twice = linear_trend(&once).expect("must fit");

    // Then: The second fit reproduces the first
    for (a, b) in once.iter().zip(&twice) {
        assert!((a - b).abs() < 1e-9);
    }
}

// =============================================================================
// Metrics Record
// =============================================================================

#[test]
fn metrics_record_degrades_per_metric_not_wholesale() {
    // Given: Enough history for volatility and 1y CAGR but nothing longer
    let closes: Vec<f64> = (0..TRADING_DAYS_PER_YEAR)
        .map(|index| 100.0 + index as f64 * 0.1)
        .collect();
    let series = series_of(&closes);

    // When: The full record computes
    let metrics = SymbolMetrics::compute(&series);

    // Then: Available and unavailable metrics coexist in one record
    assert!(metrics.cagr_1y.as_available().is_some());
    assert!(metrics.cagr_3y.as_available().is_none());
    assert!(metrics.cagr_5y.as_available().is_none());
    assert!(metrics.volatility.as_available().is_some());
}
