//! Base-100 normalization and linear trend fitting.

use crate::metrics::MetricUnavailable;
use crate::PriceSeries;

/// Rescale a series so it starts at exactly 100.0.
///
/// `normalized[i] = close[i] / close[0] * 100`, enabling shape comparison
/// across instruments of different absolute price levels.
pub fn normalize_base_100(series: &PriceSeries) -> Result<Vec<f64>, MetricUnavailable> {
    let first = series
        .points
        .first()
        .ok_or(MetricUnavailable::EmptySeries)?
        .close;
    if first <= 0.0 {
        return Err(MetricUnavailable::NonPositivePrice);
    }

    Ok(series
        .points
        .iter()
        .map(|point| point.close / first * 100.0)
        .collect())
}

/// Degree-1 least-squares fit over (index, value) pairs, returning the fitted
/// sequence at every index.
pub fn linear_trend(values: &[f64]) -> Result<Vec<f64>, MetricUnavailable> {
    let count = values.len();
    if count < 2 {
        return Err(MetricUnavailable::InsufficientHistory {
            required: 2,
            available: count,
        });
    }

    let n = count as f64;
    let sum_x = (0..count).map(|i| i as f64).sum::<f64>();
    let sum_y = values.iter().sum::<f64>();
    let sum_xy = values
        .iter()
        .enumerate()
        .map(|(i, y)| i as f64 * y)
        .sum::<f64>();
    let sum_xx = (0..count).map(|i| (i as f64) * (i as f64)).sum::<f64>();

    let denominator = n * sum_xx - sum_x * sum_x;
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    Ok((0..count).map(|i| slope * i as f64 + intercept).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PricePoint, PriceSeries, Symbol, TradingDate};
    use time::Duration;

    fn series_of(closes: &[f64]) -> PriceSeries {
        let symbol = Symbol::parse("TEST").expect("symbol");
        let anchor = TradingDate::parse("2020-01-01").expect("date").into_inner();
        let points = closes
            .iter()
            .enumerate()
            .map(|(index, close)| {
                let date = TradingDate::from(anchor + Duration::days(index as i64));
                PricePoint::new(date, *close).expect("point")
            })
            .collect();
        PriceSeries::new(symbol, points).expect("series")
    }

    #[test]
    fn first_normalized_value_is_exactly_one_hundred() {
        let series = series_of(&[37.5, 41.0, 36.2]);
        let normalized = normalize_base_100(&series).expect("must normalize");

        assert_eq!(normalized[0], 100.0);
        for (index, point) in series.points.iter().enumerate() {
            let expected = point.close / 37.5 * 100.0;
            assert!((normalized[index] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_series_is_unavailable() {
        let series = series_of(&[]);
        let err = normalize_base_100(&series).expect_err("must fail");
        assert_eq!(err, MetricUnavailable::EmptySeries);
    }

    #[test]
    fn zero_base_price_is_unavailable() {
        let series = series_of(&[0.0, 1.0]);
        let err = normalize_base_100(&series).expect_err("must fail");
        assert_eq!(err, MetricUnavailable::NonPositivePrice);
    }

    #[test]
    fn trend_reproduces_perfectly_linear_input() {
        let values: Vec<f64> = (0..50).map(|i| 100.0 + 0.5 * i as f64).collect();
        let trend = linear_trend(&values).expect("must fit");

        assert_eq!(trend.len(), values.len());
        for (fitted, original) in trend.iter().zip(&values) {
            assert!((fitted - original).abs() < 1e-9);
        }
    }

    #[test]
    fn trend_requires_two_points() {
        let err = linear_trend(&[100.0]).expect_err("must fail");
        assert!(matches!(
            err,
            MetricUnavailable::InsufficientHistory { required: 2, .. }
        ));
    }
}
