//! Return and risk metrics over a daily price series.

use serde::Serialize;
use thiserror::Error;

use crate::{PriceSeries, Symbol};

/// Fixed trading-days-per-year approximation used by both CAGR and
/// volatility annualization.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Named reason a metric could not be computed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricUnavailable {
    #[error("insufficient history: {required} observations required, {available} available")]
    InsufficientHistory { required: usize, available: usize },

    #[error("series contains a non-positive price")]
    NonPositivePrice,

    #[error("series is empty")]
    EmptySeries,

    #[error("growth horizon must cover at least one year")]
    ZeroHorizon,
}

/// Compound annual growth rate over a whole-year horizon.
///
/// The lookback is index-based: it counts `252 * years` observations back
/// from the last close rather than a calendar span, so holidays and data
/// gaps skew the effective window. This matches the documented behavior of
/// the system being reimplemented.
pub fn cagr(series: &PriceSeries, years: u32) -> Result<f64, MetricUnavailable> {
    if years == 0 {
        return Err(MetricUnavailable::ZeroHorizon);
    }

    let required = TRADING_DAYS_PER_YEAR * years as usize;
    let available = series.len();
    if available < required {
        return Err(MetricUnavailable::InsufficientHistory {
            required,
            available,
        });
    }

    let last = series.points[available - 1].close;
    let start = series.points[available - required].close;
    if start <= 0.0 || last <= 0.0 {
        return Err(MetricUnavailable::NonPositivePrice);
    }

    Ok((last / start).powf(1.0 / f64::from(years)) - 1.0)
}

/// Annualized volatility: population standard deviation of simple daily
/// returns, scaled by sqrt(252).
///
/// A series with fewer than two observations yields no returns at all and is
/// reported unavailable rather than degrading to NaN.
pub fn annualized_volatility(series: &PriceSeries) -> Result<f64, MetricUnavailable> {
    let available = series.len();
    if available < 2 {
        return Err(MetricUnavailable::InsufficientHistory {
            required: 2,
            available,
        });
    }

    let mut returns = Vec::with_capacity(available - 1);
    for pair in series.points.windows(2) {
        let previous = pair[0].close;
        if previous <= 0.0 {
            return Err(MetricUnavailable::NonPositivePrice);
        }
        returns.push(pair[1].close / previous - 1.0);
    }

    let count = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / count;
    let variance = returns
        .iter()
        .map(|value| {
            let delta = value - mean;
            delta * delta
        })
        .sum::<f64>()
        / count;

    Ok(variance.sqrt() * (TRADING_DAYS_PER_YEAR as f64).sqrt())
}

/// Serializable carrier for a metric outcome in report payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValue {
    Available(f64),
    Unavailable { reason: String },
}

impl MetricValue {
    pub fn as_available(&self) -> Option<f64> {
        match self {
            Self::Available(value) => Some(*value),
            Self::Unavailable { .. } => None,
        }
    }
}

impl From<Result<f64, MetricUnavailable>> for MetricValue {
    fn from(result: Result<f64, MetricUnavailable>) -> Self {
        match result {
            Ok(value) => Self::Available(value),
            Err(reason) => Self::Unavailable {
                reason: reason.to_string(),
            },
        }
    }
}

/// Derived metrics record for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolMetrics {
    pub symbol: Symbol,
    pub cagr_1y: MetricValue,
    pub cagr_3y: MetricValue,
    pub cagr_5y: MetricValue,
    pub volatility: MetricValue,
}

impl SymbolMetrics {
    /// Compute the full metrics record for a series.
    pub fn compute(series: &PriceSeries) -> Self {
        Self {
            symbol: series.symbol.clone(),
            cagr_1y: cagr(series, 1).into(),
            cagr_3y: cagr(series, 3).into(),
            cagr_5y: cagr(series, 5).into(),
            volatility: annualized_volatility(series).into(),
        }
    }
}
