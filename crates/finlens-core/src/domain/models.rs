use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDate, ValidationError};

/// Single daily closing-price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: TradingDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: TradingDate, close: f64) -> Result<Self, ValidationError> {
        validate_non_negative("close", close)?;
        Ok(Self { date, close })
    }
}

/// Ordered daily price history for one instrument.
///
/// Dates are strictly ascending; gap policy is whatever the upstream source
/// returned, never enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        for (index, pair) in points.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(ValidationError::NonAscendingDates { index: index + 1 });
            }
        }
        Ok(Self { symbol, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|point| point.close)
    }
}

/// Valuation and profitability figures for one instrument, each optionally
/// absent when the provider does not report it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValuationRatios {
    pub pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub net_margin: Option<f64>,
}

impl ValuationRatios {
    pub fn new(
        pe: Option<f64>,
        price_to_book: Option<f64>,
        return_on_equity: Option<f64>,
        debt_to_equity: Option<f64>,
        net_margin: Option<f64>,
    ) -> Result<Self, ValidationError> {
        validate_optional_finite("pe", pe)?;
        validate_optional_finite("price_to_book", price_to_book)?;
        validate_optional_finite("return_on_equity", return_on_equity)?;
        validate_optional_finite("debt_to_equity", debt_to_equity)?;
        validate_optional_finite("net_margin", net_margin)?;

        Ok(Self {
            pe,
            price_to_book,
            return_on_equity,
            debt_to_equity,
            net_margin,
        })
    }

    pub const fn empty() -> Self {
        Self {
            pe: None,
            price_to_book: None,
            return_on_equity: None,
            debt_to_equity: None,
            net_margin: None,
        }
    }
}

/// Company metadata snapshot for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: Symbol,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub description: Option<String>,
    pub ratios: ValuationRatios,
}

impl CompanyProfile {
    pub fn new(
        symbol: Symbol,
        name: Option<String>,
        sector: Option<String>,
        description: Option<String>,
        ratios: ValuationRatios,
    ) -> Self {
        Self {
            symbol,
            name,
            sector,
            description,
            ratios,
        }
    }

    /// Bare profile with no metadata, used for indices and sparse listings.
    pub fn unnamed(symbol: Symbol) -> Self {
        Self::new(symbol, None, None, None, ValuationRatios::empty())
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

fn validate_optional_finite(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field });
        }
    }
    Ok(())
}
