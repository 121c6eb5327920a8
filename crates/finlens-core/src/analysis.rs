//! Analysis pipeline: validate, fetch, derive, assemble.
//!
//! One request covers the primary instrument, up to two comparison symbols
//! and a fixed market benchmark. Each symbol is processed independently so a
//! single bad ticker degrades the report instead of failing it, with one
//! exception: a rejected primary aborts the run because every downstream
//! panel hangs off it.

use serde::Serialize;
use thiserror::Error;

use crate::metrics::SymbolMetrics;
use crate::normalize::{linear_trend, normalize_base_100};
use crate::provider::{HistoryRequest, MarketDataProvider, ProfileRequest};
use crate::report::{comparison_table, ratios_table, TableRecord};
use crate::validate::{validate_symbol, SymbolStatus};
use crate::{CompanyProfile, HistoryRange, Symbol, TradingDate, ValidationError};

/// Benchmark appended to every analysis.
pub const DEFAULT_BENCHMARK: &str = "^GSPC";

/// Maximum number of comparison symbols per request.
pub const MAX_COMPARISONS: usize = 2;

/// Validated analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub primary: Symbol,
    pub comparisons: Vec<Symbol>,
    pub benchmark: Symbol,
}

impl AnalysisRequest {
    pub fn new(
        primary: Symbol,
        comparisons: Vec<Symbol>,
        benchmark: Symbol,
    ) -> Result<Self, ValidationError> {
        if comparisons.len() > MAX_COMPARISONS {
            return Err(ValidationError::TooManyComparisons {
                got: comparisons.len(),
                max: MAX_COMPARISONS,
            });
        }
        Ok(Self {
            primary,
            comparisons,
            benchmark,
        })
    }

    /// Processing order: primary, comparisons, benchmark, with duplicates
    /// collapsed to their first occurrence.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut ordered = Vec::with_capacity(self.comparisons.len() + 2);
        ordered.push(self.primary.clone());
        for symbol in &self.comparisons {
            if !ordered.contains(symbol) {
                ordered.push(symbol.clone());
            }
        }
        if !ordered.contains(&self.benchmark) {
            ordered.push(self.benchmark.clone());
        }
        ordered
    }
}

/// Reasons an analysis run fails outright.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("primary symbol '{symbol}' rejected: {status}")]
    PrimaryRejected { symbol: Symbol, status: SymbolStatus },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Symbol dropped from the report, with the gating outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedSymbol {
    pub symbol: Symbol,
    pub status: SymbolStatus,
}

/// One plottable line: a label plus (date, value) pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(TradingDate, f64)>,
}

impl ChartSeries {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, value)| *value).collect()
    }
}

/// Everything derived for one accepted instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentAnalysis {
    pub profile: CompanyProfile,
    pub metrics: SymbolMetrics,
    pub normalized: ChartSeries,
}

/// Assembled analysis report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub primary: Symbol,
    pub benchmark: Symbol,
    pub profile: CompanyProfile,
    pub instruments: Vec<InstrumentAnalysis>,
    pub trend: Option<ChartSeries>,
    pub rejected: Vec<RejectedSymbol>,
    pub comparison: TableRecord,
    pub ratios: TableRecord,
}

/// Validate, fetch and derive every symbol in the request, then assemble the
/// report.
///
/// Symbols are processed sequentially in request order. A symbol that fails
/// validation, or whose five-year fetch fails after validating, lands in
/// `rejected` and the rest of the run continues.
///
/// # Errors
///
/// Returns [`AnalysisError::PrimaryRejected`] when the primary symbol does
/// not survive the gate; nothing is fetched for the remaining symbols in
/// that case.
pub async fn run_analysis(
    provider: &dyn MarketDataProvider,
    request: &AnalysisRequest,
) -> Result<AnalysisReport, AnalysisError> {
    let mut instruments = Vec::new();
    let mut rejected = Vec::new();
    let mut trend = None;

    for symbol in request.symbols() {
        let is_primary = symbol == request.primary;

        let status = validate_symbol(provider, &symbol).await;
        if !status.is_tradable() {
            if is_primary {
                return Err(AnalysisError::PrimaryRejected { symbol, status });
            }
            rejected.push(RejectedSymbol { symbol, status });
            continue;
        }

        match analyze_symbol(provider, &symbol).await {
            Ok(analysis) => {
                if is_primary {
                    trend = fit_trend(&symbol, &analysis.normalized);
                }
                instruments.push(analysis);
            }
            // Validated but the full fetch failed: treat as unreachable.
            Err(status) => {
                if is_primary {
                    return Err(AnalysisError::PrimaryRejected { symbol, status });
                }
                rejected.push(RejectedSymbol { symbol, status });
            }
        }
    }

    let profile = instruments
        .first()
        .map(|analysis| analysis.profile.clone())
        .ok_or_else(|| AnalysisError::PrimaryRejected {
            symbol: request.primary.clone(),
            status: SymbolStatus::Unknown,
        })?;

    let metrics: Vec<SymbolMetrics> = instruments
        .iter()
        .map(|analysis| analysis.metrics.clone())
        .collect();

    Ok(AnalysisReport {
        primary: request.primary.clone(),
        benchmark: request.benchmark.clone(),
        comparison: comparison_table(&metrics),
        ratios: ratios_table(&profile),
        profile,
        instruments,
        trend,
        rejected,
    })
}

async fn analyze_symbol(
    provider: &dyn MarketDataProvider,
    symbol: &Symbol,
) -> Result<InstrumentAnalysis, SymbolStatus> {
    let history = provider
        .history(HistoryRequest::new(symbol.clone(), HistoryRange::FiveYears))
        .await
        .map_err(|error| SymbolStatus::Unreachable {
            message: error.message().to_owned(),
        })?;

    // Profile failures never gate a validated symbol; indices routinely have
    // no company metadata.
    let profile = match provider.profile(ProfileRequest::new(symbol.clone())).await {
        Ok(profile) => profile,
        Err(_) => CompanyProfile::unnamed(symbol.clone()),
    };

    let metrics = SymbolMetrics::compute(&history);
    let normalized = match normalize_base_100(&history) {
        Ok(values) => ChartSeries {
            label: symbol.to_string(),
            points: history
                .points
                .iter()
                .zip(values)
                .map(|(point, value)| (point.date, value))
                .collect(),
        },
        Err(_) => ChartSeries {
            label: symbol.to_string(),
            points: Vec::new(),
        },
    };

    Ok(InstrumentAnalysis {
        profile,
        metrics,
        normalized,
    })
}

fn fit_trend(symbol: &Symbol, normalized: &ChartSeries) -> Option<ChartSeries> {
    let values = normalized.values();
    let fitted = linear_trend(&values).ok()?;
    Some(ChartSeries {
        label: format!("Trend ({symbol})"),
        points: normalized
            .points
            .iter()
            .zip(fitted)
            .map(|((date, _), value)| (*date, value))
            .collect(),
    })
}
