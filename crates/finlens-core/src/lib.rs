//! Core contracts for finlens.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The market data provider trait and its Yahoo Finance adapter
//! - Ticker validation, return/risk metrics and series normalization
//! - Report assembly and workbook export

pub mod adapters;
pub mod analysis;
pub mod domain;
pub mod error;
pub mod export;
pub mod http_client;
pub mod metrics;
pub mod normalize;
pub mod provider;
pub mod report;
pub mod validate;

pub use adapters::{YahooAuthManager, YahooProvider};
pub use analysis::{
    run_analysis, AnalysisError, AnalysisReport, AnalysisRequest, ChartSeries, InstrumentAnalysis,
    RejectedSymbol, DEFAULT_BENCHMARK, MAX_COMPARISONS,
};
pub use domain::{
    CompanyProfile, HistoryRange, PricePoint, PriceSeries, Symbol, TradingDate, ValuationRatios,
};
pub use error::ValidationError;
pub use export::{
    export_report, write_workbook, ExportError, COMPARISON_SHEET, DEFAULT_EXPORT_FILENAME,
    EXPORT_MIME, RATIOS_SHEET,
};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
pub use metrics::{
    annualized_volatility, cagr, MetricUnavailable, MetricValue, SymbolMetrics,
    TRADING_DAYS_PER_YEAR,
};
pub use normalize::{linear_trend, normalize_base_100};
pub use provider::{
    HistoryRequest, MarketDataProvider, ProfileRequest, ProviderError, ProviderErrorKind,
};
pub use report::{
    comparison_table, format_percent, format_ratio, ratios_table, TableRecord, TableRow,
    NOT_AVAILABLE,
};
pub use validate::{validate_symbol, SymbolStatus};
