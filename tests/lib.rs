// Test library for analysis behavior tests
pub use finlens_core::{
    run_analysis, AnalysisError, AnalysisReport, AnalysisRequest, MarketDataProvider, Symbol,
    SymbolStatus, YahooProvider, DEFAULT_BENCHMARK,
};
