//! Behavior-driven tests for the analysis pipeline
//!
//! These tests verify HOW the system assembles a report from a request,
//! focusing on symbol gating, per-symbol error isolation and the fixed
//! benchmark.

use finlens_core::{
    run_analysis, AnalysisError, AnalysisRequest, Symbol, SymbolStatus, YahooProvider,
    DEFAULT_BENCHMARK,
};

fn symbol(input: &str) -> Symbol {
    Symbol::parse(input).expect("valid symbol")
}

fn request(primary: &str, comparisons: &[&str]) -> AnalysisRequest {
    AnalysisRequest::new(
        symbol(primary),
        comparisons.iter().map(|raw| symbol(raw)).collect(),
        symbol(DEFAULT_BENCHMARK),
    )
    .expect("valid request")
}

// =============================================================================
// Analysis: Happy Path
// =============================================================================

#[tokio::test]
async fn when_primary_is_tradable_report_covers_primary_and_benchmark() {
    // Given: An offline provider serving the deterministic catalog
    let provider = YahooProvider::default();

    // When: The user analyzes a single cataloged ticker
    let report = run_analysis(&provider, &request("AAPL", &[]))
        .await
        .expect("analysis should succeed");

    // Then: The report carries the primary plus the benchmark, in order
    assert_eq!(report.primary.as_str(), "AAPL");
    assert_eq!(report.benchmark.as_str(), DEFAULT_BENCHMARK);
    assert_eq!(report.instruments.len(), 2);
    assert_eq!(report.instruments[0].profile.symbol.as_str(), "AAPL");
    assert_eq!(report.instruments[1].profile.symbol.as_str(), "^GSPC");
    assert!(report.rejected.is_empty());

    // And: The profile panel belongs to the primary
    assert_eq!(report.profile.symbol.as_str(), "AAPL");
    assert!(report.profile.name.is_some(), "cataloged equity has a name");
}

#[tokio::test]
async fn when_history_spans_five_years_all_metrics_are_available() {
    // Given: A full five-year mock history
    let provider = YahooProvider::default();

    // When: The analysis runs
    let report = run_analysis(&provider, &request("MSFT", &[]))
        .await
        .expect("analysis should succeed");

    // Then: Every CAGR horizon and the volatility resolve to numbers
    let metrics = &report.instruments[0].metrics;
    assert!(metrics.cagr_1y.as_available().is_some());
    assert!(metrics.cagr_3y.as_available().is_some());
    assert!(metrics.cagr_5y.as_available().is_some());
    let volatility = metrics.volatility.as_available().expect("volatility");
    assert!(volatility >= 0.0);
}

#[tokio::test]
async fn when_series_normalizes_every_instrument_starts_at_one_hundred() {
    // Given: Instruments trading at very different price levels
    let provider = YahooProvider::default();

    // When: The analysis runs with a comparison
    let report = run_analysis(&provider, &request("AAPL", &["GOOGL"]))
        .await
        .expect("analysis should succeed");

    // Then: Every normalized series starts at exactly 100
    assert_eq!(report.instruments.len(), 3);
    for instrument in &report.instruments {
        let first = instrument.normalized.points[0].1;
        assert_eq!(first, 100.0, "{} must rebase to 100", instrument.profile.symbol);
    }
}

#[tokio::test]
async fn when_report_assembles_trend_follows_only_the_primary() {
    // Given: A primary with comparisons
    let provider = YahooProvider::default();

    // When: The analysis runs
    let report = run_analysis(&provider, &request("AAPL", &["MSFT"]))
        .await
        .expect("analysis should succeed");

    // Then: One trend line exists, labeled for the primary, matching its length
    let trend = report.trend.as_ref().expect("trend for the primary");
    assert_eq!(trend.label, "Trend (AAPL)");
    assert_eq!(
        trend.points.len(),
        report.instruments[0].normalized.points.len()
    );
}

#[tokio::test]
async fn when_comparison_table_builds_it_has_one_row_per_instrument() {
    // Given: Two comparisons plus the benchmark
    let provider = YahooProvider::default();

    // When: The analysis runs
    let report = run_analysis(&provider, &request("AAPL", &["MSFT", "GOOGL"]))
        .await
        .expect("analysis should succeed");

    // Then: Four rows, labeled by symbol, four metric columns each
    assert_eq!(report.comparison.rows.len(), 4);
    assert_eq!(report.comparison.columns.len(), 4);
    let labels: Vec<&str> = report
        .comparison
        .rows
        .iter()
        .map(|row| row.label.as_str())
        .collect();
    assert_eq!(labels, vec!["AAPL", "MSFT", "GOOGL", "^GSPC"]);
}

// =============================================================================
// Analysis: Symbol Gating and Isolation
// =============================================================================

#[tokio::test]
async fn when_comparison_symbol_is_unknown_rest_of_run_continues() {
    // Given: One comparison that the provider does not know
    let provider = YahooProvider::default();

    // When: The analysis runs
    let report = run_analysis(&provider, &request("AAPL", &["ZZZINVALID"]))
        .await
        .expect("analysis should still succeed");

    // Then: The bad symbol lands in rejected and the rest is intact
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].symbol.as_str(), "ZZZINVALID");
    assert_eq!(report.rejected[0].status, SymbolStatus::Unknown);
    assert_eq!(report.instruments.len(), 2);
}

#[tokio::test]
async fn when_primary_is_unknown_analysis_aborts() {
    // Given: A primary the provider does not know
    let provider = YahooProvider::default();

    // When: The analysis runs
    let result = run_analysis(&provider, &request("ZZZINVALID", &["AAPL"])).await;

    // Then: The whole run fails with the gating outcome attached
    let error = result.expect_err("unknown primary must abort");
    match error {
        AnalysisError::PrimaryRejected { symbol, status } => {
            assert_eq!(symbol.as_str(), "ZZZINVALID");
            assert_eq!(status, SymbolStatus::Unknown);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn when_benchmark_duplicates_a_requested_symbol_it_appears_once() {
    // Given: The benchmark itself requested as the primary
    let provider = YahooProvider::default();
    let request = AnalysisRequest::new(
        symbol(DEFAULT_BENCHMARK),
        vec![symbol("AAPL")],
        symbol(DEFAULT_BENCHMARK),
    )
    .expect("valid request");

    // When: The analysis runs
    let report = run_analysis(&provider, &request)
        .await
        .expect("analysis should succeed");

    // Then: The benchmark is not fetched twice
    assert_eq!(report.instruments.len(), 2);
    assert_eq!(report.instruments[0].profile.symbol.as_str(), "^GSPC");
    assert_eq!(report.instruments[1].profile.symbol.as_str(), "AAPL");
}

#[tokio::test]
async fn when_three_comparisons_are_requested_the_request_is_rejected() {
    // Given: One comparison too many

    // When: The request is built
    let result = AnalysisRequest::new(
        symbol("AAPL"),
        vec![symbol("MSFT"), symbol("GOOGL"), symbol("AMZN")],
        symbol(DEFAULT_BENCHMARK),
    );

    // Then: Validation fails before anything is fetched
    assert!(result.is_err());
}

#[tokio::test]
async fn when_symbols_arrive_lowercase_the_catalog_still_resolves_them() {
    // Given: A lowercase ticker, preserved as typed
    let provider = YahooProvider::default();
    let request = AnalysisRequest::new(symbol("aapl"), vec![], symbol(DEFAULT_BENCHMARK))
        .expect("valid request");

    // When: The analysis runs
    let report = run_analysis(&provider, &request)
        .await
        .expect("lowercase input must resolve");

    // Then: The report echoes the symbol exactly as typed
    assert_eq!(report.primary.as_str(), "aapl");
    assert_eq!(report.instruments.len(), 2);
}

// =============================================================================
// Analysis: Ratios Panel
// =============================================================================

#[tokio::test]
async fn when_ratios_table_builds_it_carries_the_five_named_figures() {
    // Given: An equity with a full catalog profile
    let provider = YahooProvider::default();

    // When: The analysis runs
    let report = run_analysis(&provider, &request("AAPL", &[]))
        .await
        .expect("analysis should succeed");

    // Then: All five ratio rows are present, in order
    let labels: Vec<&str> = report
        .ratios
        .rows
        .iter()
        .map(|row| row.label.as_str())
        .collect();
    assert_eq!(labels, vec!["P/E", "P/B", "ROE", "Debt/Equity", "Net Margin"]);
}

#[tokio::test]
async fn when_the_primary_is_an_index_the_profile_panel_degrades_to_na() {
    // Given: An index symbol with no company metadata
    let provider = YahooProvider::default();
    let request = AnalysisRequest::new(symbol("^GSPC"), vec![], symbol(DEFAULT_BENCHMARK))
        .expect("valid request");

    // When: The analysis runs
    let report = run_analysis(&provider, &request)
        .await
        .expect("analysis should succeed");

    // Then: Ratio cells degrade to the placeholder instead of failing
    assert!(report.profile.sector.is_none());
    for row in &report.ratios.rows {
        assert_eq!(row.cells, vec!["N/A"]);
    }
}
