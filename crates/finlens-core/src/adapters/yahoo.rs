use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Instant;

use serde::Deserialize;
use time::Duration;

use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::provider::{HistoryRequest, MarketDataProvider, ProfileRequest, ProviderError};
use crate::{
    CompanyProfile, HistoryRange, PricePoint, PriceSeries, Symbol, TradingDate, ValidationError,
    ValuationRatios,
};

const YAHOO_REFERER: &str = "https://finance.yahoo.com/";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

// ============================================================================
// Yahoo Auth Manager - crumb token handling
// ============================================================================

/// Manages the crumb token Yahoo's quoteSummary endpoint requires.
///
/// The session cookie itself lives in the HTTP client's cookie jar; this only
/// caches the crumb and knows how to refresh it.
pub struct YahooAuthManager {
    crumb: Mutex<Option<String>>,
    last_refresh: Mutex<Option<Instant>>,
    /// Crumb TTL in seconds.
    ttl_secs: u64,
}

impl Default for YahooAuthManager {
    fn default() -> Self {
        Self {
            crumb: Mutex::new(None),
            last_refresh: Mutex::new(None),
            ttl_secs: 3600,
        }
    }
}

impl YahooAuthManager {
    fn cached_crumb(&self) -> Option<String> {
        let last_refresh = *self.last_refresh.lock().unwrap();
        let fresh = last_refresh
            .map(|at| at.elapsed().as_secs() < self.ttl_secs)
            .unwrap_or(false);
        if !fresh {
            return None;
        }
        self.crumb.lock().unwrap().clone()
    }

    pub async fn get_crumb(
        &self,
        http_client: &Arc<dyn HttpClient>,
    ) -> Result<String, ProviderError> {
        if let Some(crumb) = self.cached_crumb() {
            return Ok(crumb);
        }

        self.refresh(http_client).await?;
        self.crumb
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ProviderError::unavailable("failed to obtain Yahoo crumb"))
    }

    /// Drop the cached crumb so the next call refreshes it.
    pub fn invalidate(&self) {
        *self.crumb.lock().unwrap() = None;
        *self.last_refresh.lock().unwrap() = None;
    }

    async fn refresh(&self, http_client: &Arc<dyn HttpClient>) -> Result<(), ProviderError> {
        // Visiting fc.yahoo.com seeds the session cookie in the jar.
        let cookie_request = HttpRequest::get("https://fc.yahoo.com")
            .with_header("referer", YAHOO_REFERER)
            .with_timeout_ms(10_000);
        let _ = http_client.execute(cookie_request).await.map_err(|e| {
            ProviderError::unavailable(format!("failed to fetch Yahoo cookie: {}", e.message()))
        })?;

        let crumb_endpoints = [
            "https://query1.finance.yahoo.com/v1/test/getcrumb",
            "https://query2.finance.yahoo.com/v1/test/getcrumb",
        ];

        for endpoint in &crumb_endpoints {
            let request = HttpRequest::get(*endpoint)
                .with_header("referer", YAHOO_REFERER)
                .with_timeout_ms(10_000);

            match http_client.execute(request).await {
                Ok(response) if response.is_success() && !response.body.is_empty() => {
                    let body = response.body.trim();

                    if body.contains("<html") || body.contains("<!DOCTYPE") {
                        continue;
                    }
                    if body.to_lowercase().contains("too many requests") {
                        return Err(ProviderError::rate_limited(
                            "Yahoo rate limited while fetching crumb",
                        ));
                    }
                    if !body.is_empty() && body.len() < 100 && !body.contains(' ') {
                        *self.crumb.lock().unwrap() = Some(body.to_owned());
                        *self.last_refresh.lock().unwrap() = Some(Instant::now());
                        return Ok(());
                    }
                }
                _ => continue,
            }
        }

        Err(ProviderError::unavailable(
            "failed to fetch Yahoo crumb from all endpoints",
        ))
    }
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance provider supporting both real API calls and mock mode.
///
/// With the default no-op transport the provider serves a deterministic
/// catalog so tests stay offline; with a real transport it talks to the
/// chart and quoteSummary endpoints.
pub struct YahooProvider {
    http_client: Arc<dyn HttpClient>,
    auth: Arc<YahooAuthManager>,
    use_real_api: bool,
    request_timeout_ms: u64,
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            auth: Arc::new(YahooAuthManager::default()),
            use_real_api: false,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl YahooProvider {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            auth: Arc::new(YahooAuthManager::default()),
            use_real_api,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }
}

impl MarketDataProvider for YahooProvider {
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, ProviderError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_history(&req).await
            } else {
                fake_history(&req)
            }
        })
    }

    fn profile<'a>(
        &'a self,
        req: ProfileRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompanyProfile, ProviderError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_profile(&req).await
            } else {
                fake_profile(&req.symbol)
            }
        })
    }
}

// Real API implementation
impl YahooProvider {
    async fn fetch_real_history(&self, req: &HistoryRequest) -> Result<PriceSeries, ProviderError> {
        let endpoint = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?range={}&interval=1d",
            urlencoding::encode(req.symbol.as_str()),
            req.range.as_str(),
        );

        let request = HttpRequest::get(&endpoint)
            .with_header("referer", YAHOO_REFERER)
            .with_timeout_ms(self.request_timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            ProviderError::unavailable(format!("yahoo transport error: {}", e.message()))
        })?;

        if response.status == 404 {
            return Err(ProviderError::unknown_symbol(&req.symbol));
        }
        if response.status == 429 {
            return Err(ProviderError::rate_limited("yahoo returned status 429"));
        }
        if !response.is_success() {
            return Err(ProviderError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        parse_chart_response(&response.body, &req.symbol)
    }

    async fn fetch_real_profile(&self, req: &ProfileRequest) -> Result<CompanyProfile, ProviderError> {
        let crumb = self.auth.get_crumb(&self.http_client).await?;
        let response = self.quote_summary_call(&req.symbol, &crumb).await?;

        // A stale crumb surfaces as 401/429; refresh once and retry.
        let body = if response.status == 401 || response.status == 429 {
            self.auth.invalidate();
            let crumb = self.auth.get_crumb(&self.http_client).await?;
            let retry = self.quote_summary_call(&req.symbol, &crumb).await?;
            if retry.status == 404 {
                return Err(ProviderError::unknown_symbol(&req.symbol));
            }
            if !retry.is_success() {
                return Err(ProviderError::unavailable(format!(
                    "yahoo returned status {} after auth refresh",
                    retry.status
                )));
            }
            retry.body
        } else if response.status == 404 {
            return Err(ProviderError::unknown_symbol(&req.symbol));
        } else if !response.is_success() {
            return Err(ProviderError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        } else {
            response.body
        };

        parse_quote_summary_response(&body, &req.symbol)
    }

    async fn quote_summary_call(
        &self,
        symbol: &Symbol,
        crumb: &str,
    ) -> Result<crate::http_client::HttpResponse, ProviderError> {
        let modules = "assetProfile,price,summaryDetail,financialData,defaultKeyStatistics";
        let endpoint = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules={}&crumb={}",
            urlencoding::encode(symbol.as_str()),
            modules,
            urlencoding::encode(crumb),
        );

        let request = HttpRequest::get(&endpoint)
            .with_header("referer", YAHOO_REFERER)
            .with_timeout_ms(self.request_timeout_ms);

        self.http_client.execute(request).await.map_err(|e| {
            ProviderError::unavailable(format!("yahoo transport error: {}", e.message()))
        })
    }
}

fn parse_chart_response(body: &str, symbol: &Symbol) -> Result<PriceSeries, ProviderError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = &chart_response.chart.error {
        if error.code.as_deref() == Some("Not Found") {
            return Err(ProviderError::unknown_symbol(symbol));
        }
        return Err(ProviderError::unavailable(format!(
            "yahoo chart API error: {}",
            error.description.as_deref().unwrap_or("unknown")
        )));
    }

    let result = chart_response
        .chart
        .result
        .and_then(|mut results| {
            if results.is_empty() {
                None
            } else {
                Some(results.swap_remove(0))
            }
        })
        .ok_or_else(|| ProviderError::unknown_symbol(symbol))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.close)
        .unwrap_or_default();

    let mut points = Vec::with_capacity(timestamps.len());
    let mut last_date: Option<TradingDate> = None;
    for (ts, close) in timestamps.iter().zip(closes) {
        let Some(close) = close else { continue };
        let date = TradingDate::from_unix_timestamp(*ts).map_err(validation_to_error)?;
        // Intraday rows of the probe range collapse onto one calendar date;
        // keep the last observation per day.
        if last_date == Some(date) {
            if let Some(point) = points.last_mut() {
                *point = PricePoint::new(date, close).map_err(validation_to_error)?;
            }
            continue;
        }
        points.push(PricePoint::new(date, close).map_err(validation_to_error)?);
        last_date = Some(date);
    }

    PriceSeries::new(symbol.clone(), points).map_err(validation_to_error)
}

fn parse_quote_summary_response(
    body: &str,
    symbol: &Symbol,
) -> Result<CompanyProfile, ProviderError> {
    let summary: YahooQuoteSummaryResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::internal(format!("failed to parse yahoo profile: {e}")))?;

    if let Some(error) = &summary.quote_summary.error {
        if error.code.as_deref() == Some("Not Found") {
            return Err(ProviderError::unknown_symbol(symbol));
        }
        return Err(ProviderError::unavailable(format!(
            "yahoo quoteSummary API error: {}",
            error.description.as_deref().unwrap_or("unknown")
        )));
    }

    let result = summary
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::unknown_symbol(symbol))?;

    let name = result
        .price
        .as_ref()
        .and_then(|price| price.long_name.clone().or_else(|| price.short_name.clone()));
    let (sector, description) = result
        .asset_profile
        .map(|profile| (profile.sector, profile.long_business_summary))
        .unwrap_or((None, None));

    let pe = result
        .summary_detail
        .as_ref()
        .and_then(|detail| detail.trailing_pe.as_ref().and_then(YahooRawValue::to_option));
    let price_to_book = result
        .default_key_statistics
        .as_ref()
        .and_then(|stats| stats.price_to_book.as_ref().and_then(YahooRawValue::to_option));
    let (return_on_equity, debt_to_equity, net_margin) = result
        .financial_data
        .as_ref()
        .map(|data| {
            (
                data.return_on_equity.as_ref().and_then(YahooRawValue::to_option),
                data.debt_to_equity.as_ref().and_then(YahooRawValue::to_option),
                data.profit_margins.as_ref().and_then(YahooRawValue::to_option),
            )
        })
        .unwrap_or((None, None, None));

    let ratios = ValuationRatios::new(pe, price_to_book, return_on_equity, debt_to_equity, net_margin)
        .map_err(validation_to_error)?;

    Ok(CompanyProfile::new(
        symbol.clone(),
        name,
        sector,
        description,
        ratios,
    ))
}

// ============================================================================
// Mock mode - deterministic offline data
// ============================================================================

/// Anchor date for synthetic histories so mock runs are reproducible.
const FAKE_ANCHOR_DATE: &str = "2024-12-31";

fn fake_history(req: &HistoryRequest) -> Result<PriceSeries, ProviderError> {
    if catalog_entry(&req.symbol).is_none() {
        return Err(ProviderError::unknown_symbol(&req.symbol));
    }

    let count = match req.range {
        HistoryRange::OneDay => 1,
        // 252 trading days per year over the 5-year window.
        HistoryRange::FiveYears => 1260,
    };

    let anchor = TradingDate::parse(FAKE_ANCHOR_DATE)
        .map_err(validation_to_error)?
        .into_inner();
    let seed = symbol_seed(&req.symbol);
    let base = 60.0 + (seed % 400) as f64 / 10.0;

    let mut points = Vec::with_capacity(count);
    for index in 0..count {
        let offset = Duration::days((count - 1 - index) as i64);
        let date = TradingDate::from(anchor - offset);
        let drift = index as f64 * base * 0.0004;
        let wiggle = ((seed + index as u64) % 9) as f64 * 0.05;
        let close = base + drift + wiggle;
        points.push(PricePoint::new(date, close).map_err(validation_to_error)?);
    }

    PriceSeries::new(req.symbol.clone(), points).map_err(validation_to_error)
}

fn fake_profile(symbol: &Symbol) -> Result<CompanyProfile, ProviderError> {
    let entry = catalog_entry(symbol).ok_or_else(|| ProviderError::unknown_symbol(symbol))?;
    let ratios = ValuationRatios::new(
        entry.pe,
        entry.price_to_book,
        entry.return_on_equity,
        entry.debt_to_equity,
        entry.net_margin,
    )
    .map_err(validation_to_error)?;

    Ok(CompanyProfile::new(
        symbol.clone(),
        Some(entry.name.to_owned()),
        entry.sector.map(str::to_owned),
        entry.description.map(str::to_owned),
        ratios,
    ))
}

struct CatalogEntry {
    name: &'static str,
    sector: Option<&'static str>,
    description: Option<&'static str>,
    pe: Option<f64>,
    price_to_book: Option<f64>,
    return_on_equity: Option<f64>,
    debt_to_equity: Option<f64>,
    net_margin: Option<f64>,
}

/// Instruments the mock provider resolves. Lookups are case-insensitive, as
/// with the real API.
fn catalog_entry(symbol: &Symbol) -> Option<CatalogEntry> {
    match symbol.as_str().to_ascii_uppercase().as_str() {
        "AAPL" => Some(CatalogEntry {
            name: "Apple Inc.",
            sector: Some("Technology"),
            description: Some(
                "Apple Inc. designs, manufactures, and markets smartphones, personal \
                 computers, tablets, wearables, and accessories worldwide.",
            ),
            pe: Some(29.4),
            price_to_book: Some(45.1),
            return_on_equity: Some(1.474),
            debt_to_equity: Some(176.3),
            net_margin: Some(0.253),
        }),
        "MSFT" => Some(CatalogEntry {
            name: "Microsoft Corporation",
            sector: Some("Technology"),
            description: Some(
                "Microsoft Corporation develops and supports software, services, \
                 devices, and solutions worldwide.",
            ),
            pe: Some(34.8),
            price_to_book: Some(12.6),
            return_on_equity: Some(0.352),
            debt_to_equity: Some(36.9),
            net_margin: Some(0.355),
        }),
        "GOOGL" => Some(CatalogEntry {
            name: "Alphabet Inc.",
            sector: Some("Communication Services"),
            description: Some(
                "Alphabet Inc. offers various products and platforms including \
                 Search, Android, Chrome, and Google Cloud.",
            ),
            pe: Some(23.1),
            price_to_book: Some(6.8),
            return_on_equity: Some(0.303),
            debt_to_equity: Some(8.7),
            net_margin: Some(0.281),
        }),
        // Index: no company metadata, ratios absent.
        "^GSPC" => Some(CatalogEntry {
            name: "S&P 500",
            sector: None,
            description: None,
            pe: None,
            price_to_book: None,
            return_on_equity: None,
            debt_to_equity: None,
            net_margin: None,
        }),
        _ => None,
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

fn validation_to_error(error: ValidationError) -> ProviderError {
    ProviderError::internal(error.to_string())
}

// ============================================================================
// Yahoo API response structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResult {
    #[serde(rename = "assetProfile", default)]
    asset_profile: Option<YahooAssetProfile>,
    #[serde(rename = "price", default)]
    price: Option<YahooPriceData>,
    #[serde(rename = "summaryDetail", default)]
    summary_detail: Option<YahooSummaryDetail>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<YahooFinancialData>,
    #[serde(rename = "defaultKeyStatistics", default)]
    default_key_statistics: Option<YahooDefaultKeyStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooAssetProfile {
    #[serde(default)]
    sector: Option<String>,
    #[serde(rename = "longBusinessSummary", default)]
    long_business_summary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooPriceData {
    #[serde(rename = "longName", default)]
    long_name: Option<String>,
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooSummaryDetail {
    #[serde(rename = "trailingPE", default)]
    trailing_pe: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooFinancialData {
    #[serde(rename = "returnOnEquity", default)]
    return_on_equity: Option<YahooRawValue>,
    #[serde(rename = "debtToEquity", default)]
    debt_to_equity: Option<YahooRawValue>,
    #[serde(rename = "profitMargins", default)]
    profit_margins: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooDefaultKeyStatistics {
    #[serde(rename = "priceToBook", default)]
    price_to_book: Option<YahooRawValue>,
}

/// Yahoo wraps numeric fields in an object carrying raw and formatted forms.
#[derive(Debug, Clone, Deserialize)]
struct YahooRawValue {
    #[serde(default)]
    raw: Option<f64>,
}

impl YahooRawValue {
    fn to_option(&self) -> Option<f64> {
        self.raw.filter(|v| v.is_finite())
    }
}
