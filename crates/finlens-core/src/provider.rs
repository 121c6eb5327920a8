//! Market data provider contract.
//!
//! The external provider is treated as unreliable: every call site wraps the
//! outcome in a [`ProviderError`] that keeps "unknown symbol" and "provider
//! unreachable" distinguishable, even where the UI later collapses them.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{CompanyProfile, HistoryRange, PriceSeries, Symbol};

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    UnknownSymbol,
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
    retryable: bool,
}

impl ProviderError {
    pub fn unknown_symbol(symbol: &Symbol) -> Self {
        Self {
            kind: ProviderErrorKind::UnknownSymbol,
            message: format!("symbol '{symbol}' is not known to the provider"),
            retryable: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ProviderErrorKind::UnknownSymbol => "provider.unknown_symbol",
            ProviderErrorKind::Unavailable => "provider.unavailable",
            ProviderErrorKind::RateLimited => "provider.rate_limited",
            ProviderErrorKind::InvalidRequest => "provider.invalid_request",
            ProviderErrorKind::Internal => "provider.internal",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ProviderError {}

/// Request payload for the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub range: HistoryRange,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, range: HistoryRange) -> Self {
        Self { symbol, range }
    }
}

/// Request payload for the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRequest {
    pub symbol: Symbol,
}

impl ProfileRequest {
    pub fn new(symbol: Symbol) -> Self {
        Self { symbol }
    }
}

/// Market data provider contract.
///
/// Implementations must be `Send + Sync`; methods return boxed futures so the
/// trait stays object-safe behind `dyn`.
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the daily closing-price history for the requested window.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the symbol is unknown, the provider is
    /// unreachable or rate limited, or the response cannot be interpreted.
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, ProviderError>> + Send + 'a>>;

    /// Fetches company metadata and valuation ratios.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] under the same conditions as
    /// [`history`](MarketDataProvider::history).
    fn profile<'a>(
        &'a self,
        req: ProfileRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompanyProfile, ProviderError>> + Send + 'a>>;
}
