//! Ticker validation.
//!
//! A symbol is considered tradable iff a minimal one-day history probe
//! returns at least one observation. Unknown symbols and unreachable
//! providers both gate the symbol out of the pipeline, but the outcome keeps
//! the two cases distinguishable.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::provider::{HistoryRequest, MarketDataProvider, ProviderErrorKind};
use crate::{HistoryRange, Symbol};

/// Outcome of validating one symbol against the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SymbolStatus {
    Tradable,
    Unknown,
    Unreachable { message: String },
}

impl SymbolStatus {
    pub const fn is_tradable(&self) -> bool {
        matches!(self, Self::Tradable)
    }
}

impl Display for SymbolStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tradable => f.write_str("tradable"),
            Self::Unknown => f.write_str("unknown symbol"),
            Self::Unreachable { message } => write!(f, "provider unreachable: {message}"),
        }
    }
}

/// Probe the provider with the shortest supported lookback.
pub async fn validate_symbol(provider: &dyn MarketDataProvider, symbol: &Symbol) -> SymbolStatus {
    let request = HistoryRequest::new(symbol.clone(), HistoryRange::OneDay);
    match provider.history(request).await {
        Ok(series) if !series.is_empty() => SymbolStatus::Tradable,
        // Resolved but empty: nothing tradable behind the symbol.
        Ok(_) => SymbolStatus::Unknown,
        Err(error) => match error.kind() {
            ProviderErrorKind::UnknownSymbol | ProviderErrorKind::InvalidRequest => {
                SymbolStatus::Unknown
            }
            _ => SymbolStatus::Unreachable {
                message: error.message().to_owned(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::YahooProvider;

    #[tokio::test]
    async fn cataloged_symbol_is_tradable() {
        let provider = YahooProvider::default();
        let symbol = Symbol::parse("AAPL").expect("valid symbol");

        let status = validate_symbol(&provider, &symbol).await;
        assert!(status.is_tradable());
    }

    #[tokio::test]
    async fn uncataloged_symbol_is_unknown() {
        let provider = YahooProvider::default();
        let symbol = Symbol::parse("ZZZINVALID").expect("valid symbol shape");

        let status = validate_symbol(&provider, &symbol).await;
        assert_eq!(status, SymbolStatus::Unknown);
    }
}
