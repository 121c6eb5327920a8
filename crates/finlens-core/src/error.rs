use thiserror::Error;

/// Validation and contract errors exposed by `finlens-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or '^': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be ISO-8601 (YYYY-MM-DD): '{value}'")]
    InvalidDate { value: String },
    #[error("timestamp {value} is outside the representable date range")]
    TimestampOutOfRange { value: i64 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("price series dates must be strictly ascending (offending index {index})")]
    NonAscendingDates { index: usize },

    #[error("analysis accepts at most {max} comparison symbols, got {got}")]
    TooManyComparisons { got: usize, max: usize },
}
