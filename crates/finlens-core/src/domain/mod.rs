mod date;
mod models;
mod range;
mod symbol;

pub use date::TradingDate;
pub use models::{CompanyProfile, PricePoint, PriceSeries, ValuationRatios};
pub use range::HistoryRange;
pub use symbol::Symbol;
