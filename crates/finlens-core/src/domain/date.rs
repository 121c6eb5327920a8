use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::ValidationError;

/// Calendar date of a trading-day observation, ISO-8601 (`YYYY-MM-DD`) on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let format = format_description!("[year]-[month]-[day]");
        let parsed = Date::parse(input, &format).map_err(|_| ValidationError::InvalidDate {
            value: input.to_owned(),
        })?;
        Ok(Self(parsed))
    }

    /// Date of a Unix timestamp, as reported by the provider's chart endpoint.
    pub fn from_unix_timestamp(value: i64) -> Result<Self, ValidationError> {
        let datetime = OffsetDateTime::from_unix_timestamp(value)
            .map_err(|_| ValidationError::TimestampOutOfRange { value })?;
        Ok(Self(datetime.date()))
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    pub fn format_iso(self) -> String {
        let format = format_description!("[year]-[month]-[day]");
        self.0
            .format(&format)
            .expect("TradingDate must be ISO formattable")
    }
}

impl From<Date> for TradingDate {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        let parsed = TradingDate::parse("2024-01-02").expect("must parse");
        assert_eq!(parsed.format_iso(), "2024-01-02");
    }

    #[test]
    fn rejects_malformed_date() {
        let err = TradingDate::parse("02/01/2024").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn converts_unix_timestamps() {
        // 2021-06-01T13:30:00Z, a regular US market open.
        let date = TradingDate::from_unix_timestamp(1_622_554_200).expect("must convert");
        assert_eq!(date.format_iso(), "2021-06-01");
    }
}
