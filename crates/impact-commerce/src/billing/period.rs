//! Calendar months for billing.

use crate::ImpactError;
use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month in UTC, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingPeriod {
    pub year: i32,
    pub month: u32,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, ImpactError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ImpactError::InvalidPeriod(format!("{}-{}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// Month containing a Unix timestamp.
    pub fn from_timestamp(timestamp: i64) -> Option<Self> {
        let at = DateTime::from_timestamp(timestamp, 0)?;
        Some(Self {
            year: at.year(),
            month: at.month(),
        })
    }

    /// Parse `YYYY-MM`.
    pub fn parse(s: &str) -> Result<Self, ImpactError> {
        let invalid = || ImpactError::InvalidPeriod(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        Self::from_timestamp(timestamp) == Some(*self)
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Unix timestamp of the first second of the month.
    pub fn start_timestamp(&self) -> i64 {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default()
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<String> for BillingPeriod {
    type Error = ImpactError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<BillingPeriod> for String {
    fn from(period: BillingPeriod) -> Self {
        period.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let period = BillingPeriod::parse("2024-03").unwrap();
        assert_eq!(period, BillingPeriod { year: 2024, month: 3 });
        assert_eq!(period.to_string(), "2024-03");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["2024-13", "2024-3", "24-03", "march", "2024-00", ""] {
            assert!(BillingPeriod::parse(input).is_err(), "{input}");
        }
    }

    #[test]
    fn test_from_timestamp_is_utc() {
        // 2024-02-29T23:59:59Z
        assert_eq!(
            BillingPeriod::from_timestamp(1_709_251_199),
            Some(BillingPeriod { year: 2024, month: 2 })
        );
        // 2024-03-01T00:00:00Z
        let march = BillingPeriod::from_timestamp(1_709_251_200).unwrap();
        assert_eq!(march.to_string(), "2024-03");
        assert_eq!(march.start_timestamp(), 1_709_251_200);
    }

    #[test]
    fn test_previous_wraps_year() {
        let jan = BillingPeriod::parse("2025-01").unwrap();
        assert_eq!(jan.previous().to_string(), "2024-12");
    }

    #[test]
    fn test_serde_as_string() {
        let period = BillingPeriod::parse("2024-11").unwrap();
        assert_eq!(serde_json::to_string(&period).unwrap(), "\"2024-11\"");
        let back: BillingPeriod = serde_json::from_str("\"2024-11\"").unwrap();
        assert_eq!(back, period);
    }
}
