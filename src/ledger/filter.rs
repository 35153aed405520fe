use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

use super::transaction::Transaction;

/// Half-open `[start, end)` window of calendar dates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if end <= start {
            return Err(EngineError::Validation(
                "window end must be after start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Named calendar ranges the API layer exposes as quick filters. Explicit
/// ranges are inclusive of both endpoint dates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateRange {
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
    Between { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// Resolves the range to a concrete window relative to `today`. Weeks
    /// start on Monday.
    pub fn resolve(&self, today: NaiveDate) -> EngineResult<DateWindow> {
        match *self {
            DateRange::Today => DateWindow::new(today, today + Duration::days(1)),
            DateRange::ThisWeek => {
                let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                DateWindow::new(start, start + Duration::days(7))
            }
            DateRange::ThisMonth => {
                let start = today.with_day(1).unwrap_or(today);
                let end = next_month_start(start);
                DateWindow::new(start, end)
            }
            DateRange::ThisYear => {
                let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let end = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
                    .unwrap_or(start + Duration::days(366));
                DateWindow::new(start, end)
            }
            DateRange::Between { start, end } => {
                if end < start {
                    return Err(EngineError::Validation(
                        "range end must not precede start".into(),
                    ));
                }
                DateWindow::new(start, end + Duration::days(1))
            }
        }
    }
}

/// Listing filter: an optional date range plus an optional case-insensitive
/// substring matched against description, category, or account. The
/// substring is applied in memory after the date filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn for_range(range: DateRange) -> Self {
        Self {
            range: Some(range),
            search: None,
        }
    }

    pub fn with_search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }
}

pub(crate) fn matches_search(txn: &Transaction, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    txn.category.to_lowercase().contains(&needle)
        || txn.account.to_lowercase().contains(&needle)
        || txn
            .description
            .as_deref()
            .map(|text| text.to_lowercase().contains(&needle))
            .unwrap_or(false)
}

fn next_month_start(start: NaiveDate) -> NaiveDate {
    let (year, month) = if start.month() == 12 {
        (start.year() + 1, 1)
    } else {
        (start.year(), start.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(start + Duration::days(31))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::transaction::TransactionKind;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn named_ranges_resolve_around_reference_date() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();

        let window = DateRange::Today.resolve(today).unwrap();
        assert!(window.contains(today));
        assert!(!window.contains(today + Duration::days(1)));

        let week = DateRange::ThisWeek.resolve(today).unwrap();
        assert_eq!(week.start, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(week.end, NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());

        let month = DateRange::ThisMonth.resolve(today).unwrap();
        assert_eq!(month.start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(month.end, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());

        let year = DateRange::ThisYear.resolve(today).unwrap();
        assert!(year.contains(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
        assert!(!year.contains(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }

    #[test]
    fn explicit_range_includes_both_endpoints() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let window = DateRange::Between { start, end }
            .resolve(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .unwrap();
        assert!(window.contains(start));
        assert!(window.contains(end));
        assert!(!window.contains(end + Duration::days(1)));
    }

    #[test]
    fn inverted_explicit_range_is_rejected() {
        let range = DateRange::Between {
            start: NaiveDate::from_ymd_opt(2025, 2, 2).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        };
        let err = range
            .resolve(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .expect_err("inverted range must fail");
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn search_matches_all_text_fields_case_insensitively() {
        let txn = Transaction::entry(
            TransactionKind::Expense,
            dec!(9.99),
            "Subscriptions",
            Some("Monthly streaming".into()),
            "Checking",
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        );
        assert!(matches_search(&txn, "STREAM"));
        assert!(matches_search(&txn, "subscr"));
        assert!(matches_search(&txn, "check"));
        assert!(!matches_search(&txn, "groceries"));
    }
}
