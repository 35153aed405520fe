use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Days before the due date during which an unpaid obligation is flagged
/// as due soon.
pub const DEFAULT_NOTIFICATION_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ObligationKind {
    /// Open-ended, due every month.
    Monthly,
    /// Fixed number of payments; terminal once `paid` reaches `total`.
    Installment { total: u32, paid: u32 },
}

/// Calendar month keying the "already paid" state of an obligation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// A recurring or installment payment duty (rent, subscription, amortized
/// purchase). Derived due/paid state is never stored; it is recomputed
/// against a reference date on every query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringObligation {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub category: String,
    /// Day of month the payment is due (1-31), clamped to the month length.
    pub due_day: u32,
    pub kind: ObligationKind,
    /// Fixed payment account. Authoritative when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_paid: Option<Period>,
}

impl RecurringObligation {
    pub fn new(
        name: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        due_day: u32,
        kind: ObligationKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            category: category.into(),
            due_day,
            kind,
            account: None,
            last_paid: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.kind, ObligationKind::Installment { total, paid } if paid >= total)
    }

    pub fn is_paid_for(&self, period: Period) -> bool {
        self.last_paid == Some(period)
    }

    /// Installments left before the obligation becomes terminal.
    pub fn remaining_installments(&self) -> Option<u32> {
        match self.kind {
            ObligationKind::Monthly => None,
            ObligationKind::Installment { total, paid } => Some(total.saturating_sub(paid)),
        }
    }

    /// Due date for the month containing `reference`: the due day clamped to
    /// the last valid day of that month (day 31 in April resolves to the 30th).
    pub fn due_date_in(&self, reference: NaiveDate) -> NaiveDate {
        let day = self.due_day.clamp(1, days_in_month(reference.year(), reference.month()));
        NaiveDate::from_ymd_opt(reference.year(), reference.month(), day).unwrap_or(reference)
    }

    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date_in(today) - today).num_days()
    }

    /// Classifies the obligation against `today`. Paid state wins over the
    /// calendar; completion wins over everything.
    pub fn status_on(&self, today: NaiveDate, notification_window: i64) -> ObligationStatus {
        if self.is_completed() {
            return ObligationStatus::Completed;
        }
        if self.is_paid_for(Period::of(today)) {
            return ObligationStatus::PaidThisPeriod;
        }
        let days = self.days_until_due(today);
        if days < 0 {
            ObligationStatus::Overdue
        } else if days <= notification_window {
            ObligationStatus::DueSoon
        } else {
            ObligationStatus::Pending
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ObligationStatus {
    Pending,
    DueSoon,
    Overdue,
    PaidThisPeriod,
    Completed,
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap_or_default());
    (first_next - Duration::days(1)).day()
}
