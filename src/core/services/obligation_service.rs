//! Recurring-obligation definitions, derived due state, and the payment
//! state machine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};
use crate::ledger::{
    Ledger, ObligationKind, ObligationStatus, Period, RecurringObligation, Transaction,
    TransactionKind,
};

/// Input for defining a recurring obligation. `installments` switches the
/// obligation to a fixed-count plan; `None` keeps it open-ended monthly.
#[derive(Debug, Clone)]
pub struct NewObligation {
    pub name: String,
    pub amount: Decimal,
    pub category: String,
    pub due_day: u32,
    pub installments: Option<u32>,
    pub account: Option<String>,
}

/// Derived, per-query view of an obligation against a reference date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObligationStatusView {
    pub obligation: RecurringObligation,
    pub due_date: NaiveDate,
    pub days_until_due: i64,
    pub status: ObligationStatus,
    pub overdue: bool,
    pub paid_this_period: bool,
    pub remaining_installments: Option<u32>,
}

/// Outcome of a successful payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentReceipt {
    pub transaction: Transaction,
    /// True when this payment exhausted an installment plan.
    pub completed: bool,
}

pub struct ObligationService;

impl ObligationService {
    pub fn create(ledger: &mut Ledger, input: NewObligation) -> EngineResult<RecurringObligation> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation(
                "obligation name must not be blank".into(),
            ));
        }
        let category = input.category.trim();
        if category.is_empty() {
            return Err(EngineError::Validation(
                "obligation category must not be blank".into(),
            ));
        }
        if input.amount <= Decimal::ZERO {
            return Err(EngineError::Validation(
                "amount must be greater than zero".into(),
            ));
        }
        if !(1..=31).contains(&input.due_day) {
            return Err(EngineError::Validation(
                "due day must fall between 1 and 31".into(),
            ));
        }
        let kind = match input.installments {
            Some(0) => {
                return Err(EngineError::Validation(
                    "installment plans need at least one installment".into(),
                ))
            }
            Some(total) => ObligationKind::Installment { total, paid: 0 },
            None => ObligationKind::Monthly,
        };
        let account = match input.account.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(account) => Some(account.to_string()),
        };

        let mut obligation =
            RecurringObligation::new(name, input.amount, category, input.due_day, kind);
        obligation.account = account;
        ledger.add_obligation(obligation.clone());
        tracing::debug!(id = %obligation.id, name = %obligation.name, "obligation defined");
        Ok(obligation)
    }

    /// Current-period listing with derived state. Completed installment
    /// plans are excluded entirely. Sorted by due date, then name.
    pub fn list(ledger: &Ledger, today: NaiveDate, notification_window: i64) -> Vec<ObligationStatusView> {
        let mut views: Vec<ObligationStatusView> = ledger
            .obligations
            .iter()
            .filter(|obligation| !obligation.is_completed())
            .map(|obligation| {
                let status = obligation.status_on(today, notification_window);
                ObligationStatusView {
                    due_date: obligation.due_date_in(today),
                    days_until_due: obligation.days_until_due(today),
                    status,
                    overdue: status == ObligationStatus::Overdue,
                    paid_this_period: status == ObligationStatus::PaidThisPeriod,
                    remaining_installments: obligation.remaining_installments(),
                    obligation: obligation.clone(),
                }
            })
            .collect();
        views.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.obligation.name.cmp(&b.obligation.name))
        });
        views
    }

    /// Pays the obligation for the period containing `now`: posts the
    /// expense, advances the paid-period marker, and consumes an installment.
    /// This is the only path from obligations into the ledger; obligation
    /// state is never reconstructed from transactions.
    pub fn pay(
        ledger: &mut Ledger,
        id: Uuid,
        paying_account: Option<&str>,
        now: DateTime<Utc>,
    ) -> EngineResult<PaymentReceipt> {
        let period = Period::of(now.date_naive());
        let Some(obligation) = ledger.obligation_mut(id) else {
            return Err(EngineError::NotFound(format!("obligation {id}")));
        };
        if obligation.is_completed() {
            return Err(EngineError::InvalidOperation(format!(
                "obligation `{}` has no remaining installments",
                obligation.name
            )));
        }
        if obligation.is_paid_for(period) {
            return Err(EngineError::InvalidOperation(format!(
                "obligation `{}` is already paid for the current period",
                obligation.name
            )));
        }

        let requested = paying_account.map(str::trim).filter(|name| !name.is_empty());
        let account = match (&obligation.account, requested) {
            // The declared account is authoritative; callers may repeat it
            // to confirm, never override it.
            (Some(fixed), None) => fixed.clone(),
            (Some(fixed), Some(given)) if given == fixed.as_str() => fixed.clone(),
            (Some(fixed), Some(_)) => {
                return Err(EngineError::Validation(format!(
                    "payments for `{}` are fixed to account `{fixed}`",
                    obligation.name
                )))
            }
            (None, Some(given)) => given.to_string(),
            (None, None) => {
                return Err(EngineError::Validation(
                    "a paying account is required".into(),
                ))
            }
        };

        obligation.last_paid = Some(period);
        let completed = match &mut obligation.kind {
            ObligationKind::Installment { total, paid } => {
                *paid += 1;
                *paid >= *total
            }
            ObligationKind::Monthly => false,
        };
        let transaction = Transaction::entry(
            TransactionKind::Expense,
            obligation.amount,
            obligation.category.clone(),
            Some(obligation.name.clone()),
            account,
            now,
        );
        tracing::info!(obligation = %obligation.name, completed, "obligation paid");
        ledger.add_transaction(transaction.clone());
        Ok(PaymentReceipt {
            transaction,
            completed,
        })
    }

    /// Removes the definition only; previously posted payments stay in the
    /// ledger untouched.
    pub fn delete(ledger: &mut Ledger, id: Uuid) -> EngineResult<RecurringObligation> {
        ledger
            .remove_obligation(id)
            .ok_or_else(|| EngineError::NotFound(format!("obligation {id}")))
    }
}
