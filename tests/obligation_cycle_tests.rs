mod common;

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use common::{at, memory_engine, owner};
use finance_core::core::services::NewObligation;
use finance_core::errors::EngineError;
use finance_core::ledger::{ObligationStatus, TransactionFilter};
use rust_decimal_macros::dec;

fn obligation(name: &str, due_day: u32, installments: Option<u32>) -> NewObligation {
    NewObligation {
        name: name.into(),
        amount: dec!(45.50),
        category: "Utilities".into(),
        due_day,
        installments,
        account: Some("Checking".into()),
    }
}

#[test]
fn pay_twice_in_one_period_fails_once() {
    let engine = memory_engine();
    let owner = owner();
    let created = engine
        .create_obligation(&owner, obligation("Internet", 15, None))
        .unwrap();

    engine
        .pay_obligation_at(&owner, created.id, None, at(2025, 3, 14))
        .unwrap();
    let err = engine
        .pay_obligation_at(&owner, created.id, None, at(2025, 3, 20))
        .expect_err("second pay in the same month must fail");
    assert!(matches!(err, EngineError::InvalidOperation(_)));

    let rows = engine
        .list_transactions(&owner, &TransactionFilter::default())
        .unwrap();
    assert_eq!(rows.len(), 1, "no duplicate expense may be posted");

    // The next month opens a fresh period.
    engine
        .pay_obligation_at(&owner, created.id, None, at(2025, 4, 14))
        .unwrap();
}

#[test]
fn installment_plan_completes_after_three_periods() {
    let engine = memory_engine();
    let owner = owner();
    let created = engine
        .create_obligation(&owner, obligation("Sofa", 5, Some(3)))
        .unwrap();

    for (month, expect_completed) in [(1u32, false), (2, false), (3, true)] {
        let receipt = engine
            .pay_obligation_at(&owner, created.id, None, at(2025, month, 5))
            .unwrap();
        assert_eq!(receipt.completed, expect_completed);
    }

    let err = engine
        .pay_obligation_at(&owner, created.id, None, at(2025, 4, 5))
        .expect_err("fourth pay must fail");
    assert!(matches!(err, EngineError::InvalidOperation(_)));

    // Terminal plans drop out of current-period listings.
    let views = engine
        .list_obligations_on(&owner, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap())
        .unwrap();
    assert!(views.is_empty());
}

#[test]
fn due_day_31_clamps_to_february_month_end() {
    let engine = memory_engine();
    let owner = owner();
    engine
        .create_obligation(&owner, obligation("Rent", 31, None))
        .unwrap();

    let views = engine
        .list_obligations_on(&owner, NaiveDate::from_ymd_opt(2025, 2, 10).unwrap())
        .unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(
        views[0].due_date,
        NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
    );
    assert_eq!(views[0].days_until_due, 18);
}

#[test]
fn derived_states_follow_the_calendar() {
    let engine = memory_engine();
    let owner = owner();
    let created = engine
        .create_obligation(&owner, obligation("Internet", 15, None))
        .unwrap();

    let on = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
    let status_on = |today| {
        engine
            .list_obligations_on(&owner, today)
            .unwrap()
            .remove(0)
            .status
    };
    assert_eq!(status_on(on(1)), ObligationStatus::Pending);
    assert_eq!(status_on(on(12)), ObligationStatus::DueSoon);
    assert_eq!(status_on(on(15)), ObligationStatus::DueSoon);
    assert_eq!(status_on(on(16)), ObligationStatus::Overdue);

    engine
        .pay_obligation_at(&owner, created.id, None, at(2025, 3, 16))
        .unwrap();
    let view = engine.list_obligations_on(&owner, on(20)).unwrap().remove(0);
    assert_eq!(view.status, ObligationStatus::PaidThisPeriod);
    assert!(view.paid_this_period);
    assert!(!view.overdue);
}

#[test]
fn deleting_an_obligation_keeps_payment_history() {
    let engine = memory_engine();
    let owner = owner();
    let created = engine
        .create_obligation(&owner, obligation("Gym", 10, None))
        .unwrap();
    engine
        .pay_obligation_at(&owner, created.id, None, at(2025, 3, 10))
        .unwrap();

    engine.delete_obligation(&owner, created.id).unwrap();
    assert!(engine
        .list_obligations_on(&owner, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap())
        .unwrap()
        .is_empty());
    let rows = engine
        .list_transactions(&owner, &TransactionFilter::default())
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description.as_deref(), Some("Gym"));
}

#[test]
fn unknown_obligation_is_reported() {
    let engine = memory_engine();
    let owner = owner();
    let err = engine
        .pay_obligation_at(&owner, uuid::Uuid::new_v4(), Some("Checking"), at(2025, 3, 1))
        .expect_err("unknown id");
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[test]
fn concurrent_pays_for_one_obligation_have_exactly_one_winner() {
    let engine = Arc::new(memory_engine());
    let owner = owner();
    let created = engine
        .create_obligation(&owner, obligation("Internet", 15, None))
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let engine = Arc::clone(&engine);
        let owner = owner.clone();
        let id = created.id;
        handles.push(thread::spawn(move || {
            engine.pay_obligation_at(&owner, id, None, at(2025, 3, 14))
        }));
    }
    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(winners, 1, "exactly one pay call may succeed per period");
    let rows = engine
        .list_transactions(&owner, &TransactionFilter::default())
        .unwrap();
    assert_eq!(rows.len(), 1);
}
