#![doc(test(attr(deny(warnings))))]

//! Finance Core is the ledger-and-obligations engine behind a personal
//! finance tracker: income/expense records, atomic two-leg transfers,
//! balance and category aggregates, and recurring obligations with
//! due-date awareness. Presentation, authentication, and transport live
//! elsewhere; callers hand every operation an owner principal and the
//! engine persists through an abstract storage backend.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}
