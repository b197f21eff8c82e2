#![doc(test(attr(deny(warnings))))]

//! Ledger Core records income and expense transactions, keeps running
//! balances consistent, and answers filtered, sorted, and aggregated queries
//! over them. A small command shell sits on top for day-to-day use.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod query;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Ledger Core tracing initialized.");
    });
}
