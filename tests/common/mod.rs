#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use ledger_core::{
    core::LedgerSession,
    ledger::{Category, NewTransaction, TransactionKind},
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that is cleaned up when the test binary exits.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens a session backed by a JSON file inside a fresh temp directory.
pub fn setup_session() -> (LedgerSession, PathBuf) {
    let path = temp_base().join("transactions.json");
    let (session, _) =
        LedgerSession::open(Box::new(JsonStorage::new(&path))).expect("open empty session");
    (session, path)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn txn(
    day: NaiveDate,
    kind: TransactionKind,
    amount: f64,
    category: Category,
) -> NewTransaction {
    NewTransaction::new(day, kind, amount, category, "")
}

/// The three-record ledger used across the scenario tests.
pub fn scenario_records() -> Vec<NewTransaction> {
    vec![
        txn(date(2024, 1, 5), TransactionKind::Expense, 100.0, Category::Food),
        txn(date(2024, 1, 10), TransactionKind::Income, 500.0, Category::Salary),
        txn(date(2024, 1, 10), TransactionKind::Expense, 50.0, Category::Transport),
    ]
}
