mod common;

use std::fs;

use common::{scenario_records, setup_session, temp_base};
use ledger_core::{
    config::ConfigManager,
    core::LedgerSession,
    errors::LedgerError,
    storage::{CredentialFile, JsonStorage, StorageBackend},
};

#[test]
fn saved_session_reopens_with_same_records_and_balances() {
    let (mut session, path) = setup_session();
    for record in scenario_records() {
        session.add_transaction(record).unwrap();
    }
    session.save().unwrap();

    let (reopened, outcome) = LedgerSession::open(Box::new(JsonStorage::new(&path))).unwrap();
    assert_eq!(outcome.records, 3);
    assert!(outcome.warnings.is_empty());
    assert!(outcome.recovered_from.is_none());

    let original: Vec<_> = session
        .store()
        .all()
        .iter()
        .map(|r| (r.date(), r.kind(), r.amount(), r.category(), r.running_balance()))
        .collect();
    let loaded: Vec<_> = reopened
        .store()
        .all()
        .iter()
        .map(|r| (r.date(), r.kind(), r.amount(), r.category(), r.running_balance()))
        .collect();
    assert_eq!(loaded, original);
    assert_eq!(reopened.current_balance(), 350.0);
}

#[test]
fn stale_balances_are_recomputed_on_open() {
    let path = temp_base().join("transactions.json");
    fs::write(
        &path,
        r#"{"transactions": [
            {"date": "2024-01-10", "type": "Income", "amount": 500, "category": "Salary", "new_balance": 1},
            {"date": "2024-01-05", "type": "Expense", "amount": 100, "category": "Food", "new_balance": 2}
        ]}"#,
    )
    .unwrap();

    let (session, _) = LedgerSession::open(Box::new(JsonStorage::new(&path))).unwrap();
    let balances: Vec<f64> = session
        .store()
        .all()
        .iter()
        .map(|record| record.running_balance())
        .collect();
    assert_eq!(balances, vec![400.0, -100.0]);
}

#[test]
fn corrupt_file_opens_an_empty_session() {
    let path = temp_base().join("transactions.json");
    fs::write(&path, "{ definitely not json").unwrap();

    let (session, outcome) = LedgerSession::open(Box::new(JsonStorage::new(&path))).unwrap();
    assert!(session.store().is_empty());
    assert!(session.get_active_view().is_empty());
    assert!(outcome.recovered_from.is_some());
    // The damaged file is left for the user to inspect until the next save.
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ definitely not json");
}

#[test]
fn failed_save_preserves_previous_file() {
    let (mut session, path) = setup_session();
    let mut records = scenario_records().into_iter();
    session.add_transaction(records.next().unwrap()).unwrap();
    session.save().unwrap();
    let original = fs::read_to_string(&path).unwrap();

    // A directory where the temp file should go makes the write fail.
    fs::create_dir_all(path.with_extension("json.tmp")).unwrap();
    session.add_transaction(records.next().unwrap()).unwrap();
    let err = session.save().expect_err("save should fail");
    assert!(matches!(err, LedgerError::Io(_)));

    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert_eq!(session.store().len(), 2);
}

#[test]
fn backend_round_trip_through_trait_object() {
    let path = temp_base().join("nested").join("ledger.json");
    let backend: Box<dyn StorageBackend> = Box::new(JsonStorage::new(&path));
    let (mut session, _) = setup_session();
    for record in scenario_records() {
        session.add_transaction(record).unwrap();
    }
    backend.save(session.store()).unwrap();
    let report = backend.load().unwrap();
    assert_eq!(report.store.len(), 3);
}

#[test]
fn config_paths_resolve_inside_base_dir() {
    let base = temp_base();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
    let config = manager.load().unwrap();
    assert_eq!(manager.transactions_path(&config), base.join("transactions.json"));
    assert_eq!(manager.credentials_path(&config), base.join("users.json"));
}

#[test]
fn credential_file_round_trips() {
    let file = CredentialFile::new(temp_base().join("users.json"));
    assert!(file.load().unwrap().is_empty());

    let mut users = file.load().unwrap();
    users.insert("alice".into(), "secret".into());
    file.save(&users).unwrap();
    assert_eq!(file.load().unwrap().get("alice").map(String::as_str), Some("secret"));
}

#[test]
fn skipped_record_text_stays_on_disk_after_saves() {
    let base = temp_base();
    let path = base.join("transactions.json");
    fs::write(
        &path,
        r#"{"transactions": [
            {"date": "2024-01-03", "type": "Expense", "category": "Food", "description": "KEEPME-no-amount"},
            {"date": "2024-01-04", "type": "Income", "amount": 20, "category": "Salary"}
        ]}"#,
    )
    .unwrap();

    let (mut session, outcome) = LedgerSession::open(Box::new(JsonStorage::new(&path))).unwrap();
    assert_eq!(outcome.records, 1);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.preserved_copy.is_some());

    let mut records = scenario_records().into_iter();
    for _ in 0..2 {
        session.add_transaction(records.next().unwrap()).unwrap();
        session.save().unwrap();
    }

    let survivors: Vec<_> = fs::read_dir(&base)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|file| {
            fs::read_to_string(file)
                .map(|text| text.contains("KEEPME-no-amount"))
                .unwrap_or(false)
        })
        .collect();
    assert_eq!(survivors.len(), 1, "{survivors:?}");
    assert_ne!(survivors[0], path);
}
