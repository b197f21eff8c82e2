use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::{
    errors::{LedgerError, Result},
    ledger::{
        parse_date, Category, NewTransaction, TransactionKind, TransactionStore, DATE_FORMAT,
    },
};

use super::{LoadReport, StorageBackend};

const TMP_SUFFIX: &str = "tmp";
const BACKUP_SUFFIX: &str = "bak";
const LOAD_COPY_ATTEMPTS: u32 = 100;

/// On-disk shape of a single transaction.
///
/// Every field is optional on read so older files still load; the
/// conversion into [`NewTransaction`] decides what is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub new_balance: f64,
}

impl TryFrom<StoredTransaction> for NewTransaction {
    type Error = LedgerError;

    fn try_from(stored: StoredTransaction) -> Result<Self> {
        let raw_date = stored
            .date
            .ok_or_else(|| LedgerError::Validation("missing date".into()))?;
        let date = parse_date(&raw_date)?;
        let kind = TransactionKind::from_stored(&stored.kind)
            .ok_or_else(|| LedgerError::Validation(format!("unknown type `{}`", stored.kind)))?;
        let category = Category::from_stored(&stored.category).ok_or_else(|| {
            LedgerError::Validation(format!("unknown category `{}`", stored.category))
        })?;
        let transaction =
            NewTransaction::new(date, kind, stored.amount, category, stored.description);
        transaction.validate()?;
        Ok(transaction)
    }
}

/// Top-level document: `{"transactions": [...]}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionFile {
    pub transactions: Vec<StoredTransaction>,
}

impl TransactionFile {
    pub fn from_store(store: &TransactionStore) -> Self {
        let transactions = store
            .all()
            .iter()
            .map(|record| StoredTransaction {
                date: Some(record.date().format(DATE_FORMAT).to_string()),
                kind: record.kind().label().to_string(),
                amount: record.amount(),
                category: record.category().name().to_string(),
                description: record.description().to_string(),
                new_balance: record.running_balance(),
            })
            .collect();
        Self { transactions }
    }
}

/// JSON transaction file with atomic writes and a one-deep `.bak` copy.
///
/// A load that had to skip records also leaves the untouched original next
/// to the file as `<file>.load-<timestamp>.bak`. Saves never overwrite it.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        sibling_path(&self.path, BACKUP_SUFFIX)
    }

    fn backup_existing_file(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::copy(&self.path, self.backup_path())?;
        Ok(())
    }

    /// Writes `data` to a fresh `load-<timestamp>` sibling, never replacing
    /// an existing file.
    fn keep_load_copy(&self, data: &str) -> Result<PathBuf> {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        for attempt in 0..LOAD_COPY_ATTEMPTS {
            let suffix = match attempt {
                0 => format!("load-{stamp}.{BACKUP_SUFFIX}"),
                n => format!("load-{stamp}-{n}.{BACKUP_SUFFIX}"),
            };
            let candidate = sibling_path(&self.path, &suffix);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(mut file) => {
                    file.write_all(data.as_bytes())?;
                    file.sync_all()?;
                    return Ok(candidate);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(LedgerError::Io(io::Error::new(
            ErrorKind::AlreadyExists,
            "no free name for the load-time copy",
        )))
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<LoadReport> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no transaction file yet, starting empty");
                return Ok(LoadReport::default());
            }
            Err(err) => return Err(err.into()),
        };
        let mut report = parse_transaction_file(&data, Local::now().date_naive())?;
        if !report.warnings.is_empty() {
            match self.keep_load_copy(&data) {
                Ok(copy) => {
                    info!(copy = %copy.display(), "kept original transaction file");
                    report.preserved_copy = Some(copy);
                }
                Err(err) => {
                    warn!(error = %err, "could not keep a copy of the original file");
                    report
                        .warnings
                        .push(format!("could not keep a copy of the original file: {err}"));
                }
            }
        }
        info!(
            path = %self.path.display(),
            records = report.store.len(),
            warnings = report.warnings.len(),
            "transactions loaded"
        );
        Ok(report)
    }

    fn save(&self, store: &TransactionStore) -> Result<()> {
        let json = serde_json::to_string_pretty(&TransactionFile::from_store(store))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.backup_existing_file()?;
        let tmp = sibling_path(&self.path, TMP_SUFFIX);
        write_synced(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), records = store.len(), "transactions saved");
        Ok(())
    }
}

/// Parses the transaction document. Structural problems are `CorruptData`;
/// problems with individual records become warnings.
pub fn parse_transaction_file(data: &str, today: NaiveDate) -> Result<LoadReport> {
    let document: Value = serde_json::from_str(data)
        .map_err(|err| LedgerError::CorruptData(format!("not valid JSON: {err}")))?;
    let records = match document {
        Value::Object(mut fields) => match fields.remove("transactions") {
            Some(Value::Array(records)) => records,
            _ => return Err(LedgerError::CorruptData("missing `transactions` array".into())),
        },
        _ => return Err(LedgerError::CorruptData("missing `transactions` array".into())),
    };

    let mut report = LoadReport::default();
    for (index, value) in records.into_iter().enumerate() {
        match read_record(value, today) {
            Ok((transaction, balance)) => {
                report.store.restore(transaction, balance)?;
            }
            Err(reason) => {
                warn!(index, %reason, "skipping stored transaction");
                report.warnings.push(format!("record {index}: {reason}"));
            }
        }
    }
    Ok(report)
}

fn read_record(value: Value, today: NaiveDate) -> Result<(NewTransaction, f64)> {
    let mut stored: StoredTransaction = serde_json::from_value(value)
        .map_err(|err| LedgerError::Validation(format!("unreadable record: {err}")))?;
    stored
        .date
        .get_or_insert_with(|| today.format(DATE_FORMAT).to_string());
    let balance = stored.new_balance;
    Ok((NewTransaction::try_from(stored)?, balance))
}

/// Accepts a number or a numeric string; anything else reads as 0.
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|number| number.is_finite()).unwrap_or(0.0))
}

pub(crate) fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, suffix),
        None => suffix.to_string(),
    };
    sibling.set_extension(ext);
    sibling
}

/// Writes `data` and flushes it to disk. Callers rename the file into place.
pub(crate) fn write_synced(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::recalculate;
    use tempfile::tempdir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn legacy_records_are_repaired() {
        let data = r#"{"transactions": [
            {"type": "支出", "amount": "12.5", "category": "飲食", "description": "tea"},
            {"date": "2024-01-02", "type": "Income", "amount": 100, "category": "Salary", "new_balance": "oops"}
        ]}"#;
        let report = parse_transaction_file(data, today()).unwrap();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);

        let records = report.store.all();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date(), today());
        assert_eq!(records[0].category(), Category::Food);
        assert_eq!(records[0].amount(), 12.5);
        assert_eq!(records[1].running_balance(), 0.0);
    }

    #[test]
    fn invalid_records_are_skipped_with_warnings() {
        let data = r#"{"transactions": [
            {"date": "2024-01-02", "type": "Expense", "category": "Food"},
            {"date": "2024-01-03", "type": "Gift", "amount": 5, "category": "Food"},
            {"date": "not a date", "type": "Expense", "amount": 5, "category": "Food"},
            7,
            {"date": "2024-01-04", "type": "Expense", "amount": 5, "category": "Food"}
        ]}"#;
        let report = parse_transaction_file(data, today()).unwrap();
        assert_eq!(report.store.len(), 1);
        assert_eq!(report.warnings.len(), 4);
        assert!(report.warnings[0].starts_with("record 0"));
    }

    #[test]
    fn structural_problems_are_corrupt_data() {
        for data in ["not json", "[]", r#"{"transactions": {}}"#] {
            let err = parse_transaction_file(data, today()).expect_err("corrupt");
            assert!(matches!(err, LedgerError::CorruptData(_)), "{data}: {err:?}");
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join("transactions.json"));
        let report = storage.load().unwrap();
        assert!(report.store.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn save_writes_expected_shape_and_keeps_backup() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join("transactions.json"));

        let mut store = TransactionStore::new();
        store
            .add(NewTransaction::new(
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                TransactionKind::Expense,
                100.0,
                Category::Food,
                "",
            ))
            .unwrap();
        recalculate(&mut store);
        storage.save(&store).unwrap();
        storage.save(&store).unwrap();

        let written: Value =
            serde_json::from_str(&fs::read_to_string(storage.path()).unwrap()).unwrap();
        let first = &written["transactions"][0];
        assert_eq!(first["date"], "2024-01-05");
        assert_eq!(first["type"], "Expense");
        assert_eq!(first["amount"], 100.0);
        assert_eq!(first["category"], "Food");
        assert_eq!(first["description"], "");
        assert_eq!(first["new_balance"], -100.0);

        assert!(storage.backup_path().exists());
        assert!(!sibling_path(storage.path(), TMP_SUFFIX).exists());
    }

    #[test]
    fn stored_record_converts_through_try_from() {
        let stored: StoredTransaction = serde_json::from_value(serde_json::json!({
            "date": "2024-02-03",
            "type": "收入",
            "amount": " 42 ",
            "category": "Salary",
        }))
        .unwrap();
        assert_eq!(stored.new_balance, 0.0);
        assert_eq!(stored.description, "");

        let transaction = NewTransaction::try_from(stored.clone()).unwrap();
        assert_eq!(transaction.kind, TransactionKind::Income);
        assert_eq!(transaction.amount, 42.0);

        let undated = StoredTransaction { date: None, ..stored };
        assert!(matches!(
            NewTransaction::try_from(undated),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn skipped_records_survive_later_saves() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join("transactions.json"));
        fs::write(
            storage.path(),
            r#"{"transactions": [
                {"date": "2024-01-01", "type": "Expense", "category": "Food", "description": "no amount here"},
                {"date": "2024-01-02", "type": "Income", "amount": 10, "category": "Salary"}
            ]}"#,
        )
        .unwrap();

        let report = storage.load().unwrap();
        assert_eq!(report.store.len(), 1);
        let copy = report.preserved_copy.clone().expect("original kept");

        storage.save(&report.store).unwrap();
        storage.save(&report.store).unwrap();

        assert!(!fs::read_to_string(storage.path()).unwrap().contains("no amount here"));
        assert!(fs::read_to_string(&copy).unwrap().contains("no amount here"));

        let clean = storage.load().unwrap();
        assert!(clean.warnings.is_empty());
        assert!(clean.preserved_copy.is_none());
    }

    #[test]
    fn load_copies_never_replace_each_other() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join("transactions.json"));
        fs::write(
            storage.path(),
            r#"{"transactions": [{"date": "2024-01-01", "type": "Gift", "amount": 1, "category": "Food"}]}"#,
        )
        .unwrap();

        let first = storage.load().unwrap().preserved_copy.unwrap();
        let second = storage.load().unwrap().preserved_copy.unwrap();
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
    }
}
