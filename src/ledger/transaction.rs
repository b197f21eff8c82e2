use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use uuid::Uuid;

use super::category::Category;
use crate::errors::{LedgerError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable handle for a transaction, independent of its position in any list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TransactionId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| LedgerError::Validation(format!("`{s}` is not a transaction id")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    /// Applies the kind's sign: income adds to the balance, expense subtracts.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }

    /// Resolves a stored `type` label, including the legacy ones.
    pub fn from_stored(label: &str) -> Option<Self> {
        match label.trim() {
            "Income" | "income" | "收入" => Some(TransactionKind::Income),
            "Expense" | "expense" | "支出" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Income" | "income" => Ok(TransactionKind::Income),
            "Expense" | "expense" => Ok(TransactionKind::Expense),
            other => Err(LedgerError::Validation(format!(
                "kind must be Income or Expense, got `{other}`"
            ))),
        }
    }
}

/// Parses an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDate(raw.to_string()))
}

/// Validated input for [`TransactionStore::add`](super::store::TransactionStore::add).
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: Category,
    pub description: String,
}

impl NewTransaction {
    pub fn new(
        date: NaiveDate,
        kind: TransactionKind,
        amount: f64,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            kind,
            amount,
            category,
            description: description.into(),
        }
    }

    /// Builds a transaction from raw form input. Every failure is a
    /// [`LedgerError::Validation`].
    pub fn parse(
        date: &str,
        kind: &str,
        amount: &str,
        category: &str,
        description: &str,
    ) -> Result<Self> {
        let date = parse_date(date).map_err(|_| {
            LedgerError::Validation(format!("date `{date}` is not in YYYY-MM-DD format"))
        })?;
        let kind = kind.parse::<TransactionKind>()?;
        let amount = amount
            .trim()
            .parse::<f64>()
            .map_err(|_| LedgerError::Validation(format!("amount `{amount}` is not a number")))?;
        let category = category.parse::<Category>()?;
        let draft = Self::new(date, kind, amount, category, description.trim());
        draft.validate()?;
        Ok(draft)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "amount must be a positive number, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// A recorded transaction. Only the store creates these and only the
/// balance recalculation writes `running_balance`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    sequence: u64,
    date: NaiveDate,
    kind: TransactionKind,
    amount: f64,
    category: Category,
    description: String,
    running_balance: f64,
}

impl Transaction {
    pub(crate) fn from_new(id: TransactionId, sequence: u64, new: NewTransaction) -> Self {
        Self {
            id,
            sequence,
            date: new.date,
            kind: new.kind,
            amount: new.amount,
            category: new.category,
            description: new.description,
            running_balance: 0.0,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Insertion sequence within the store; breaks ties between same-day records.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn running_balance(&self) -> f64 {
        self.running_balance
    }

    pub(crate) fn set_running_balance(&mut self, balance: f64) {
        self.running_balance = balance;
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}
