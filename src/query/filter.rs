use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::errors::{LedgerError, Result};
use crate::ledger::{parse_date, Category, Transaction, TransactionStore};

/// Inclusive calendar date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(LedgerError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// The widest representable window.
    pub fn unbounded() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Date and category selection defining the active view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub range: DateRange,
    /// Empty means every category matches.
    pub categories: BTreeSet<Category>,
}

impl QueryFilter {
    pub fn new(range: DateRange, categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            range,
            categories: categories.into_iter().collect(),
        }
    }

    /// Filter that keeps every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a filter from raw input. Dates fail with `InvalidDate` or
    /// `InvalidRange`; unknown categories with `Validation`.
    pub fn parse<S: AsRef<str>>(start: &str, end: &str, categories: &[S]) -> Result<Self> {
        let range = DateRange::parse(start, end)?;
        let categories = categories
            .iter()
            .map(|name| name.as_ref().parse::<Category>())
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self { range, categories })
    }

    pub fn is_unfiltered(&self) -> bool {
        self.range == DateRange::unbounded() && self.categories.is_empty()
    }

    pub fn matches(&self, record: &Transaction) -> bool {
        self.range.contains(record.date())
            && (self.categories.is_empty() || self.categories.contains(&record.category()))
    }

    /// Matching records in store insertion order.
    pub fn apply<'a>(&self, store: &'a TransactionStore) -> Vec<&'a Transaction> {
        store.all().iter().filter(|record| self.matches(record)).collect()
    }
}
