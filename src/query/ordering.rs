use std::{cmp::Ordering, collections::HashMap, fmt, str::FromStr};

use crate::errors::LedgerError;
use crate::ledger::{Transaction, DATE_FORMAT};

/// Table columns that can drive a re-sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    Kind,
    Amount,
    Category,
    Description,
    Balance,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Date,
        Column::Kind,
        Column::Amount,
        Column::Category,
        Column::Description,
        Column::Balance,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Kind => "Type",
            Column::Amount => "Amount",
            Column::Category => "Category",
            Column::Description => "Description",
            Column::Balance => "Balance",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Column::Amount | Column::Balance)
    }

    fn text_key(self, record: &Transaction) -> String {
        match self {
            Column::Date => record.date().format(DATE_FORMAT).to_string(),
            Column::Kind => record.kind().label().to_string(),
            Column::Category => record.category().name().to_string(),
            Column::Description => record.description().to_string(),
            Column::Amount => record.amount().to_string(),
            Column::Balance => record.running_balance().to_string(),
        }
    }

    fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Column::Amount => a.amount().total_cmp(&b.amount()),
            Column::Balance => a.running_balance().total_cmp(&b.running_balance()),
            _ => self.text_key(a).cmp(&self.text_key(b)),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Column::Date),
            "type" | "kind" => Ok(Column::Kind),
            "amount" => Ok(Column::Amount),
            "category" => Ok(Column::Category),
            "description" | "desc" => Ok(Column::Description),
            "balance" => Ok(Column::Balance),
            other => Err(LedgerError::Validation(format!("unknown column `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Per-column direction memory plus the column currently ordering the view.
#[derive(Debug, Clone, Default)]
pub struct SortState {
    last_used: HashMap<Column, SortDirection>,
    active: Option<(Column, SortDirection)>,
}

impl SortState {
    /// Flips the column's direction (ascending on first use) and makes it active.
    pub fn toggle(&mut self, column: Column) -> SortDirection {
        let direction = self
            .last_used
            .get(&column)
            .map(|previous| previous.reversed())
            .unwrap_or(SortDirection::Ascending);
        self.last_used.insert(column, direction);
        self.active = Some((column, direction));
        direction
    }

    /// Drops the active column so the default order applies again. Remembered
    /// directions are kept.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<(Column, SortDirection)> {
        self.active
    }

    pub fn indicator(&self, column: Column) -> &'static str {
        match self.active {
            Some((active, direction)) if active == column => direction.arrow(),
            _ => "",
        }
    }
}

/// Newest first: date descending, then most recently inserted first.
pub fn default_order(records: &mut [&Transaction]) {
    records.sort_by(|a, b| (b.date(), b.sequence()).cmp(&(a.date(), a.sequence())));
}

/// Stable sort on one column; ties keep their current relative order.
pub fn sort_by_column(records: &mut [&Transaction], column: Column, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = column.compare(a, b);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
