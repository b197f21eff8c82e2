use std::collections::BTreeMap;

use chrono::Datelike;

use crate::ledger::{Transaction, TransactionKind};

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotals {
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expense: f64,
}

impl MonthlyTotals {
    /// `YYYY-MM`
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Income and expense sums per calendar month, oldest month first.
pub fn monthly_totals(view: &[&Transaction]) -> Vec<MonthlyTotals> {
    let mut months: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
    for record in view {
        let date = record.date();
        let entry = months.entry((date.year(), date.month())).or_insert((0.0, 0.0));
        match record.kind() {
            TransactionKind::Income => entry.0 += record.amount(),
            TransactionKind::Expense => entry.1 += record.amount(),
        }
    }

    months
        .into_iter()
        .map(|((year, month), (income, expense))| MonthlyTotals {
            year,
            month,
            income,
            expense,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Category, NewTransaction, TransactionStore};
    use chrono::NaiveDate;

    #[test]
    fn months_are_grouped_and_ordered() {
        let mut store = TransactionStore::new();
        for (y, m, d, kind, amount) in [
            (2024, 3, 2, TransactionKind::Expense, 40.0),
            (2023, 12, 31, TransactionKind::Income, 10.0),
            (2024, 3, 28, TransactionKind::Income, 200.0),
            (2024, 3, 15, TransactionKind::Expense, 5.0),
        ] {
            store
                .add(NewTransaction::new(
                    NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                    kind,
                    amount,
                    Category::Other,
                    "",
                ))
                .unwrap();
        }
        let view: Vec<&Transaction> = store.all().iter().collect();
        let months = monthly_totals(&view);

        let labels: Vec<String> = months.iter().map(MonthlyTotals::label).collect();
        assert_eq!(labels, vec!["2023-12", "2024-03"]);
        assert_eq!(months[1].income, 200.0);
        assert_eq!(months[1].expense, 45.0);
        assert_eq!(months[1].net(), 155.0);
    }
}
