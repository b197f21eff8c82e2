use crate::ledger::Transaction;

/// Headline figures for the active view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewSummary {
    pub count: usize,
    pub income: f64,
    pub expense: f64,
}

impl ViewSummary {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

pub fn summarize(view: &[&Transaction]) -> ViewSummary {
    view.iter().fold(ViewSummary::default(), |mut acc, record| {
        acc.count += 1;
        if record.is_income() {
            acc.income += record.amount();
        } else {
            acc.expense += record.amount();
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Category, NewTransaction, TransactionKind, TransactionStore};
    use chrono::NaiveDate;

    #[test]
    fn sums_by_kind() {
        let mut store = TransactionStore::new();
        for (kind, amount) in [
            (TransactionKind::Income, 500.0),
            (TransactionKind::Expense, 120.0),
            (TransactionKind::Expense, 30.0),
        ] {
            store
                .add(NewTransaction::new(
                    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                    kind,
                    amount,
                    Category::Other,
                    "",
                ))
                .unwrap();
        }
        let view: Vec<&Transaction> = store.all().iter().collect();
        let summary = summarize(&view);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.expense, 150.0);
        assert_eq!(summary.net(), 350.0);
        assert_eq!(summarize(&[]), ViewSummary::default());
    }
}
