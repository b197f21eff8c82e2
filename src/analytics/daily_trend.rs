use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::ledger::{Transaction, TransactionStore};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub balance: f64,
}

/// Cumulative balance per distinct day in `view`.
///
/// The walk starts from the running balance of the last record in `store`
/// dated strictly before the earliest day in view, so a filtered window stays
/// continuous with the history outside it. Balances in `store` must be
/// recalculated beforehand.
pub fn daily_trend(view: &[&Transaction], store: &TransactionStore) -> Vec<TrendPoint> {
    let mut net_by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in view {
        *net_by_day.entry(record.date()).or_insert(0.0) += record.signed_amount();
    }

    let Some(first_day) = net_by_day.keys().next().copied() else {
        return Vec::new();
    };

    let mut cumulative = store
        .chronological()
        .into_iter()
        .take_while(|record| record.date() < first_day)
        .last()
        .map(|record| record.running_balance())
        .unwrap_or(0.0);

    net_by_day
        .into_iter()
        .map(|(date, net)| {
            cumulative += net;
            TrendPoint {
                date,
                balance: cumulative,
            }
        })
        .collect()
}
