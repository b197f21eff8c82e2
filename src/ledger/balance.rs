//! Running-balance recalculation.

use super::store::TransactionStore;

/// Rewrites every record's running balance by walking the store in
/// chronological order. Idempotent; never reorders the store itself.
pub fn recalculate(store: &mut TransactionStore) {
    let mut balance = 0.0;
    for position in store.chronological_positions() {
        if let Some(record) = store.record_mut(position) {
            debug_assert!(
                record.amount() > 0.0,
                "record {} holds non-positive amount {}",
                record.id(),
                record.amount()
            );
            balance += record.signed_amount();
            record.set_running_balance(balance);
        }
    }
}

/// Balance after the chronologically-last record, or zero for an empty store.
pub fn current_balance(store: &TransactionStore) -> f64 {
    store
        .chronological()
        .last()
        .map(|record| record.running_balance())
        .unwrap_or(0.0)
}
