use tracing::debug;

use super::transaction::{NewTransaction, Transaction, TransactionId};
use crate::errors::{LedgerError, Result};

/// Owns every transaction in insertion order.
///
/// The store is a plain container: it never reorders its records and never
/// recalculates balances on its own. Callers run
/// [`recalculate`](super::balance::recalculate) after a mutation.
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    records: Vec<Transaction>,
    next_sequence: u64,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a record, returning its identity.
    pub fn add(&mut self, transaction: NewTransaction) -> Result<TransactionId> {
        transaction.validate()?;
        let id = TransactionId::new();
        let record = Transaction::from_new(id, self.next_sequence, transaction);
        self.next_sequence += 1;
        debug!(%id, date = %record.date(), amount = record.amount(), "transaction added");
        self.records.push(record);
        Ok(id)
    }

    /// Appends a record read from disk, keeping its stored balance until the
    /// next recalculation.
    pub(crate) fn restore(
        &mut self,
        transaction: NewTransaction,
        stored_balance: f64,
    ) -> Result<TransactionId> {
        let id = self.add(transaction)?;
        if let Some(record) = self.records.last_mut() {
            record.set_running_balance(stored_balance);
        }
        Ok(id)
    }

    /// Removes the record addressed by `id`, returning it.
    pub fn delete(&mut self, id: TransactionId) -> Result<Transaction> {
        let position = self
            .records
            .iter()
            .position(|record| record.id() == id)
            .ok_or(LedgerError::NotFound(id))?;
        debug!(%id, "transaction deleted");
        Ok(self.records.remove(position))
    }

    /// Records in insertion order.
    pub fn all(&self) -> &[Transaction] {
        &self.records
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: TransactionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records by date ascending, insertion sequence breaking same-day ties.
    pub fn chronological(&self) -> Vec<&Transaction> {
        let mut ordered: Vec<&Transaction> = self.records.iter().collect();
        ordered.sort_by_key(|record| (record.date(), record.sequence()));
        ordered
    }

    /// Positions into the backing vector in chronological order.
    pub(crate) fn chronological_positions(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = (0..self.records.len()).collect();
        positions.sort_by_key(|&idx| (self.records[idx].date(), self.records[idx].sequence()));
        positions
    }

    pub(crate) fn record_mut(&mut self, position: usize) -> Option<&mut Transaction> {
        self.records.get_mut(position)
    }
}
