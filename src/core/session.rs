use std::{collections::HashMap, path::PathBuf};

use tracing::{info, warn};

use crate::analytics::{
    category_totals, daily_trend, monthly_totals, summarize, CategoryTotals, LabelOptions,
    MonthlyTotals, TrendPoint, ViewSummary,
};
use crate::errors::{LedgerError, Result};
use crate::ledger::{
    current_balance, recalculate, NewTransaction, Transaction, TransactionId, TransactionStore,
};
use crate::query::{default_order, sort_by_column, Column, QueryFilter, SortDirection, SortState};
use crate::storage::StorageBackend;

/// Why the active view was rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChangeReason {
    Loaded,
    Added(TransactionId),
    Deleted(TransactionId),
    Filtered,
    Reset,
    Sorted(Column, SortDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewChange {
    pub reason: ViewChangeReason,
    /// Rows in the active view after the change.
    pub visible: usize,
}

/// Receives a notification whenever the active view changes, so a renderer
/// can redraw without the ledger knowing about it.
pub trait ViewListener {
    fn view_changed(&mut self, change: &ViewChange);
}

impl<F> ViewListener for F
where
    F: FnMut(&ViewChange),
{
    fn view_changed(&mut self, change: &ViewChange) {
        (self)(change)
    }
}

/// What happened while opening a session.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: usize,
    pub warnings: Vec<String>,
    /// Set when the file was unreadable and the session started empty instead.
    pub recovered_from: Option<String>,
    /// Original file kept aside because some of its records were skipped.
    pub preserved_copy: Option<PathBuf>,
}

/// Owns the store and the active view for one user session.
///
/// Every command runs mutate, recalculate, refilter, notify in that order.
/// Persistence is a separate explicit step via [`LedgerSession::save`].
pub struct LedgerSession {
    store: TransactionStore,
    filter: QueryFilter,
    view: Vec<TransactionId>,
    sort: SortState,
    labels: LabelOptions,
    storage: Box<dyn StorageBackend>,
    listeners: Vec<Box<dyn ViewListener>>,
}

impl LedgerSession {
    /// Starts an empty session without reading from `storage`.
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            store: TransactionStore::new(),
            filter: QueryFilter::all(),
            view: Vec::new(),
            sort: SortState::default(),
            labels: LabelOptions::default(),
            storage,
            listeners: Vec::new(),
        }
    }

    /// Loads persisted transactions. Corrupt files are reported in the
    /// outcome and replaced by an empty store; other IO failures are errors.
    pub fn open(storage: Box<dyn StorageBackend>) -> Result<(Self, LoadOutcome)> {
        let mut session = Self::new(storage);
        let mut outcome = LoadOutcome::default();
        match session.storage.load() {
            Ok(report) => {
                session.store = report.store;
                outcome.warnings = report.warnings;
                outcome.preserved_copy = report.preserved_copy;
            }
            Err(LedgerError::CorruptData(reason)) => {
                warn!(%reason, "transaction file is corrupt, starting with an empty ledger");
                outcome.recovered_from = Some(reason);
            }
            Err(err) => return Err(err),
        }
        outcome.records = session.store.len();
        recalculate(&mut session.store);
        session.filter = QueryFilter::all();
        session.refresh_view(ViewChangeReason::Loaded);
        Ok((session, outcome))
    }

    pub fn with_label_options(mut self, labels: LabelOptions) -> Self {
        self.labels = labels;
        self
    }

    pub fn subscribe(&mut self, listener: impl ViewListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn add_transaction(&mut self, transaction: NewTransaction) -> Result<TransactionId> {
        let id = self.store.add(transaction)?;
        info!(%id, "transaction recorded");
        self.after_mutation(ViewChangeReason::Added(id));
        Ok(id)
    }

    /// Parses raw form input and records it.
    pub fn add_transaction_from_input(
        &mut self,
        date: &str,
        kind: &str,
        amount: &str,
        category: &str,
        description: &str,
    ) -> Result<TransactionId> {
        let transaction = NewTransaction::parse(date, kind, amount, category, description)?;
        self.add_transaction(transaction)
    }

    pub fn delete_transaction(&mut self, id: TransactionId) -> Result<Transaction> {
        let removed = self.store.delete(id)?;
        info!(%id, "transaction removed");
        self.after_mutation(ViewChangeReason::Deleted(id));
        Ok(removed)
    }

    /// Replaces the active filter and returns the number of matching rows.
    pub fn apply_filter(&mut self, filter: QueryFilter) -> usize {
        self.filter = filter;
        self.refresh_view(ViewChangeReason::Filtered);
        self.view.len()
    }

    pub fn apply_filter_input<S: AsRef<str>>(
        &mut self,
        start: &str,
        end: &str,
        categories: &[S],
    ) -> Result<usize> {
        let filter = QueryFilter::parse(start, end, categories)?;
        Ok(self.apply_filter(filter))
    }

    pub fn reset_filter(&mut self) {
        self.filter = QueryFilter::all();
        self.refresh_view(ViewChangeReason::Reset);
    }

    /// Re-sorts the active view by `column`, toggling its direction.
    pub fn sort_by(&mut self, column: Column) -> SortDirection {
        let direction = self.sort.toggle(column);
        let sorted: Vec<TransactionId> = {
            let mut rows = self.view_records();
            sort_by_column(&mut rows, column, direction);
            rows.iter().map(|record| record.id()).collect()
        };
        self.view = sorted;
        self.notify(ViewChangeReason::Sorted(column, direction));
        direction
    }

    /// Rows of the active view in display order.
    pub fn get_active_view(&self) -> Vec<Transaction> {
        self.view_records().into_iter().cloned().collect()
    }

    pub fn active_ids(&self) -> &[TransactionId] {
        &self.view
    }

    pub fn active_filter(&self) -> &QueryFilter {
        &self.filter
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn get_category_totals(&self) -> CategoryTotals {
        category_totals(&self.view_records(), &self.labels)
    }

    pub fn get_daily_trend(&self) -> Vec<TrendPoint> {
        daily_trend(&self.view_records(), &self.store)
    }

    pub fn get_monthly_totals(&self) -> Vec<MonthlyTotals> {
        monthly_totals(&self.view_records())
    }

    pub fn view_summary(&self) -> ViewSummary {
        summarize(&self.view_records())
    }

    /// Balance across the whole ledger, independent of the active filter.
    pub fn current_balance(&self) -> f64 {
        current_balance(&self.store)
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    /// Writes the store through the storage backend. A failure leaves the
    /// in-memory state untouched.
    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.store).map_err(|err| {
            warn!(error = %err, "saving transactions failed");
            err
        })?;
        info!(records = self.store.len(), "transactions saved");
        Ok(())
    }

    fn after_mutation(&mut self, reason: ViewChangeReason) {
        recalculate(&mut self.store);
        self.filter = QueryFilter::all();
        self.refresh_view(reason);
    }

    fn refresh_view(&mut self, reason: ViewChangeReason) {
        self.sort.clear_active();
        let mut rows = self.filter.apply(&self.store);
        default_order(&mut rows);
        self.view = rows.iter().map(|record| record.id()).collect();
        self.notify(reason);
    }

    fn view_records(&self) -> Vec<&Transaction> {
        let by_id: HashMap<TransactionId, &Transaction> = self
            .store
            .all()
            .iter()
            .map(|record| (record.id(), record))
            .collect();
        self.view
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .collect()
    }

    fn notify(&mut self, reason: ViewChangeReason) {
        let change = ViewChange {
            reason,
            visible: self.view.len(),
        };
        for listener in &mut self.listeners {
            listener.view_changed(&change);
        }
    }
}
