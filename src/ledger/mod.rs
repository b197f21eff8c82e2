//! Ledger records, the transaction store, and balance recalculation.

pub mod balance;
pub mod category;
pub mod store;
pub mod transaction;

pub use balance::{current_balance, recalculate};
pub use category::Category;
pub use store::TransactionStore;
pub use transaction::{
    parse_date, NewTransaction, Transaction, TransactionId, TransactionKind, DATE_FORMAT,
};
