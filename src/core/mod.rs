pub mod session;
pub mod utils;

pub use session::{LedgerSession, LoadOutcome, ViewChange, ViewChangeReason, ViewListener};
