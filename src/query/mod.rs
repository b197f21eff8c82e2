//! Active-view selection and display ordering.

pub mod filter;
pub mod ordering;

pub use filter::{DateRange, QueryFilter};
pub use ordering::{default_order, sort_by_column, Column, SortDirection, SortState};
