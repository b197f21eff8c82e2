//! Derived views over the active transactions. All functions are pure.

pub mod category_totals;
pub mod daily_trend;
pub mod monthly;
pub mod summary;

pub use category_totals::{category_totals, CategorySlice, CategoryTotals, LabelOptions};
pub use daily_trend::{daily_trend, TrendPoint};
pub use monthly::{monthly_totals, MonthlyTotals};
pub use summary::{summarize, ViewSummary};
