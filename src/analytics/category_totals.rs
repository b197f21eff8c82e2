use std::collections::BTreeMap;

use crate::ledger::{Category, Transaction};
use crate::utils::format::format_whole;

/// Presentation knobs for slice labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelOptions {
    pub currency_symbol: String,
    /// Slices at or below this share of the total get no detail text.
    pub detail_threshold_percent: f64,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "NT$".into(),
            detail_threshold_percent: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub category: Category,
    pub total: f64,
    pub percent: f64,
    /// `"66.7% (NT$100)"`, or `None` when the slice is too small to label.
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryTotals {
    pub slices: Vec<CategorySlice>,
    pub total: f64,
}

impl CategoryTotals {
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn get(&self, category: Category) -> Option<&CategorySlice> {
        self.slices.iter().find(|slice| slice.category == category)
    }
}

/// Sums expense amounts per category over `view`.
pub fn category_totals(view: &[&Transaction], options: &LabelOptions) -> CategoryTotals {
    let mut sums: BTreeMap<Category, f64> = BTreeMap::new();
    for record in view.iter().filter(|record| record.is_expense()) {
        *sums.entry(record.category()).or_insert(0.0) += record.amount();
    }
    sums.retain(|_, total| *total > 0.0);

    let total: f64 = sums.values().sum();
    if total <= 0.0 {
        return CategoryTotals::default();
    }

    let slices = sums
        .into_iter()
        .map(|(category, sum)| {
            let percent = sum / total * 100.0;
            let detail = (percent > options.detail_threshold_percent).then(|| {
                format!(
                    "{percent:.1}% ({}{})",
                    options.currency_symbol,
                    format_whole(sum)
                )
            });
            CategorySlice {
                category,
                total: sum,
                percent,
                detail,
            }
        })
        .collect();

    CategoryTotals { slices, total }
}
