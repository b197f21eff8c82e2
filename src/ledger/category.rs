use std::{fmt, str::FromStr};

use crate::errors::LedgerError;

/// Fixed set of spending and earning categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Salary,
    Investment,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Salary,
        Category::Investment,
        Category::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Salary => "Salary",
            Category::Investment => "Investment",
            Category::Other => "Other",
        }
    }

    /// Label written by older releases of the notebook file.
    fn legacy_label(self) -> &'static str {
        match self {
            Category::Food => "飲食",
            Category::Transport => "交通",
            Category::Entertainment => "娛樂",
            Category::Shopping => "購物",
            Category::Salary => "薪資",
            Category::Investment => "投資",
            Category::Other => "其他",
        }
    }

    /// Resolves a category from a stored file, accepting legacy labels.
    pub fn from_stored(label: &str) -> Option<Category> {
        let label = label.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.name() == label || category.legacy_label() == label)
    }

    /// Closest known category name, used to hint at typos.
    pub fn suggest(input: &str) -> Option<Category> {
        let lowered = input.to_lowercase();
        Category::ALL
            .into_iter()
            .map(|category| {
                let score = strsim::jaro_winkler(&lowered, &category.name().to_lowercase());
                (category, score)
            })
            .filter(|(_, score)| *score >= 0.8)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(category, _)| category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exact, case-sensitive match against the category names.
impl FromStr for Category {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(LedgerError::Validation("category must not be empty".into()));
        }
        Category::ALL
            .into_iter()
            .find(|category| category.name() == s)
            .ok_or_else(|| {
                let hint = Category::suggest(s)
                    .map(|c| format!(" (did you mean `{c}`?)"))
                    .unwrap_or_default();
                LedgerError::Validation(format!("unknown category `{s}`{hint}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_is_case_sensitive() {
        assert_eq!("Food".parse::<Category>().unwrap(), Category::Food);
        let err = "food".parse::<Category>().expect_err("lowercase must be rejected");
        assert!(err.to_string().contains("did you mean `Food`"), "{err}");
    }

    #[test]
    fn empty_category_is_rejected() {
        assert!(matches!(
            "".parse::<Category>(),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn stored_labels_accept_legacy_names() {
        assert_eq!(Category::from_stored("交通"), Some(Category::Transport));
        assert_eq!(Category::from_stored("Salary"), Some(Category::Salary));
        assert_eq!(Category::from_stored("Groceries"), None);
    }
}
