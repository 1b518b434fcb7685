use std::collections::HashMap;
use serde::Deserialize;

/// One budget category as returned by the server. Amounts are signed
/// integers in minor currency units (cents).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Category {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) spent: i64,
    #[serde(default)]
    pub(crate) budgeted: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CategoryGroup {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) categories: Vec<Category>,
}

/// Category breakdown of a single `YYYY-MM` period. Groups only matter as
/// an iteration shape, nothing here aggregates per group.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BudgetMonth {
    #[serde(rename = "categoryGroups", default)]
    pub(crate) category_groups: Vec<CategoryGroup>,
}

/// A downloaded budget file, keyed by month.
#[derive(Debug, Deserialize)]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub(crate) months: HashMap<String, BudgetMonth>,
}
