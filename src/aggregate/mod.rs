use std::collections::HashMap;
use log::{debug, warn};

use crate::classify::{Bucket, Classification, Classifier};
use crate::model::{BudgetMonth, Category};

/// Which amount column of a category feeds the aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AmountField {
    Spent,
    Budgeted,
}

impl AmountField {
    pub(crate) fn pick(&self, category: &Category) -> i64 {
        match self {
            AmountField::Spent => category.spent,
            AmountField::Budgeted => category.budgeted,
        }
    }
}

/// One row of the final report.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BucketTotal {
    pub(crate) bucket: Bucket,
    /// Signed sum in minor currency units
    pub(crate) amount: i64,
    pub(crate) percentage: f64,
}

/// Per-bucket sums and their share of the retained total.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Breakdown {
    /// Rows in classifier table order. Buckets that never received an
    /// amount are absent, not zero.
    pub(crate) rows: Vec<BucketTotal>,
    pub(crate) total: i64,
}

/// Sum one month's categories into buckets and derive percentages.
///
/// Amounts of exactly zero never enter a sum. Categories matching more
/// than one marker are warned about and dropped. Buckets in `excluded` are
/// filtered out after summing, before percentages, so percentages are over
/// the retained total only. These are two separate rules: a zero-activity
/// bucket disappears on its own, an excluded bucket disappears whatever
/// its sum.
pub(crate) fn aggregate(
    month: &BudgetMonth,
    classifier: &Classifier,
    field: AmountField,
    excluded: &[Bucket],
) -> Breakdown {
    let mut sums: HashMap<Bucket, i64> = HashMap::new();

    for group in &month.category_groups {
        debug!("Group '{}': {} categories", group.name, group.categories.len());
        for category in &group.categories {
            let bucket = match classifier.classify(&category.name) {
                Classification::Bucket(bucket) => bucket,
                Classification::Conflict(buckets) => {
                    let labels: Vec<&str> = buckets.iter().map(Bucket::label).collect();
                    warn!(
                        "Ignoring '{}': belongs to multiple buckets: {}",
                        category.name,
                        labels.join(", ")
                    );
                    continue;
                }
            };

            let amount = field.pick(category);
            if amount != 0 {
                *sums.entry(bucket).or_insert(0) += amount;
            }
        }
    }

    let retained: Vec<(Bucket, i64)> = classifier
        .bucket_order()
        .into_iter()
        .filter(|bucket| !excluded.contains(bucket))
        .filter_map(|bucket| sums.get(&bucket).map(|sum| (bucket, *sum)))
        .collect();

    let total: i64 = retained.iter().map(|(_, amount)| amount).sum();
    if total == 0 && !retained.is_empty() {
        warn!("Retained buckets sum to zero, reporting percentages as 0");
    }

    let rows = retained
        .into_iter()
        .map(|(bucket, amount)| BucketTotal {
            bucket,
            amount,
            percentage: if total == 0 {
                0.0
            } else {
                100.0 * amount as f64 / total as f64
            },
        })
        .collect();

    Breakdown { rows, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DEFAULT_MARKERS;
    use crate::model::CategoryGroup;

    fn category(name: &str, spent: i64, budgeted: i64) -> Category {
        Category { name: name.to_string(), spent, budgeted }
    }

    fn month_of(categories: Vec<Category>) -> BudgetMonth {
        BudgetMonth {
            category_groups: vec![CategoryGroup { name: "All".to_string(), categories }],
        }
    }

    fn classifier() -> Classifier {
        Classifier::new(DEFAULT_MARKERS)
    }

    #[test]
    fn test_percentages_over_retained_total() {
        let month = month_of(vec![
            category("🟠 Fun", 100, 0),
            category("🔴 Rent", 300, 0),
            category("💰 Savings", 0, 0),
        ]);
        let breakdown = aggregate(&month, &classifier(), AmountField::Spent, &[Bucket::Unmatched]);

        // Save had zero activity, so it is absent rather than a 0-row
        assert_eq!(breakdown.total, 400);
        assert_eq!(breakdown.rows.len(), 2);
        assert_eq!(breakdown.rows[0].bucket, Bucket::Want);
        assert_eq!(breakdown.rows[0].amount, 100);
        assert_eq!(breakdown.rows[0].percentage, 25.0);
        assert_eq!(breakdown.rows[1].bucket, Bucket::Need);
        assert_eq!(breakdown.rows[1].percentage, 75.0);

        let percent_sum: f64 = breakdown.rows.iter().map(|r| r.percentage).sum();
        assert_eq!(percent_sum, 100.0);
    }

    #[test]
    fn test_conflicting_category_is_dropped() {
        let month = month_of(vec![
            category("🟠🔴 Mixed", 500, 0),
            category("🔴 Rent", 300, 0),
        ]);
        let breakdown = aggregate(&month, &classifier(), AmountField::Spent, &[Bucket::Unmatched]);

        assert_eq!(breakdown.total, 300);
        assert_eq!(breakdown.rows.len(), 1);
        assert_eq!(breakdown.rows[0].bucket, Bucket::Need);
    }

    #[test]
    fn test_unmatched_goes_to_catch_all() {
        let month = month_of(vec![
            category("Rent", 100, 0),
            category("🔴 Groceries", 100, 0),
        ]);
        let breakdown = aggregate(&month, &classifier(), AmountField::Spent, &[]);

        assert_eq!(breakdown.total, 200);
        let other = breakdown.rows.iter().find(|r| r.bucket == Bucket::Unmatched).unwrap();
        assert_eq!(other.amount, 100);
        assert_eq!(other.percentage, 50.0);
    }

    #[test]
    fn test_label_exclusion_is_independent_of_zero_skip() {
        let month = month_of(vec![
            category("🔨 Freelance", 600, 0),
            category("🔴 Rent", 200, 0),
        ]);

        let with_work = aggregate(&month, &classifier(), AmountField::Spent, &[Bucket::Unmatched]);
        assert_eq!(with_work.total, 800);

        let without_work =
            aggregate(&month, &classifier(), AmountField::Spent, &[Bucket::Unmatched, Bucket::Work]);
        assert_eq!(without_work.total, 200);
        assert_eq!(without_work.rows.len(), 1);
        assert_eq!(without_work.rows[0].percentage, 100.0);
    }

    #[test]
    fn test_budgeted_field() {
        let month = month_of(vec![
            category("🟠 Fun", -4500, 10000),
            category("🔴 Rent", -120000, 30000),
        ]);
        let breakdown = aggregate(&month, &classifier(), AmountField::Budgeted, &[Bucket::Unmatched]);

        assert_eq!(breakdown.total, 40000);
        assert_eq!(breakdown.rows[0].percentage, 25.0);
        assert_eq!(breakdown.rows[1].percentage, 75.0);
    }

    #[test]
    fn test_signed_amounts_sum_signed() {
        let month = month_of(vec![
            category("🟠 Fun", -100, 0),
            category("🟠 Cinema", -300, 0),
        ]);
        let breakdown = aggregate(&month, &classifier(), AmountField::Spent, &[Bucket::Unmatched]);
        assert_eq!(breakdown.total, -400);
        assert_eq!(breakdown.rows[0].amount, -400);
        assert_eq!(breakdown.rows[0].percentage, 100.0);
    }

    #[test]
    fn test_zero_retained_total_reports_zero_percentages() {
        let month = month_of(vec![
            category("🟠 Fun", 250, 0),
            category("🟠 Refund", -250, 0),
        ]);
        let breakdown = aggregate(&month, &classifier(), AmountField::Spent, &[Bucket::Unmatched]);

        assert_eq!(breakdown.total, 0);
        assert_eq!(breakdown.rows.len(), 1);
        assert_eq!(breakdown.rows[0].percentage, 0.0);
    }

    #[test]
    fn test_empty_month() {
        let breakdown = aggregate(&month_of(vec![]), &classifier(), AmountField::Spent, &[]);
        assert!(breakdown.rows.is_empty());
        assert_eq!(breakdown.total, 0);
    }

    #[test]
    fn test_idempotent_over_same_snapshot() {
        let month = month_of(vec![
            category("🟠 Fun", 123, 0),
            category("🔴 Rent", 456, 0),
            category("Misc", 789, 0),
        ]);
        let first = aggregate(&month, &classifier(), AmountField::Spent, &[Bucket::Unmatched]);
        let second = aggregate(&month, &classifier(), AmountField::Spent, &[Bucket::Unmatched]);
        assert_eq!(first, second);
    }
}
