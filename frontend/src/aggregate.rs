//! Totals and time series derived from a cache snapshot. Nothing here
//! touches the network or the DOM.

use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;

use crate::cache::DataCache;
use crate::models::Expense;

pub const RECENT_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardStats {
    pub total: Decimal,
    pub monthly: Decimal,
    pub category_count: usize,
    pub recent_count: usize,
}

pub fn total_spend(cache: &DataCache) -> Decimal {
    cache.expenses().iter().map(|e| e.amount).sum()
}

/// Spend in the current calendar month, by the local clock.
pub fn monthly_spend(cache: &DataCache) -> Decimal {
    monthly_spend_on(cache, Local::now().date_naive())
}

pub fn monthly_spend_on(cache: &DataCache, today: NaiveDate) -> Decimal {
    cache
        .expenses()
        .iter()
        .filter(|e| e.date.year() == today.year() && e.date.month() == today.month())
        .map(|e| e.amount)
        .sum()
}

pub fn category_total(cache: &DataCache, category_id: i64) -> Decimal {
    cache
        .expenses()
        .iter()
        .filter(|e| e.category_id == category_id)
        .map(|e| e.amount)
        .sum()
}

/// Spend per category name, in first-seen order. Expenses whose category
/// is not in the cache are left out.
pub fn category_breakdown(cache: &DataCache) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for expense in cache.expenses() {
        let Some(category) = cache.category(expense.category_id) else {
            continue;
        };
        match totals.iter_mut().find(|(name, _)| *name == category.name) {
            Some((_, sum)) => *sum += expense.amount,
            None => totals.push((category.name.clone(), expense.amount)),
        }
    }
    totals
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Spend per `YYYY-MM`, ascending.
pub fn monthly_trend(cache: &DataCache) -> Vec<(String, Decimal)> {
    let mut months: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in cache.expenses() {
        *months.entry(month_key(expense.date)).or_default() += expense.amount;
    }
    months.into_iter().collect()
}

/// First few expenses in server order; deliberately not re-sorted.
pub fn recent_expenses(cache: &DataCache) -> &[Expense] {
    let expenses = cache.expenses();
    &expenses[..expenses.len().min(RECENT_LIMIT)]
}

pub fn dashboard_stats(cache: &DataCache) -> DashboardStats {
    dashboard_stats_on(cache, Local::now().date_naive())
}

pub fn dashboard_stats_on(cache: &DataCache, today: NaiveDate) -> DashboardStats {
    DashboardStats {
        total: total_spend(cache),
        monthly: monthly_spend_on(cache, today),
        category_count: cache.categories().len(),
        recent_count: recent_expenses(cache).len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use rstest::rstest;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn expense(id: i64, amount: i64, category_id: i64, day: &str) -> Expense {
        Expense {
            id,
            amount: Decimal::from(amount),
            description: format!("expense {}", id),
            date: date(day),
            category_id,
        }
    }

    fn food() -> Vec<Category> {
        vec![Category {
            id: 1,
            name: "Food".to_string(),
        }]
    }

    #[test]
    fn food_scenario() {
        let cache = DataCache::with_data(
            vec![
                expense(1, 50, 1, "2024-03-01"),
                expense(2, 30, 1, "2024-04-01"),
            ],
            food(),
        );

        assert_eq!(total_spend(&cache), Decimal::from(80));
        assert_eq!(category_total(&cache, 1), Decimal::from(80));
        assert_eq!(
            category_breakdown(&cache),
            vec![("Food".to_string(), Decimal::from(80))]
        );
        assert_eq!(
            monthly_trend(&cache),
            vec![
                ("2024-03".to_string(), Decimal::from(50)),
                ("2024-04".to_string(), Decimal::from(30)),
            ]
        );
    }

    #[test]
    fn total_ignores_order() {
        let mut expenses = vec![
            expense(1, 5, 1, "2024-01-01"),
            expense(2, 17, 1, "2023-07-14"),
            expense(3, 250, 2, "2024-02-29"),
        ];
        let forward = total_spend(&DataCache::with_data(expenses.clone(), food()));
        expenses.reverse();
        let backward = total_spend(&DataCache::with_data(expenses, food()));
        assert_eq!(forward, backward);
        assert_eq!(forward, Decimal::from(272));
    }

    #[test]
    fn fractional_amounts_sum_exactly() {
        let mut a = expense(1, 0, 1, "2024-01-01");
        a.amount = Decimal::new(10, 2);
        let mut b = expense(2, 0, 1, "2024-01-01");
        b.amount = Decimal::new(20, 2);
        let cache = DataCache::with_data(vec![a, b], food());
        assert_eq!(total_spend(&cache), Decimal::new(30, 2));
    }

    #[rstest]
    #[case("2024-05-01", true)]
    #[case("2024-05-31", true)]
    #[case("2024-04-30", false)]
    #[case("2023-05-15", false)]
    #[case("2024-06-01", false)]
    fn monthly_spend_only_counts_current_month(#[case] day: &str, #[case] included: bool) {
        let cache = DataCache::with_data(vec![expense(1, 40, 1, day)], food());
        let expected = if included {
            Decimal::from(40)
        } else {
            Decimal::ZERO
        };
        assert_eq!(monthly_spend_on(&cache, date("2024-05-15")), expected);
    }

    #[test]
    fn monthly_spend_uses_local_clock() {
        let today = Local::now().date_naive();
        let cache = DataCache::with_data(
            vec![
                Expense {
                    date: today,
                    ..expense(1, 12, 1, "2000-01-01")
                },
                expense(2, 99, 1, "2000-01-01"),
            ],
            food(),
        );
        assert_eq!(monthly_spend(&cache), Decimal::from(12));
    }

    #[test]
    fn empty_category_totals_zero() {
        let cache = DataCache::with_data(vec![expense(1, 50, 1, "2024-03-01")], food());
        assert_eq!(category_total(&cache, 7), Decimal::ZERO);
    }

    #[test]
    fn breakdown_skips_unknown_categories() {
        let cache = DataCache::with_data(
            vec![
                expense(1, 50, 1, "2024-03-01"),
                expense(2, 70, 99, "2024-03-02"),
            ],
            food(),
        );
        assert_eq!(
            category_breakdown(&cache),
            vec![("Food".to_string(), Decimal::from(50))]
        );
    }

    #[test]
    fn breakdown_keeps_first_seen_order() {
        let categories = vec![
            Category {
                id: 1,
                name: "Food".to_string(),
            },
            Category {
                id: 2,
                name: "Rent".to_string(),
            },
        ];
        let cache = DataCache::with_data(
            vec![
                expense(1, 900, 2, "2024-03-01"),
                expense(2, 20, 1, "2024-03-02"),
                expense(3, 100, 2, "2024-03-03"),
            ],
            categories,
        );
        let names: Vec<String> = category_breakdown(&cache)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["Rent", "Food"]);
    }

    #[test]
    fn trend_keys_are_padded_and_ascending() {
        let cache = DataCache::with_data(
            vec![
                expense(1, 1, 1, "2024-11-03"),
                expense(2, 1, 1, "2023-02-10"),
                expense(3, 1, 1, "2024-01-09"),
                expense(4, 1, 1, "2024-11-30"),
            ],
            food(),
        );
        let trend = monthly_trend(&cache);
        let keys: Vec<&str> = trend.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["2023-02", "2024-01", "2024-11"]);
        assert!(keys.iter().all(|k| k.len() == 7 && k.as_bytes()[4] == b'-'));
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(trend[2].1, Decimal::from(2));
    }

    #[test]
    fn recent_takes_first_five_in_server_order() {
        let expenses: Vec<Expense> = (1..=7)
            .map(|id| expense(id, 1, 1, "2024-01-01"))
            .rev()
            .collect();
        let cache = DataCache::with_data(expenses, food());
        let ids: Vec<i64> = recent_expenses(&cache).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn stats_for_empty_cache() {
        let stats = dashboard_stats_on(&DataCache::default(), date("2024-01-01"));
        assert_eq!(
            stats,
            DashboardStats {
                total: Decimal::ZERO,
                monthly: Decimal::ZERO,
                category_count: 0,
                recent_count: 0,
            }
        );
    }
}
