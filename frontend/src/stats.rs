use chrono::NaiveDate;

use crate::dates::{parse_row_date, YearMonth};
use crate::models::{AnalyticsMonth, Expense};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub today: f64,
    pub month: f64,
    pub total: f64,
}

/// Today/this month/all-time sums over the (possibly filtered) expense rows.
pub fn expense_totals(rows: &[Expense], today: NaiveDate) -> Totals {
    let this_month = YearMonth::of(today);
    rows.iter().fold(Totals::default(), |mut acc, expense| {
        acc.total += expense.amount;
        if let Some(date) = parse_row_date(&expense.expense_date) {
            if date == today {
                acc.today += expense.amount;
            }
            if YearMonth::of(date) == this_month {
                acc.month += expense.amount;
            }
        }
        acc
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnalyticsTotals {
    pub income: f64,
    pub expense: f64,
}

impl AnalyticsTotals {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

pub fn analytics_totals(months: &[AnalyticsMonth]) -> AnalyticsTotals {
    months.iter().fold(AnalyticsTotals::default(), |acc, m| AnalyticsTotals {
        income: acc.income + m.income,
        expense: acc.expense + m.expense,
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub income: f64,
    pub expense: f64,
    /// Bar heights in percent of the tallest value.
    pub income_pct: f64,
    pub expense_pct: f64,
}

pub fn chart_bars(months: &[AnalyticsMonth]) -> Vec<ChartBar> {
    let peak = months
        .iter()
        .flat_map(|m| [m.income, m.expense])
        .fold(0.0_f64, f64::max);
    let scale = |value: f64| {
        if peak > 0.0 {
            (value.max(0.0) / peak) * 100.0
        } else {
            0.0
        }
    };

    months
        .iter()
        .map(|m| ChartBar {
            label: m.month_name.clone(),
            income: m.income,
            expense: m.expense,
            income_pct: scale(m.income),
            expense_pct: scale(m.expense),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(amount: f64, date: &str) -> Expense {
        Expense {
            id: 1,
            category: "Rent".into(),
            amount,
            expense_date: date.into(),
            description: None,
        }
    }

    fn month(name: &str, income: f64, expense: f64) -> AnalyticsMonth {
        AnalyticsMonth {
            month_name: name.into(),
            income,
            expense,
        }
    }

    #[test]
    fn expense_totals_split_by_period() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let rows = vec![
            expense(100.0, "2024-06-15T09:00:00"),
            expense(50.0, "2024-06-01"),
            expense(25.0, "2024-05-31"),
            expense(5.0, ""),
        ];
        assert_eq!(
            expense_totals(&rows, today),
            Totals {
                today: 100.0,
                month: 150.0,
                total: 180.0,
            }
        );
    }

    #[test]
    fn analytics_balance() {
        let totals = analytics_totals(&[month("Jan", 300.0, 100.0), month("Feb", 0.0, 250.0)]);
        assert_eq!(totals.income, 300.0);
        assert_eq!(totals.expense, 350.0);
        assert_eq!(totals.balance(), -50.0);
    }

    #[test]
    fn bars_scale_to_largest_value() {
        let bars = chart_bars(&[month("Jan", 200.0, 50.0), month("Feb", 100.0, 0.0)]);
        assert_eq!(bars[0].income_pct, 100.0);
        assert_eq!(bars[0].expense_pct, 25.0);
        assert_eq!(bars[1].income_pct, 50.0);
        assert_eq!(bars[1].label, "Feb");
    }

    #[test]
    fn bars_with_no_data_stay_flat() {
        let bars = chart_bars(&[month("Jan", 0.0, 0.0)]);
        assert_eq!(bars[0].income_pct, 0.0);
        assert_eq!(bars[0].expense_pct, 0.0);
        assert!(chart_bars(&[]).is_empty());
    }
}
