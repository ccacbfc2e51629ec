//! Client-side filters over already fetched rows. Every active criterion must
//! match; an unset criterion matches everything.

use chrono::NaiveDate;

use crate::dates::{parse_input_date, parse_row_date};
use crate::models::{Expense, IncomePayment, StudentSummary};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn from_inputs(from: &str, to: &str) -> Self {
        Self {
            from: parse_input_date(from),
            to: parse_input_date(to),
        }
    }

    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Inclusive on both ends. Rows without a readable date only pass when
    /// no bound is set.
    pub fn contains(&self, raw: &str) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(date) = parse_row_date(raw) else {
            return false;
        };
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty() || haystack.to_lowercase().contains(&needle)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IncomeFilter {
    pub range: DateRange,
    pub group_id: Option<i64>,
    pub student: String,
}

impl IncomeFilter {
    pub fn matches(&self, payment: &IncomePayment) -> bool {
        self.range.contains(&payment.payment_date)
            && self
                .group_id
                .map_or(true, |group| payment.group_id == Some(group))
            && contains_ignore_case(&payment.student_name, &self.student)
    }

    pub fn apply<'a>(&self, rows: &'a [IncomePayment]) -> Vec<&'a IncomePayment> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseFilter {
    pub range: DateRange,
    pub category: Option<String>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        self.range.contains(&expense.expense_date)
            && self
                .category
                .as_deref()
                .map_or(true, |category| expense.category == category)
    }

    pub fn apply(&self, rows: &[Expense]) -> Vec<Expense> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudentFilter {
    pub name: String,
    pub group_id: Option<i64>,
    pub status: Option<String>,
}

impl StudentFilter {
    pub fn matches(&self, student: &StudentSummary) -> bool {
        contains_ignore_case(&student.full_name, &self.name)
            && self
                .group_id
                .map_or(true, |group| student.group_id == Some(group))
            && self
                .status
                .as_deref()
                .map_or(true, |status| student.status == status)
    }

    pub fn apply<'a>(&self, rows: &'a [StudentSummary]) -> Vec<&'a StudentSummary> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

/// Distinct, sorted expense categories for the category select.
pub fn expense_categories(rows: &[Expense]) -> Vec<String> {
    let mut categories = rows
        .iter()
        .map(|e| e.category.clone())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>();
    categories.sort();
    categories.dedup();
    categories
}

/// Empty select values mean "any".
pub fn optional_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

pub fn optional_text(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64, name: &str, group: Option<i64>, status: &str) -> StudentSummary {
        StudentSummary {
            id,
            full_name: name.to_string(),
            student_number: None,
            group_id: group,
            group_name: None,
            tariff_name: None,
            status: status.to_string(),
            photo_path: None,
            admission_date: None,
        }
    }

    fn payment(name: &str, group: Option<i64>, date: &str) -> IncomePayment {
        IncomePayment {
            id: Some(1),
            student_id: Some(1),
            student_name: name.to_string(),
            group_id: group,
            group_name: None,
            tariff_name: None,
            amount_paid: 100.0,
            amount_due: 0.0,
            payment_date: date.to_string(),
            is_full_payment: true,
            notes: None,
        }
    }

    fn expense(category: &str, date: &str) -> Expense {
        Expense {
            id: 1,
            category: category.to_string(),
            amount: 10.0,
            expense_date: date.to_string(),
            description: None,
        }
    }

    fn roster() -> Vec<StudentSummary> {
        vec![
            student(1, "Anna Karimova", Some(1), "active"),
            student(2, "Joanna Lee", Some(2), "active"),
            student(3, "HANNAH Smith", Some(1), "inactive"),
            student(4, "Boris Petrov", Some(1), "active"),
        ]
    }

    #[test]
    fn name_substring_is_case_insensitive() {
        let rows = roster();
        let filter = StudentFilter {
            name: "ann".into(),
            ..StudentFilter::default()
        };
        let ids: Vec<i64> = filter.apply(&rows).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn student_criteria_combine() {
        let rows = roster();
        let filter = StudentFilter {
            name: "ann".into(),
            group_id: Some(1),
            status: Some("active".into()),
        };
        let ids: Vec<i64> = filter.apply(&rows).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn empty_student_filter_keeps_everything() {
        let rows = roster();
        assert_eq!(StudentFilter::default().apply(&rows).len(), rows.len());
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::from_inputs("2024-03-01", "2024-03-31");
        assert!(range.contains("2024-03-01T00:00:00"));
        assert!(range.contains("2024-03-31T23:59:59"));
        assert!(!range.contains("2024-04-01"));
        assert!(!range.contains("2024-02-29"));
    }

    #[test]
    fn unreadable_dates_only_pass_without_bounds() {
        assert!(DateRange::default().contains("not a date"));
        assert!(!DateRange::from_inputs("2024-01-01", "").contains("not a date"));
    }

    #[test]
    fn income_filter_by_group_and_student() {
        let rows = vec![
            payment("Anna Karimova", Some(1), "2024-03-05"),
            payment("Boris Petrov", Some(1), "2024-03-06"),
            payment("Anna Lee", Some(2), "2024-03-07"),
        ];
        let filter = IncomeFilter {
            group_id: Some(1),
            student: "anna".into(),
            ..IncomeFilter::default()
        };
        let names: Vec<&str> = filter
            .apply(&rows)
            .iter()
            .map(|p| p.student_name.as_str())
            .collect();
        assert_eq!(names, vec!["Anna Karimova"]);
    }

    #[test]
    fn expense_filter_by_category_and_range() {
        let rows = vec![
            expense("Rent", "2024-03-01"),
            expense("Equipment", "2024-03-02"),
            expense("Rent", "2024-04-01"),
        ];
        let filter = ExpenseFilter {
            range: DateRange::from_inputs("", "2024-03-31"),
            category: Some("Rent".into()),
        };
        assert_eq!(filter.apply(&rows), vec![rows[0].clone()]);
        assert_eq!(expense_categories(&rows), vec!["Equipment", "Rent"]);
    }

    #[test]
    fn select_values() {
        assert_eq!(optional_id(""), None);
        assert_eq!(optional_id("12"), Some(12));
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" active "), Some("active".to_string()));
    }
}
