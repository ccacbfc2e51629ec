//! Monthly tariff payments: which months can be paid, how the 12-month grid
//! is classified, and the checks run before a payment is submitted.
//!
//! Both the student payment grid and the finance "add income" month picker
//! go through [`AvailabilityRule`] so the admission/future rules cannot drift
//! apart between the two.

use chrono::{Duration, NaiveDate};

use crate::dates::{month_name, YearMonth};
use crate::error::ValidationError;
use crate::format::Sum;
use crate::models::{MonthPayment, MonthlyPaymentEntry, MonthlyPaymentRequest, PaymentsByMonth};

/// Payment dates older than this many days are rejected.
pub const PAYMENT_DATE_WINDOW_DAYS: i64 = 14;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonthState {
    Disabled,
    Paid,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AvailabilityRule {
    pub admission: Option<YearMonth>,
    pub today: YearMonth,
    pub block_future: bool,
}

impl AvailabilityRule {
    pub fn is_before_admission(&self, month: YearMonth) -> bool {
        self.admission.map_or(false, |admission| month < admission)
    }

    pub fn is_blocked_future(&self, month: YearMonth) -> bool {
        self.block_future && month > self.today
    }

    pub fn admitted_after(&self, year: i32) -> bool {
        self.admission.map_or(false, |admission| admission.year > year)
    }

    pub fn is_available(&self, month: YearMonth) -> bool {
        !self.is_before_admission(month) && !self.is_blocked_future(month)
    }
}

/// Classifies one month. Availability wins over payment status, so a paid
/// month before admission still reads as disabled.
pub fn month_state(rule: &AvailabilityRule, month: YearMonth, remainder: f64) -> MonthState {
    if !rule.is_available(month) {
        MonthState::Disabled
    } else if remainder <= 0.0 {
        MonthState::Paid
    } else {
        MonthState::Open
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthCell {
    pub month: YearMonth,
    pub state: MonthState,
    pub total_paid: f64,
    pub remainder: f64,
    pub payments: Vec<MonthPayment>,
}

impl MonthCell {
    pub fn name(&self) -> &'static str {
        self.month.name()
    }
}

pub fn build_grid(
    year: i32,
    rule: &AvailabilityRule,
    payments: &PaymentsByMonth,
    tariff_price: f64,
) -> Vec<MonthCell> {
    (1..=12)
        .map(|m| {
            let month = YearMonth::new(year, m);
            let entry = payments.get(&month.key());
            let total_paid = entry.map_or(0.0, |e| e.total_paid);
            let remainder = entry.map_or(tariff_price, |e| e.remainder);
            MonthCell {
                month,
                state: month_state(rule, month, remainder),
                total_paid,
                remainder,
                payments: entry.map(|e| e.payments.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthOption {
    pub month: u32,
    pub paid: f64,
    pub remainder: f64,
}

impl MonthOption {
    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }
}

/// Months offered by the finance "add income" picker: available and not yet
/// fully paid.
pub fn selectable_months(
    year: i32,
    rule: &AvailabilityRule,
    payments: &PaymentsByMonth,
    tariff_price: f64,
) -> Result<Vec<MonthOption>, ValidationError> {
    if rule.admitted_after(year) {
        return Err(ValidationError::AdmittedLater);
    }

    let options = (1..=12)
        .filter_map(|m| {
            let month = YearMonth::new(year, m);
            let paid = payments
                .get(&month.key())
                .map_or(0.0, |e: &MonthlyPaymentEntry| e.total_paid);
            let remainder = tariff_price - paid;
            (month_state(rule, month, remainder) == MonthState::Open).then_some(MonthOption {
                month: m,
                paid,
                remainder,
            })
        })
        .collect::<Vec<_>>();

    if options.is_empty() {
        Err(ValidationError::NoOpenMonths)
    } else {
        Ok(options)
    }
}

/// Parses a payment amount field. It must be a positive number. When the tariff
/// price and the month's remainder are known, it must not exceed the remainder.
pub fn validate_amount(
    raw: &str,
    tariff_price: f64,
    remainder: Option<f64>,
) -> Result<f64, ValidationError> {
    let amount = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or(ValidationError::InvalidAmount)?;

    if let Some(max) = remainder {
        if tariff_price > 0.0 && max >= 0.0 && amount > max {
            return Err(ValidationError::ExceedsRemainder { max: Sum(max) });
        }
    }
    Ok(amount)
}

/// Inclusive `(min, max)` bounds for the payment date picker.
pub fn payment_date_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(PAYMENT_DATE_WINDOW_DAYS), today)
}

pub fn validate_payment_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    let (min, max) = payment_date_bounds(today);
    if date > max {
        Err(ValidationError::FutureDate)
    } else if date < min {
        Err(ValidationError::DateTooOld(PAYMENT_DATE_WINDOW_DAYS))
    } else {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectedMonth {
    pub month: YearMonth,
    pub remainder: f64,
    pub payments: Vec<MonthPayment>,
}

/// State of the student payment modal: the viewed year, the fetched payment
/// map and the currently selected month.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentView {
    pub student_id: i64,
    pub tariff_price: f64,
    pub rule: AvailabilityRule,
    pub year: i32,
    pub payments: PaymentsByMonth,
    pub selected: Option<SelectedMonth>,
}

impl PaymentView {
    pub fn new(
        student_id: i64,
        tariff_price: f64,
        rule: AvailabilityRule,
        payments: PaymentsByMonth,
    ) -> Self {
        Self {
            student_id,
            tariff_price,
            year: rule.today.year,
            rule,
            payments,
            selected: None,
        }
    }

    pub fn cells(&self) -> Vec<MonthCell> {
        build_grid(self.year, &self.rule, &self.payments, self.tariff_price)
    }

    /// Moves the viewed year. The payment map is reused as-is.
    pub fn shift_year(&mut self, delta: i32) {
        self.year += delta;
        self.selected = None;
    }

    /// Selects an open month; disabled and paid months are ignored.
    pub fn select(&mut self, month: u32) -> bool {
        let cell = self
            .cells()
            .into_iter()
            .find(|c| c.month.month == month && c.state == MonthState::Open);
        match cell {
            Some(cell) => {
                self.selected = Some(SelectedMonth {
                    month: cell.month,
                    remainder: cell.remainder,
                    payments: cell.payments,
                });
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn amount_placeholder(&self) -> String {
        match &self.selected {
            Some(selected) if selected.remainder > 0.0 => {
                format!("Remaining: {}", Sum(selected.remainder))
            }
            // `select` only takes open months, so a zero remainder only
            // shows up on a directly built selection.
            _ => "Additional payment".to_string(),
        }
    }

    /// Builds the request for the selected month, or the reason it cannot be
    /// sent.
    pub fn request(
        &self,
        raw_amount: &str,
        payment_date: &str,
        notes: &str,
    ) -> Result<MonthlyPaymentRequest, ValidationError> {
        let selected = self
            .selected
            .as_ref()
            .ok_or(ValidationError::NoMonthSelected)?;
        let amount = validate_amount(raw_amount, self.tariff_price, Some(selected.remainder))?;
        if payment_date.trim().is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(MonthlyPaymentRequest {
            student_id: self.student_id,
            month: selected.month.month,
            year: selected.month.year,
            payment_date: payment_date.trim().to_string(),
            amount,
            notes: notes.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARIFF: f64 = 500_000.0;

    fn entry(total_paid: f64) -> MonthlyPaymentEntry {
        MonthlyPaymentEntry {
            payments: vec![MonthPayment {
                id: Some(1),
                date: Some("2024-03-01T10:00:00".into()),
                amount: total_paid,
                notes: None,
            }],
            total_paid,
            remainder: TARIFF - total_paid,
        }
    }

    fn rule(admission: Option<(i32, u32)>, block_future: bool) -> AvailabilityRule {
        AvailabilityRule {
            admission: admission.map(|(y, m)| YearMonth::new(y, m)),
            today: YearMonth::new(2024, 6),
            block_future,
        }
    }

    fn state_of(cells: &[MonthCell], month: u32) -> MonthState {
        cells[month as usize - 1].state
    }

    #[test]
    fn paid_months_are_not_selectable() {
        let mut payments = PaymentsByMonth::new();
        payments.insert("2024-02".into(), entry(TARIFF));
        payments.insert("2024-03".into(), entry(TARIFF + 10_000.0));

        let mut view = PaymentView::new(1, TARIFF, rule(None, false), payments);
        let cells = view.cells();
        assert_eq!(state_of(&cells, 2), MonthState::Paid);
        assert_eq!(state_of(&cells, 3), MonthState::Paid);
        assert_eq!(cells[2].remainder, -10_000.0);
        assert!(!view.select(2));
        assert!(!view.select(3));
        assert!(view.select(4));
    }

    #[test]
    fn months_before_admission_are_disabled() {
        let admitted = rule(Some((2024, 4)), false);
        let cells = build_grid(2024, &admitted, &PaymentsByMonth::new(), TARIFF);
        assert!(cells[..3].iter().all(|c| c.state == MonthState::Disabled));
        assert!(cells[3..].iter().all(|c| c.state == MonthState::Open));

        let earlier_year = build_grid(2023, &admitted, &PaymentsByMonth::new(), TARIFF);
        assert!(earlier_year.iter().all(|c| c.state == MonthState::Disabled));

        let later_year = build_grid(2025, &admitted, &PaymentsByMonth::new(), TARIFF);
        assert!(later_year.iter().all(|c| c.state == MonthState::Open));
    }

    #[test]
    fn disabled_takes_precedence_over_paid() {
        let mut payments = PaymentsByMonth::new();
        payments.insert("2024-01".into(), entry(TARIFF));
        let cells = build_grid(2024, &rule(Some((2024, 3)), false), &payments, TARIFF);
        assert_eq!(state_of(&cells, 1), MonthState::Disabled);
    }

    #[test]
    fn future_months_blocked_only_when_configured() {
        let open = build_grid(2024, &rule(None, false), &PaymentsByMonth::new(), TARIFF);
        assert_eq!(state_of(&open, 7), MonthState::Open);

        let blocked = build_grid(2024, &rule(None, true), &PaymentsByMonth::new(), TARIFF);
        assert_eq!(state_of(&blocked, 6), MonthState::Open);
        assert_eq!(state_of(&blocked, 7), MonthState::Disabled);

        let next_year = build_grid(2025, &rule(None, true), &PaymentsByMonth::new(), TARIFF);
        assert!(next_year.iter().all(|c| c.state == MonthState::Disabled));
    }

    #[test]
    fn missing_entry_uses_tariff_as_remainder() {
        let cells = build_grid(2024, &rule(None, false), &PaymentsByMonth::new(), TARIFF);
        assert!(cells.iter().all(|c| c.remainder == TARIFF && c.total_paid == 0.0));
    }

    #[test]
    fn year_navigation_reuses_loaded_payments_and_clears_selection() {
        let mut payments = PaymentsByMonth::new();
        payments.insert("2023-05".into(), entry(TARIFF));
        let mut view = PaymentView::new(1, TARIFF, rule(None, false), payments);
        assert!(view.select(1));

        view.shift_year(-1);
        assert_eq!(view.year, 2023);
        assert_eq!(view.selected, None);
        assert_eq!(state_of(&view.cells(), 5), MonthState::Paid);

        view.shift_year(1);
        assert_eq!(view.year, 2024);
        assert_eq!(state_of(&view.cells(), 5), MonthState::Open);
    }

    #[test]
    fn picker_omits_paid_and_future_months() {
        let mut payments = PaymentsByMonth::new();
        payments.insert("2024-05".into(), entry(TARIFF));
        payments.insert("2024-04".into(), entry(100_000.0));

        let options =
            selectable_months(2024, &rule(Some((2024, 3)), true), &payments, TARIFF).unwrap();
        let months: Vec<u32> = options.iter().map(|o| o.month).collect();
        assert_eq!(months, vec![3, 4, 6]);
        assert_eq!(options[1].paid, 100_000.0);
        assert_eq!(options[1].remainder, 400_000.0);
        assert_eq!(options[0].name(), "March");
    }

    #[test]
    fn picker_reports_late_admission_and_empty_lists() {
        assert_eq!(
            selectable_months(2024, &rule(Some((2025, 1)), true), &PaymentsByMonth::new(), TARIFF),
            Err(ValidationError::AdmittedLater)
        );

        let mut payments = PaymentsByMonth::new();
        for m in 1..=6 {
            payments.insert(YearMonth::new(2024, m).key(), entry(TARIFF));
        }
        assert_eq!(
            selectable_months(2024, &rule(None, true), &payments, TARIFF),
            Err(ValidationError::NoOpenMonths)
        );
    }

    #[test]
    fn amount_above_remainder_is_rejected() {
        assert_eq!(
            validate_amount("300000", TARIFF, Some(200_000.0)),
            Err(ValidationError::ExceedsRemainder {
                max: Sum(200_000.0)
            })
        );
        assert_eq!(validate_amount("200000", TARIFF, Some(200_000.0)), Ok(200_000.0));
        assert_eq!(
            ValidationError::ExceedsRemainder {
                max: Sum(200_000.0)
            }
            .to_string(),
            "Amount exceeds the tariff remainder. At most 200,000 sum is allowed"
        );
    }

    #[test]
    fn remainder_limit_needs_a_known_tariff() {
        assert_eq!(validate_amount("900", 0.0, Some(100.0)), Ok(900.0));
        assert_eq!(validate_amount("900", TARIFF, None), Ok(900.0));
    }

    #[test]
    fn amount_must_be_positive_number() {
        for raw in ["", "abc", "0", "-5", "NaN"] {
            assert_eq!(
                validate_amount(raw, TARIFF, Some(TARIFF)),
                Err(ValidationError::InvalidAmount),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn request_requires_a_selected_month() {
        let mut view = PaymentView::new(9, TARIFF, rule(None, false), PaymentsByMonth::new());
        assert_eq!(
            view.request("1000", "2024-06-01", ""),
            Err(ValidationError::NoMonthSelected)
        );

        assert!(view.select(6));
        assert_eq!(view.amount_placeholder(), "Remaining: 500,000 sum");
        assert_eq!(
            view.request("600000", "2024-06-01", ""),
            Err(ValidationError::ExceedsRemainder { max: Sum(TARIFF) })
        );

        let request = view.request("250000", "2024-06-01", " cash ").unwrap();
        assert_eq!(request.student_id, 9);
        assert_eq!((request.year, request.month), (2024, 6));
        assert_eq!(request.amount, 250_000.0);
        assert_eq!(request.notes, "cash");
    }

    #[test]
    fn placeholder_without_remainder() {
        let mut view = PaymentView::new(9, TARIFF, rule(None, false), PaymentsByMonth::new());
        assert_eq!(view.amount_placeholder(), "Additional payment");

        view.selected = Some(SelectedMonth {
            month: YearMonth {
                year: 2024,
                month: 6,
            },
            remainder: 0.0,
            payments: Vec::new(),
        });
        assert_eq!(view.amount_placeholder(), "Additional payment");
    }

    #[test]
    fn payment_date_window() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
        assert_eq!(validate_payment_date(today, today), Ok(()));
        assert_eq!(
            validate_payment_date(today - Duration::days(14), today),
            Ok(())
        );
        assert_eq!(
            validate_payment_date(today - Duration::days(15), today),
            Err(ValidationError::DateTooOld(14))
        );
        assert_eq!(
            validate_payment_date(today + Duration::days(1), today),
            Err(ValidationError::FutureDate)
        );
    }
}
