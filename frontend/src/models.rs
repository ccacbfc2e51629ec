use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Backend tariff price used when a student has no tariff attached.
pub const DEFAULT_TARIFF_PRICE: f64 = 500_000.0;

fn nullable_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_status() -> String {
    "active".to_string()
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

// ---------------------------------------------------------------- finances

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IncomePayment {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub student_name: String,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub tariff_name: Option<String>,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub amount_paid: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub amount_due: f64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub payment_date: String,
    #[serde(default)]
    pub is_full_payment: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IncomeSummary {
    #[serde(default, deserialize_with = "nullable_f64")]
    pub today: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub month: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub total: f64,
    #[serde(default)]
    pub payments: Vec<IncomePayment>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Expense {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub category: String,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub expense_date: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ExpenseSummary {
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpenseDraft {
    pub category: String,
    pub amount: f64,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Debtor {
    pub student_id: i64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub student_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub student_phone: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tariff_name: String,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub amount_paid: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub amount_due: f64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub month_label: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DebtorsReport {
    #[serde(default, deserialize_with = "nullable_f64")]
    pub total_debt: f64,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub debtors: Vec<Debtor>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnalyticsMonth {
    pub month_name: String,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub income: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub expense: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnalyticsReport {
    #[serde(default)]
    pub months: Vec<AnalyticsMonth>,
}

// ---------------------------------------------------------------- payments

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MonthPayment {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub amount: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MonthlyPaymentEntry {
    #[serde(default)]
    pub payments: Vec<MonthPayment>,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub total_paid: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub remainder: f64,
}

pub type PaymentsByMonth = BTreeMap<String, MonthlyPaymentEntry>;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MonthlyPayments {
    #[serde(default)]
    pub payments_by_month: PaymentsByMonth,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub tariff_price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlyPaymentRequest {
    pub student_id: i64,
    pub month: u32,
    pub year: i32,
    pub payment_date: String,
    pub amount: f64,
    pub notes: String,
}

/// Body of `PUT /api/payments/{id}/update`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PaymentUpdate {
    /// Correction from the student payment history.
    Correction {
        amount_paid: f64,
        payment_date: String,
        notes: String,
    },
    /// Edit from the finance income table.
    Income {
        student_id: i64,
        amount: f64,
        notes: String,
    },
}

// ---------------------------------------------------------------- students

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub schedule_time: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Tariff {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub price: f64,
    #[serde(default)]
    pub lessons_count: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StudentSummary {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub full_name: String,
    #[serde(default)]
    pub student_number: Option<String>,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub tariff_name: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default)]
    pub admission_date: Option<String>,
}

impl StudentSummary {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    pub fn number_label(&self) -> String {
        self.student_number
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.id.to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudentDetail {
    pub id: i64,
    pub student_number: Option<String>,
    pub school_number: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub parent_phone: Option<String>,
    pub status: Option<String>,
    pub blacklist_reason: Option<String>,
    pub group_id: Option<i64>,
    pub tariff_id: Option<i64>,
    pub tariff_price: Option<f64>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub birth_year: Option<i32>,
    pub passport_series: Option<String>,
    pub passport_number: Option<String>,
    pub passport_issued_by: Option<String>,
    pub passport_issue_date: Option<String>,
    pub passport_expiry_date: Option<String>,
    pub admission_date: Option<String>,
    pub club_funded: Option<bool>,
    pub photo_path: Option<String>,
}

impl StudentDetail {
    pub fn tariff_price_or_default(&self) -> f64 {
        self.tariff_price
            .filter(|p| *p > 0.0)
            .unwrap_or(DEFAULT_TARIFF_PRICE)
    }
}

pub fn status_label(status: &str) -> &'static str {
    match status {
        "active" => "Active",
        "inactive" => "Inactive",
        "blacklist" => "Blacklist",
        _ => "Unknown",
    }
}

// ---------------------------------------------------------------- rewards

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Reward {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub points: i64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RewardIssuance {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub reward_name: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub issued_at: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub issuer_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IssueReward {
    pub reward_type_id: i64,
}

// ---------------------------------------------------------------- settings

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClubSettings {
    pub system_name: String,
    pub working_days: Vec<u8>,
    pub work_start_time: String,
    pub work_end_time: String,
    pub max_groups_per_slot: u32,
    pub block_future_payments: bool,
    pub rewards_reset_period_months: u32,
    pub podium_display_count: u32,
}

impl Default for ClubSettings {
    fn default() -> Self {
        Self {
            system_name: String::new(),
            working_days: Vec::new(),
            work_start_time: "09:00".to_string(),
            work_end_time: "21:00".to_string(),
            max_groups_per_slot: 1,
            block_future_payments: false,
            rewards_reset_period_months: 1,
            podium_display_count: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AdminCredentials {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CredentialsUpdate {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_payments_tolerate_nulls() {
        let raw = r#"{
            "payments_by_month": {
                "2024-03": {
                    "payments": [
                        {"id": 7, "date": "2024-03-02T10:00:00", "amount": 200000.0, "notes": null}
                    ],
                    "total_paid": 200000.0,
                    "tariff_price": 500000.0,
                    "remainder": 300000.0
                }
            },
            "tariff_price": 500000.0
        }"#;
        let parsed: MonthlyPayments = serde_json::from_str(raw).unwrap();
        let march = &parsed.payments_by_month["2024-03"];
        assert_eq!(march.remainder, 300_000.0);
        assert_eq!(march.payments[0].id, Some(7));
        assert_eq!(march.payments[0].notes, None);
    }

    #[test]
    fn income_rows_without_ids_still_parse() {
        let raw = r#"{"today": null, "month": 10, "total": 20, "payments": [
            {"payment_date": "2024-03-02T10:00:00", "student_name": null, "group_id": 3,
             "group_name": "U-10", "tariff_name": null, "amount_paid": 100.0,
             "amount_due": null, "is_full_payment": false, "notes": ""}
        ]}"#;
        let parsed: IncomeSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.today, 0.0);
        assert_eq!(parsed.payments[0].id, None);
        assert_eq!(parsed.payments[0].student_name, "");
        assert_eq!(parsed.payments[0].amount_due, 0.0);
    }

    #[test]
    fn payment_update_bodies() {
        let correction = PaymentUpdate::Correction {
            amount_paid: 100.0,
            payment_date: "2024-03-02".into(),
            notes: "cash".into(),
        };
        assert_eq!(
            serde_json::to_value(&correction).unwrap(),
            serde_json::json!({"amount_paid": 100.0, "payment_date": "2024-03-02", "notes": "cash"})
        );

        let income = PaymentUpdate::Income {
            student_id: 4,
            amount: 50.0,
            notes: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&income).unwrap(),
            serde_json::json!({"student_id": 4, "amount": 50.0, "notes": ""})
        );
    }

    #[test]
    fn missing_tariff_falls_back_to_default_price() {
        let detail = StudentDetail::default();
        assert_eq!(detail.tariff_price_or_default(), DEFAULT_TARIFF_PRICE);

        let detail = StudentDetail {
            tariff_price: Some(350_000.0),
            ..StudentDetail::default()
        };
        assert_eq!(detail.tariff_price_or_default(), 350_000.0);
    }

    #[test]
    fn server_message_wins_over_fallback() {
        let rejected: ApiResponse =
            serde_json::from_str(r#"{"success": false, "message": "Access denied"}"#).unwrap();
        assert_eq!(rejected.message_or("failed"), "Access denied");

        let bare: ApiResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(bare.message_or("failed"), "failed");
    }
}
