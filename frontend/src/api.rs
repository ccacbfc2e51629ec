//! Typed calls against the club backend. Every request carries the session
//! cookie; failures come back as [`ApiError`].

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::{FormData, RequestCredentials};

use crate::config::{api_base_url, BrowserStorage};
use crate::error::ApiError;
use crate::models::{
    AdminCredentials, AnalyticsReport, ApiResponse, ClubSettings, CredentialsUpdate,
    DebtorsReport, ExpenseDraft, ExpenseSummary, Group, IncomeSummary, IssueReward,
    MonthlyPaymentRequest, MonthlyPayments, PaymentUpdate, Reward, RewardIssuance, StudentDetail,
    StudentSummary, Tariff,
};

fn url(path: &str) -> String {
    format!("{}{}", api_base_url(&BrowserStorage), path)
}

fn with_session(builder: RequestBuilder) -> RequestBuilder {
    builder.credentials(RequestCredentials::Include)
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    if !resp.ok() {
        let status = resp.status();
        let fallback = resp.status_text();
        let message = match resp.json::<ApiResponse>().await {
            Ok(body) => body.message_or(&fallback),
            Err(_) => fallback,
        };
        return Err(ApiError::Status { status, message });
    }
    Ok(resp.json::<T>().await?)
}

/// Reads a `{success, message}` body. `success: false` becomes
/// [`ApiError::Rejected`] with the server's text, whatever the HTTP status.
async fn read_outcome(resp: Response) -> Result<ApiResponse, ApiError> {
    let ok = resp.ok();
    let status = resp.status();
    let status_text = resp.status_text();
    match resp.json::<ApiResponse>().await {
        Ok(body) if body.success => Ok(body),
        Ok(body) => Err(ApiError::Rejected(body.message_or("Operation failed"))),
        Err(_) if !ok => Err(ApiError::Status {
            status,
            message: status_text,
        }),
        Err(err) => Err(err.into()),
    }
}

async fn get<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    log::debug!("GET {}", path);
    let resp = with_session(Request::get(&url(path))).send().await?;
    read_json(resp).await
}

async fn send_json<B: Serialize>(builder: RequestBuilder, body: &B) -> Result<ApiResponse, ApiError> {
    let resp = with_session(builder).json(body)?.send().await?;
    read_outcome(resp).await
}

async fn send_form(builder: RequestBuilder, form: FormData) -> Result<ApiResponse, ApiError> {
    let resp = with_session(builder).body(form)?.send().await?;
    read_outcome(resp).await
}

async fn delete(path: &str) -> Result<ApiResponse, ApiError> {
    log::debug!("DELETE {}", path);
    let resp = with_session(Request::delete(&url(path))).send().await?;
    read_outcome(resp).await
}

// ---------------------------------------------------------------- finances

pub async fn fetch_income() -> Result<IncomeSummary, ApiError> {
    get("/api/finances/income").await
}

pub async fn fetch_expenses() -> Result<ExpenseSummary, ApiError> {
    get("/api/finances/expenses").await
}

pub async fn fetch_debtors() -> Result<DebtorsReport, ApiError> {
    get("/api/finances/debtors").await
}

pub async fn fetch_analytics() -> Result<AnalyticsReport, ApiError> {
    get("/api/finances/analytics").await
}

pub async fn add_expense(draft: &ExpenseDraft) -> Result<ApiResponse, ApiError> {
    send_json(Request::post(&url("/api/expenses/add")), draft).await
}

pub async fn update_expense(id: i64, draft: &ExpenseDraft) -> Result<ApiResponse, ApiError> {
    send_json(Request::put(&url(&format!("/api/expenses/{}", id))), draft).await
}

pub async fn delete_expense(id: i64) -> Result<ApiResponse, ApiError> {
    delete(&format!("/api/expenses/{}", id)).await
}

// ---------------------------------------------------------------- payments

pub async fn fetch_monthly_payments(student_id: i64) -> Result<MonthlyPayments, ApiError> {
    get(&format!("/api/students/{}/monthly-payments", student_id)).await
}

pub async fn add_monthly_payment(request: &MonthlyPaymentRequest) -> Result<ApiResponse, ApiError> {
    log::info!(
        "recording payment for student {} ({}-{:02})",
        request.student_id,
        request.year,
        request.month
    );
    send_json(
        Request::post(&url("/api/students/add-monthly-payment")),
        request,
    )
    .await
}

pub async fn update_payment(id: i64, update: &PaymentUpdate) -> Result<ApiResponse, ApiError> {
    send_json(
        Request::put(&url(&format!("/api/payments/{}/update", id))),
        update,
    )
    .await
}

pub async fn delete_payment(id: i64) -> Result<ApiResponse, ApiError> {
    delete(&format!("/api/payments/{}/delete", id)).await
}

// ---------------------------------------------------------------- students

pub async fn fetch_groups() -> Result<Vec<Group>, ApiError> {
    get("/api/groups").await
}

pub async fn fetch_tariffs() -> Result<Vec<Tariff>, ApiError> {
    get("/api/tariffs").await
}

pub async fn fetch_students() -> Result<Vec<StudentSummary>, ApiError> {
    get("/api/students").await
}

pub async fn fetch_student(id: i64) -> Result<StudentDetail, ApiError> {
    get(&format!("/api/students/{}", id)).await
}

pub async fn fetch_cities() -> Result<Vec<String>, ApiError> {
    get("/api/locations/cities").await
}

pub async fn fetch_districts(city: &str) -> Result<Vec<String>, ApiError> {
    let city = String::from(js_sys::encode_uri_component(city));
    get(&format!("/api/locations/districts/{}", city)).await
}

pub async fn add_student(form: FormData) -> Result<ApiResponse, ApiError> {
    send_form(Request::post(&url("/api/students/add")), form).await
}

pub async fn update_student(id: i64, form: FormData) -> Result<ApiResponse, ApiError> {
    send_form(Request::put(&url(&format!("/api/students/{}", id))), form).await
}

pub async fn delete_student(id: i64) -> Result<ApiResponse, ApiError> {
    delete(&format!("/api/students/{}", id)).await
}

// ---------------------------------------------------------------- rewards

pub async fn fetch_rewards() -> Result<Vec<Reward>, ApiError> {
    get("/api/rewards").await
}

pub async fn issue_reward(student_id: i64, reward: &IssueReward) -> Result<ApiResponse, ApiError> {
    send_json(
        Request::post(&url(&format!("/api/students/{}/rewards", student_id))),
        reward,
    )
    .await
}

pub async fn fetch_reward_history(student_id: i64) -> Result<Vec<RewardIssuance>, ApiError> {
    get(&format!("/api/students/{}/rewards", student_id)).await
}

// ---------------------------------------------------------------- settings

pub async fn fetch_club_settings() -> Result<ClubSettings, ApiError> {
    get("/api/club-settings").await
}

pub async fn save_club_settings(settings: &ClubSettings) -> Result<ApiResponse, ApiError> {
    send_json(Request::put(&url("/api/club-settings")), settings).await
}

/// The backend answers non-admins with `success: false`; that surfaces as
/// [`ApiError::Rejected`] or [`ApiError::Status`].
pub async fn fetch_admin_credentials() -> Result<AdminCredentials, ApiError> {
    let creds: AdminCredentials = get("/api/admin-credentials").await?;
    if creds.success {
        Ok(creds)
    } else {
        Err(ApiError::Rejected(
            creds
                .message
                .unwrap_or_else(|| "Access denied".to_string()),
        ))
    }
}

pub async fn save_admin_credentials(update: &CredentialsUpdate) -> Result<ApiResponse, ApiError> {
    send_json(Request::put(&url("/api/admin-credentials")), update).await
}
