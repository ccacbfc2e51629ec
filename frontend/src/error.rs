use thiserror::Error;

use crate::format::Sum;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not read the server response: {0}")]
    Decode(String),
    /// The backend answered `success: false`; the message is shown verbatim.
    #[error("{0}")]
    Rejected(String),
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(err) => ApiError::Decode(err.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

/// Client-side rule failures. Nothing is sent when one of these is raised.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingFields,
    #[error("Choose a month to pay for")]
    NoMonthSelected,
    #[error("Enter a valid payment amount")]
    InvalidAmount,
    #[error("Amount exceeds the tariff remainder. At most {max} is allowed")]
    ExceedsRemainder { max: Sum },
    #[error("Payment date cannot be in the future")]
    FutureDate,
    #[error("Payment date cannot be more than {0} days ago")]
    DateTooOld(i64),
    #[error("The student was admitted after the selected year")]
    AdmittedLater,
    #[error("No months available for payment")]
    NoOpenMonths,
    #[error("{0}")]
    Rule(&'static str),
}
