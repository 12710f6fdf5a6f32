use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, SupportBackend};
use crate::customer::{CustomerRecord, UserType};
use crate::error::ApiError;
use crate::validation;

pub const MIN_MOBILE_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    Mobile,
    Email,
}

impl VerificationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile" => Ok(Self::Mobile),
            "email" => Ok(Self::Email),
            other => anyhow::bail!("unknown verification method: {other}"),
        }
    }
}

/// A lookup that passed the local pre-checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyQuery {
    pub user_type: UserType,
    pub method: VerificationMethod,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// Rejected locally; nothing was sent.
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    NotFound(String),

    /// The lookup could not be completed; retrying may succeed.
    #[error("{0}")]
    Transient(String),

    /// The service answered with something unusable. Retrying will not help.
    #[error("{0}")]
    Failed(String),
}

impl From<VerifyError> for ApiError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Invalid(msg) => Self::BadRequest(msg),
            VerifyError::NotFound(msg) => Self::NotFound(msg),
            VerifyError::Transient(msg) => Self::ServiceUnavailable(msg),
            VerifyError::Failed(msg) => Self::BadGateway(msg),
        }
    }
}

/// Check the identifier's shape before any network call.
pub fn precheck(
    user_type: UserType,
    method: VerificationMethod,
    identifier: &str,
) -> Result<VerifyQuery, VerifyError> {
    let identifier = identifier.trim();
    match method {
        VerificationMethod::Mobile => {
            if identifier.len() < MIN_MOBILE_DIGITS
                || !identifier.chars().all(|c| c.is_ascii_digit())
            {
                return Err(VerifyError::Invalid(format!(
                    "mobile number must be at least {MIN_MOBILE_DIGITS} digits"
                )));
            }
        }
        VerificationMethod::Email => {
            if !validation::is_valid_email(identifier) {
                return Err(VerifyError::Invalid("enter a valid email address".into()));
            }
        }
    }
    Ok(VerifyQuery {
        user_type,
        method,
        identifier: identifier.to_owned(),
    })
}

/// Resolve an identifier to a customer record.
///
/// Read-only: nothing is stored beyond the returned record.
pub async fn verify<B: SupportBackend>(
    backend: &B,
    user_type: UserType,
    method: VerificationMethod,
    identifier: &str,
) -> Result<CustomerRecord, VerifyError> {
    let query = precheck(user_type, method, identifier)?;
    match backend.verify_user(&query).await {
        Ok(record) => {
            tracing::info!(customer_id = %record.id, %user_type, "customer verified");
            Ok(record)
        }
        Err(BackendError::NotFound(msg)) => Err(VerifyError::NotFound(msg)),
        Err(err) if err.is_transient() => {
            tracing::warn!(error = %err, %user_type, %method, "verification lookup failed");
            Err(VerifyError::Transient(
                "verification failed, please try again".into(),
            ))
        }
        Err(err) => {
            tracing::error!(error = %err, %user_type, %method, "verification response unusable");
            Err(VerifyError::Failed(err.to_string()))
        }
    }
}
