use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// The fixed set of support requests an operator can file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestType {
    ModifyMobileNumber,
    ResetPassword,
    OrganiserUpdateDetail,
}

pub const ALL_REQUEST_TYPES: [RequestType; 3] = [
    RequestType::ModifyMobileNumber,
    RequestType::ResetPassword,
    RequestType::OrganiserUpdateDetail,
];

impl RequestType {
    /// Wire name understood by the support service.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ModifyMobileNumber => "modify-mobile-number",
            Self::ResetPassword => "reset-password",
            Self::OrganiserUpdateDetail => "organiser-update-detail",
        }
    }

    /// Label shown in the request form's type selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::ModifyMobileNumber => "modify mobile number",
            Self::ResetPassword => "reset password",
            Self::OrganiserUpdateDetail => "organiser update detail",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = anyhow::Error;

    /// Accepts both the wire name and the form label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(' ', "-");
        ALL_REQUEST_TYPES
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| anyhow::anyhow!("unknown request type: {}", s.trim()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => anyhow::bail!("unknown priority: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Open,
    Closed,
}

impl RequestStatus {
    /// The status a toggle moves to.
    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// An old/new pair for one organiser detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub old: String,
    pub new: String,
}

/// Type-specific payload. The variant is the request type, so exactly one
/// field group is ever populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPayload {
    ModifyMobile {
        old_mobile: String,
        new_mobile: String,
    },
    ResetPassword {
        old_password: String,
        new_password: String,
    },
    OrganiserUpdate {
        name: Option<FieldChange>,
        email: Option<FieldChange>,
        mobile: Option<FieldChange>,
    },
}

impl RequestPayload {
    pub fn request_type(&self) -> RequestType {
        match self {
            Self::ModifyMobile { .. } => RequestType::ModifyMobileNumber,
            Self::ResetPassword { .. } => RequestType::ResetPassword,
            Self::OrganiserUpdate { .. } => RequestType::OrganiserUpdateDetail,
        }
    }
}

/// A request that passed validation and is ready to be filed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub description: String,
    pub priority: Priority,
    pub payload: RequestPayload,
}

impl NewRequest {
    pub fn request_type(&self) -> RequestType {
        self.payload.request_type()
    }
}

/// Raw operator input from the request form. Every field is optional text;
/// `validation::validate_form` turns it into a [`NewRequest`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestForm {
    pub request_type: String,
    pub description: String,
    pub priority: Option<String>,
    pub old_mobile: String,
    pub new_mobile: String,
    pub old_password: String,
    pub new_password: String,
    pub old_name: String,
    pub new_name: String,
    pub old_email: String,
    pub new_email: String,
    pub old_organiser_mobile: String,
    pub new_organiser_mobile: String,
}

// ---------------------------------------------------------------------------
// Filed requests
// ---------------------------------------------------------------------------

/// A filed request as listed by the support service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct SupportRequest {
    pub reference_id: String,
    #[serde(default)]
    pub customer_id: String,
    pub request_type: RequestType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub status: RequestStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub details: RequestDetails,
}

/// Type-specific fields echoed back in listings. Passwords are never listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct RequestDetails {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub old_mobile: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub new_mobile: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub old_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub new_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub old_email: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub new_email: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub old_organiser_mobile: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub new_organiser_mobile: Option<String>,
}

#[allow(clippy::ref_option)] // signature fixed by serde's skip_serializing_if
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
