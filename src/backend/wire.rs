//! JSON shapes exchanged with the support service.
//!
//! The service wraps every payload in `{success, data, message}` and uses
//! camelCase field names.

use serde::{Deserialize, Serialize};

use crate::customer::{
    CustomerRecord, OrganisationDetails, StudentDetails, UserType, resolve_canonical_id,
};
use crate::gateway::{VerificationMethod, VerifyQuery};
use crate::requests::{FieldChange, NewRequest, RequestPayload, RequestStatus, SupportRequest};

use super::error::BackendError;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Best-effort extraction of a human message from an error body that may not
/// be JSON at all.
pub fn server_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty())
}

/// First `limit` characters of a raw body, for diagnostics.
pub fn excerpt(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyUserBody<'a> {
    pub user_type: UserType,
    pub verification_method: VerificationMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

impl<'a> From<&'a VerifyQuery> for VerifyUserBody<'a> {
    fn from(query: &'a VerifyQuery) -> Self {
        let identifier = query.identifier.as_str();
        let (mobile, email) = match query.method {
            VerificationMethod::Mobile => (Some(identifier), None),
            VerificationMethod::Email => (None, Some(identifier)),
        };
        Self {
            user_type: query.user_type,
            verification_method: query.method,
            mobile,
            email,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifiedCustomer {
    pub organisation_id: Option<String>,
    pub user_id: Option<String>,
    #[serde(rename = "_id")]
    pub storage_id: Option<String>,
    pub name: Option<String>,
    pub user_type: Option<UserType>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub additional_details: Option<StudentDetails>,
    pub address: Option<String>,
    pub director: Option<String>,
    pub is_verified: bool,
    pub is_email_verified: bool,
    pub is_mobile_verified: bool,
}

impl VerifiedCustomer {
    /// Resolve the canonical key once and build the record every later call
    /// is addressed by.
    pub fn into_record(self, requested: UserType) -> Result<CustomerRecord, BackendError> {
        let user_type = self.user_type.unwrap_or(requested);
        let id = resolve_canonical_id(
            user_type,
            self.organisation_id.as_deref(),
            self.user_id.as_deref(),
            self.storage_id.as_deref(),
        )
        .ok_or_else(|| BackendError::Malformed("verification response has no customer id".into()))?;

        let organisation = user_type.is_organisation().then(|| OrganisationDetails {
            address: self.address,
            director: self.director,
            is_verified: self.is_verified,
            is_email_verified: self.is_email_verified,
            is_mobile_verified: self.is_mobile_verified,
        });
        let additional_details = if user_type.is_organisation() {
            None
        } else {
            self.additional_details
        };

        Ok(CustomerRecord {
            id,
            name: self.name.unwrap_or_default(),
            user_type,
            email: self.email,
            mobile: self.mobile,
            additional_details,
            organisation,
        })
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RequestList {
    #[serde(default)]
    pub requests: Vec<SupportRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    pub reference_id: String,
}

#[derive(Debug, Deserialize)]
pub struct Toggled {
    pub status: RequestStatus,
}

/// Body for `POST /customer-requests/create/{id}`. The service expects every
/// field of every request type, with unused ones sent as empty strings.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub request_type: String,
    pub description: String,
    pub priority: String,
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

fn split(change: Option<&FieldChange>) -> (String, String) {
    change.map_or_else(Default::default, |c| (c.old.clone(), c.new.clone()))
}

impl From<&NewRequest> for CreateRequestBody {
    fn from(request: &NewRequest) -> Self {
        let mut body = Self {
            request_type: request.request_type().as_str().to_owned(),
            description: request.description.clone(),
            priority: request.priority.as_str().to_owned(),
            ..Self::default()
        };
        match &request.payload {
            RequestPayload::ModifyMobile {
                old_mobile,
                new_mobile,
            } => {
                body.old_mobile.clone_from(old_mobile);
                body.new_mobile.clone_from(new_mobile);
            }
            RequestPayload::ResetPassword {
                old_password,
                new_password,
            } => {
                body.old_password.clone_from(old_password);
                body.new_password.clone_from(new_password);
            }
            RequestPayload::OrganiserUpdate {
                name,
                email,
                mobile,
            } => {
                (body.old_name, body.new_name) = split(name.as_ref());
                (body.old_email, body.new_email) = split(email.as_ref());
                (body.old_organiser_mobile, body.new_organiser_mobile) = split(mobile.as_ref());
            }
        }
        body
    }
}
