use std::sync::LazyLock;

use regex::Regex;

use crate::requests::{FieldChange, NewRequest, Priority, RequestForm, RequestPayload, RequestType};

pub const MIN_PASSWORD_LEN: usize = 6;

// ASCII class on purpose: `\d` would also accept non-Latin digits.
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("mobile pattern compiles"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Reason a request form was rejected before submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown request type: {0}")]
    UnknownRequestType(String),

    #[error("description is required")]
    MissingDescription,

    #[error("priority must be one of low, medium, high (got {0})")]
    InvalidPriority(String),

    #[error("{field} must be exactly 10 digits")]
    InvalidMobile { field: &'static str },

    #[error("old and new password are required")]
    MissingPassword,

    #[error("new password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("new password must differ from the old password")]
    PasswordUnchanged,

    #[error("at least one of name, email, or mobile needs both old and new values")]
    NoOrganiserChanges,

    #[error("{field} must be a valid email address")]
    InvalidEmail { field: &'static str },

    #[error("no customer selected")]
    MissingCustomer,
}

pub fn is_valid_mobile(value: &str) -> bool {
    MOBILE_RE.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn check_customer_id(customer_id: &str) -> Result<(), ValidationError> {
    if customer_id.trim().is_empty() {
        return Err(ValidationError::MissingCustomer);
    }
    Ok(())
}

pub fn check_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    Ok(())
}

fn check_mobile(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !is_valid_mobile(value) {
        return Err(ValidationError::InvalidMobile { field });
    }
    Ok(())
}

fn check_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !is_valid_email(value) {
        return Err(ValidationError::InvalidEmail { field });
    }
    Ok(())
}

fn parse_priority(raw: Option<&str>) -> Result<Priority, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Priority::default()),
        Some(value) => value
            .parse()
            .map_err(|_| ValidationError::InvalidPriority(value.to_owned())),
    }
}

/// A pair counts only when both sides are filled in; half-filled pairs are
/// dropped rather than rejected.
fn field_pair(old: &str, new: &str) -> Option<FieldChange> {
    let (old, new) = (old.trim(), new.trim());
    if old.is_empty() || new.is_empty() {
        return None;
    }
    Some(FieldChange {
        old: old.to_owned(),
        new: new.to_owned(),
    })
}

/// Parse the form's request type, then validate it as that type.
pub fn validate_form(form: &RequestForm) -> Result<NewRequest, ValidationError> {
    let request_type: RequestType = form
        .request_type
        .parse()
        .map_err(|_| ValidationError::UnknownRequestType(form.request_type.trim().to_owned()))?;
    validate(request_type, form)
}

/// Check a form against the rules for `request_type`, in order, stopping at
/// the first failure. Fields belonging to other request types are ignored.
pub fn validate(request_type: RequestType, form: &RequestForm) -> Result<NewRequest, ValidationError> {
    check_description(&form.description)?;
    let priority = parse_priority(form.priority.as_deref())?;

    let payload = match request_type {
        RequestType::ModifyMobileNumber => {
            let old_mobile = form.old_mobile.trim();
            let new_mobile = form.new_mobile.trim();
            check_mobile("old mobile number", old_mobile)?;
            check_mobile("new mobile number", new_mobile)?;
            RequestPayload::ModifyMobile {
                old_mobile: old_mobile.to_owned(),
                new_mobile: new_mobile.to_owned(),
            }
        }
        RequestType::ResetPassword => {
            if form.old_password.is_empty() || form.new_password.is_empty() {
                return Err(ValidationError::MissingPassword);
            }
            if form.new_password.chars().count() < MIN_PASSWORD_LEN {
                return Err(ValidationError::PasswordTooShort);
            }
            if form.new_password == form.old_password {
                return Err(ValidationError::PasswordUnchanged);
            }
            RequestPayload::ResetPassword {
                old_password: form.old_password.clone(),
                new_password: form.new_password.clone(),
            }
        }
        RequestType::OrganiserUpdateDetail => {
            let name = field_pair(&form.old_name, &form.new_name);
            let email = field_pair(&form.old_email, &form.new_email);
            let mobile = field_pair(&form.old_organiser_mobile, &form.new_organiser_mobile);

            if name.is_none() && email.is_none() && mobile.is_none() {
                return Err(ValidationError::NoOrganiserChanges);
            }
            if let Some(pair) = &email {
                check_email("old email", &pair.old)?;
                check_email("new email", &pair.new)?;
            }
            if let Some(pair) = &mobile {
                check_mobile("old organiser mobile", &pair.old)?;
                check_mobile("new organiser mobile", &pair.new)?;
            }
            RequestPayload::OrganiserUpdate {
                name,
                email,
                mobile,
            }
        }
    };

    Ok(NewRequest {
        description: form.description.trim().to_owned(),
        priority,
        payload,
    })
}
