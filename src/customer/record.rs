use serde::{Deserialize, Serialize};

use super::user_type::UserType;

/// Identity resolved by verification. Never mutated; a new verification
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Canonical customer key used for every later call.
    pub id: String,
    pub name: String,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<StudentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation: Option<OrganisationDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentDetails {
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    /// Sent as either a number or a label depending on the record's age.
    #[serde(default)]
    pub year: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganisationDetails {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub is_mobile_verified: bool,
}

/// Pick the canonical key from the candidate id fields of a verification
/// response.
///
/// Organisations prefer `organisationId`, users prefer `userId`, both fall back
/// to the storage id. Candidates that disagree with the chosen key are a
/// data-quality defect upstream; they are logged and ignored.
pub fn resolve_canonical_id(
    user_type: UserType,
    organisation_id: Option<&str>,
    user_id: Option<&str>,
    storage_id: Option<&str>,
) -> Option<String> {
    fn clean(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|v| !v.is_empty())
    }

    let organisation_id = clean(organisation_id);
    let user_id = clean(user_id);
    let storage_id = clean(storage_id);

    let preferred = match user_type {
        UserType::Organisation => [organisation_id, user_id, storage_id],
        UserType::User => [user_id, organisation_id, storage_id],
    };
    let chosen = preferred.iter().flatten().next().copied()?;

    let divergent: Vec<&str> = preferred
        .iter()
        .flatten()
        .copied()
        .filter(|candidate| *candidate != chosen)
        .collect();
    if !divergent.is_empty() {
        tracing::warn!(
            %user_type,
            chosen,
            ?divergent,
            "verification response carries conflicting customer ids"
        );
    }

    Some(chosen.to_owned())
}
