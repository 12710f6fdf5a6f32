use std::fmt;
use std::str::FromStr;

/// Discriminator for the account being served. Decides which canonical key
/// the verification response is addressed by and which profile fields apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    User,
    #[serde(alias = "organization")]
    Organisation,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organisation => "organisation",
        }
    }

    /// Whether the account carries organiser profile fields.
    pub fn is_organisation(self) -> bool {
        matches!(self, Self::Organisation)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "organisation" | "organization" => Ok(Self::Organisation),
            other => anyhow::bail!("unknown user type: {other}"),
        }
    }
}
