use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Yes/No flags
// ---------------------------------------------------------------------------

/// Tri-state flag as stored on the case record: present-"Yes", present-"No",
/// or absent entirely. Absent is treated as "No" everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, YesNo::Yes)
    }

    /// `true` only for an explicit "Yes"; `None` counts as "No".
    pub fn flag_set(flag: &Option<YesNo>) -> bool {
        matches!(flag, Some(YesNo::Yes))
    }
}

impl TryFrom<&str> for YesNo {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Yes" => Ok(YesNo::Yes),
            "No" => Ok(YesNo::No),
            _ => Err(format!("Invalid yes/no value '{}'", value)),
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Names and addresses
// ---------------------------------------------------------------------------

/// A person's name as held on the case record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PersonName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

impl PersonName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            title: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last" — titles are not printed on envelopes or cover letters.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Postal address (nested in the case record and in letters).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Address {
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub town: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    pub postcode: String,
}

impl Address {
    /// Explicit empty-address sentinel. Letters addressed to it are a known
    /// degraded case (e.g. a representative flagged present without contact
    /// details) and are logged as warnings, never treated as errors.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.line1.is_empty() && self.town.is_empty() && self.postcode.is_empty()
    }

    /// Non-empty address lines, top to bottom, as printed on a letter.
    pub fn lines(&self) -> Vec<&str> {
        [
            Some(self.line1.as_str()),
            self.line2.as_deref(),
            Some(self.town.as_str()),
            self.county.as_deref(),
            Some(self.postcode.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|l| !l.is_empty())
        .collect()
    }
}

/// A resolved letter recipient: display name plus mailing address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Recipient {
    pub name: String,
    pub address: Address,
}
