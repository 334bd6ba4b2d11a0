use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::common::YesNo;
use crate::letter::LetterCategory;

// ---------------------------------------------------------------------------
// Evidence documents
// ---------------------------------------------------------------------------

/// Which party submitted a piece of further evidence. Stored as camelCase
/// text on the case record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EvidenceCategory {
    AppellantEvidence,
    RepresentativeEvidence,
    JointPartyEvidence,
    OtherPartyEvidence,
    OtherPartyRepresentativeEvidence,
    DepartmentEvidence,
}

impl EvidenceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceCategory::AppellantEvidence => "appellantEvidence",
            EvidenceCategory::RepresentativeEvidence => "representativeEvidence",
            EvidenceCategory::JointPartyEvidence => "jointPartyEvidence",
            EvidenceCategory::OtherPartyEvidence => "otherPartyEvidence",
            EvidenceCategory::OtherPartyRepresentativeEvidence => {
                "otherPartyRepresentativeEvidence"
            }
            EvidenceCategory::DepartmentEvidence => "departmentEvidence",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "appellantEvidence" => Some(EvidenceCategory::AppellantEvidence),
            "representativeEvidence" => Some(EvidenceCategory::RepresentativeEvidence),
            "jointPartyEvidence" => Some(EvidenceCategory::JointPartyEvidence),
            "otherPartyEvidence" => Some(EvidenceCategory::OtherPartyEvidence),
            "otherPartyRepresentativeEvidence" => {
                Some(EvidenceCategory::OtherPartyRepresentativeEvidence)
            }
            "departmentEvidence" => Some(EvidenceCategory::DepartmentEvidence),
            _ => None,
        }
    }

    /// The letter category of the party that submitted this evidence —
    /// the "original sender" for template selection.
    pub fn sender_category(&self) -> LetterCategory {
        match self {
            EvidenceCategory::AppellantEvidence => LetterCategory::Appellant,
            EvidenceCategory::RepresentativeEvidence => LetterCategory::Representative,
            EvidenceCategory::JointPartyEvidence => LetterCategory::JointParty,
            EvidenceCategory::OtherPartyEvidence => LetterCategory::OtherParty,
            EvidenceCategory::OtherPartyRepresentativeEvidence => {
                LetterCategory::OtherPartyRepresentative
            }
            EvidenceCategory::DepartmentEvidence => LetterCategory::Department,
        }
    }

    /// All categories, in the order further-evidence batches are processed.
    pub fn all() -> &'static [EvidenceCategory] {
        &[
            EvidenceCategory::AppellantEvidence,
            EvidenceCategory::RepresentativeEvidence,
            EvidenceCategory::JointPartyEvidence,
            EvidenceCategory::OtherPartyEvidence,
            EvidenceCategory::OtherPartyRepresentativeEvidence,
            EvidenceCategory::DepartmentEvidence,
        ]
    }
}

/// Reference to a stored document binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DocumentLink {
    pub url: String,
    pub filename: String,
}

/// One evidence document on the case, with its category tag and issued flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseDocument {
    pub category: EvidenceCategory,
    pub link: DocumentLink,
    /// "Yes" once the document has been copied to the other parties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<YesNo>,
    /// For other-party evidence: the entity id of the submitting party.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_other_party_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_date: Option<NaiveDate>,
}

impl CaseDocument {
    pub fn is_issued(&self) -> bool {
        YesNo::flag_set(&self.issued)
    }
}

// ---------------------------------------------------------------------------
// Diverted correspondence
// ---------------------------------------------------------------------------

/// A document stored against the case record instead of being printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StoredDocument {
    pub filename: String,
    pub content_base64: String,
}

/// A bundle diverted for manual handling (reasonable adjustment), persisted
/// as a correspondence entry on the case record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CorrespondenceEntry {
    /// Label of the party whose evidence triggered the letter.
    pub sender: String,
    pub created_at: DateTime<Utc>,
    pub documents: Vec<StoredDocument>,
}
