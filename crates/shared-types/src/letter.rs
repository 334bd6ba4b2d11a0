use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Letter categories and destinations
// ---------------------------------------------------------------------------

/// The addressing role a letter is produced for. Drives both recipient
/// resolution and cover-letter template choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum LetterCategory {
    Appellant,
    Representative,
    JointParty,
    OtherParty,
    OtherPartyRepresentative,
    Department,
}

impl LetterCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterCategory::Appellant => "appellant",
            LetterCategory::Representative => "representative",
            LetterCategory::JointParty => "jointParty",
            LetterCategory::OtherParty => "otherParty",
            LetterCategory::OtherPartyRepresentative => "otherPartyRepresentative",
            LetterCategory::Department => "department",
        }
    }

    /// Human-readable label used in sender tags and update descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            LetterCategory::Appellant => "Appellant",
            LetterCategory::Representative => "Representative",
            LetterCategory::JointParty => "Joint party",
            LetterCategory::OtherParty => "Other party",
            LetterCategory::OtherPartyRepresentative => "Other party representative",
            LetterCategory::Department => "Department",
        }
    }
}

/// One element of the ordered allowed-recipient list for a distribution
/// call. Other-party categories carry the entity id to address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LetterDestination {
    pub category: LetterCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_party_id: Option<String>,
}

impl LetterDestination {
    pub fn appellant() -> Self {
        Self { category: LetterCategory::Appellant, other_party_id: None }
    }

    pub fn representative() -> Self {
        Self { category: LetterCategory::Representative, other_party_id: None }
    }

    pub fn joint_party() -> Self {
        Self { category: LetterCategory::JointParty, other_party_id: None }
    }

    pub fn other_party(id: impl Into<String>) -> Self {
        Self {
            category: LetterCategory::OtherParty,
            other_party_id: Some(id.into()),
        }
    }

    pub fn other_party_representative(id: impl Into<String>) -> Self {
        Self {
            category: LetterCategory::OtherPartyRepresentative,
            other_party_id: Some(id.into()),
        }
    }

    pub fn department() -> Self {
        Self { category: LetterCategory::Department, other_party_id: None }
    }
}

// ---------------------------------------------------------------------------
// Print bundles and outcomes
// ---------------------------------------------------------------------------

/// One document within a print bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct BundlePart {
    pub filename: String,
    pub content: Vec<u8>,
}

/// An ordered set of PDFs submitted to the print channel as one job.
/// Invariant: a generated cover letter, when present, is always first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentBundle {
    parts: Vec<BundlePart>,
}

impl DocumentBundle {
    /// Start a bundle with its cover letter in first position.
    pub fn with_cover_letter(content: Vec<u8>, filename: impl Into<String>) -> Self {
        let mut bundle = Self::default();
        bundle.parts.push(BundlePart { filename: filename.into(), content });
        bundle
    }

    /// Append an evidence document after the cover letter.
    pub fn push(&mut self, content: Vec<u8>, filename: impl Into<String>) {
        self.parts.push(BundlePart { filename: filename.into(), content });
    }

    pub fn parts(&self) -> &[BundlePart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Per-recipient result of a print submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome {
    /// Accepted by the print channel; the id is used for logging only.
    Submitted(Uuid),
    /// Stored against the case record for manual handling instead.
    Diverted,
}

impl PrintOutcome {
    pub fn is_diverted(&self) -> bool {
        matches!(self, PrintOutcome::Diverted)
    }
}
