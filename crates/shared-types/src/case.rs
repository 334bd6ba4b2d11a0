use serde::{Deserialize, Serialize};

use crate::common::YesNo;
use crate::document::CaseDocument;
use crate::letter::LetterCategory;
use crate::party::{Appellant, JointParty, OtherParty, Representative};

// ---------------------------------------------------------------------------
// Well-known record values
// ---------------------------------------------------------------------------

/// Benefit code whose appeals can gain a joint party.
pub const CHILD_SUPPORT_BENEFIT_CODE: &str = "childSupport";

/// Creation route for appeals lodged directly with the tribunal, which the
/// department has not yet seen.
pub const DIRECT_LODGEMENT_ROUTE: &str = "directLodgement";

/// Service identifier under which routing metadata is patched into the case
/// record's supplementary data.
pub const ROUTING_SERVICE_CODE: &str = "BNA1";

// ---------------------------------------------------------------------------
// Case snapshot
// ---------------------------------------------------------------------------

/// The benefit the appeal concerns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Benefit {
    /// Benefit code, e.g. "PIP". Matched case-insensitively in lookups.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Per-letter-category reasonable-adjustment flags. A set flag means the
/// recipient's post must be stored for manual handling rather than printed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReasonableAdjustments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appellant: Option<YesNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative: Option<YesNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joint_party: Option<YesNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_party: Option<YesNo>,
}

impl ReasonableAdjustments {
    pub fn wants_adjustment(&self, category: LetterCategory) -> bool {
        let flag = match category {
            LetterCategory::Appellant => &self.appellant,
            LetterCategory::Representative => &self.representative,
            LetterCategory::JointParty => &self.joint_party,
            LetterCategory::OtherParty | LetterCategory::OtherPartyRepresentative => {
                &self.other_party
            }
            LetterCategory::Department => &None,
        };
        YesNo::flag_set(flag)
    }
}

/// Operator selection driving a reissue of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReissueSelection {
    /// Document url of the evidence chosen for reissue.
    pub document_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resend_to_appellant: Option<YesNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resend_to_representative: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_parties: Vec<OtherPartyReissueOption>,
}

/// Per-other-party reissue checkbox.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OtherPartyReissueOption {
    pub other_party_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resend: Option<YesNo>,
}

/// Routing metadata mirrored from the record's supplementary data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoutingMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_code: Option<String>,
}

/// Deep, read-mostly view of a case at the time of an event.
///
/// Handlers never mutate a snapshot in place once dispatch has started;
/// updates are made on a clone sent back to the case-record store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseSnapshot {
    pub case_id: String,
    pub benefit: Benefit,
    /// Issuing-office code for department address lookup, e.g. "1".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_office: Option<String>,
    /// How the appeal entered the system, e.g. `directLodgement`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_preference_welsh: Option<YesNo>,
    pub appellant: Appellant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative: Option<Representative>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joint_party: Option<JointParty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_parties: Vec<OtherParty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<CaseDocument>,
    #[serde(default)]
    pub adjustments: ReasonableAdjustments,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reissue_selection: Option<ReissueSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingMetadata>,
}

impl CaseSnapshot {
    pub fn has_representative(&self) -> bool {
        self.representative.as_ref().is_some_and(|r| r.is_present())
    }

    pub fn has_joint_party(&self) -> bool {
        self.joint_party.as_ref().is_some_and(|j| j.is_present())
    }

    /// Welsh-language cases receive the `welsh-` cover letter variants.
    pub fn prefers_welsh(&self) -> bool {
        YesNo::flag_set(&self.language_preference_welsh)
    }

    pub fn other_party(&self, entity_id: &str) -> Option<&OtherParty> {
        self.other_parties.iter().find(|p| p.matches_entity(entity_id))
    }
}
