use serde::{Deserialize, Serialize};

use crate::common::{Address, PersonName, YesNo};

// ---------------------------------------------------------------------------
// Parties to an appeal
// ---------------------------------------------------------------------------

/// The person the appeal is about. When an appointee is recorded and the
/// appointee flag is "Yes", all post for the appellant goes to the appointee
/// instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Appellant {
    pub name: PersonName,
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_appointee: Option<YesNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointee: Option<Appointee>,
}

impl Appellant {
    /// The appellant-rule substitution: post goes to the appointee only when
    /// the flag is an explicit "Yes" and appointee details exist.
    pub fn active_appointee(&self) -> Option<&Appointee> {
        if YesNo::flag_set(&self.is_appointee) {
            self.appointee.as_ref()
        } else {
            None
        }
    }
}

/// Someone appointed to act on a party's behalf; receives that party's post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Appointee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: PersonName,
    pub address: Address,
}

/// The appellant's representative. `has_representative` is the presence flag
/// on the record — contact details may be missing even when it is "Yes",
/// which resolves to the empty-address sentinel, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Representative {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_representative: Option<YesNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<PersonName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Representative {
    pub fn is_present(&self) -> bool {
        YesNo::flag_set(&self.has_representative)
    }
}

/// A second party joined to the appeal (e.g. the other parent on a child
/// support case).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct JointParty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_joint_party: Option<YesNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<PersonName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl JointParty {
    pub fn is_present(&self) -> bool {
        YesNo::flag_set(&self.has_joint_party)
    }
}

/// Any further party on the case. Each carries its own entity id; its
/// appointee and representative carry ids of their own so that letters can
/// be targeted at any of the three.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OtherParty {
    pub id: String,
    pub name: PersonName,
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointee: Option<Appointee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative: Option<OtherPartyRepresentative>,
}

/// An other party's own representative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OtherPartyRepresentative {
    pub id: String,
    pub name: PersonName,
    pub address: Address,
}

impl OtherParty {
    /// True when any of the party's own id, its representative's id, or its
    /// appointee's id matches the supplied entity id.
    pub fn matches_entity(&self, entity_id: &str) -> bool {
        self.id == entity_id
            || self
                .representative
                .as_ref()
                .is_some_and(|r| r.id == entity_id)
            || self
                .appointee
                .as_ref()
                .is_some_and(|a| a.id.as_deref() == Some(entity_id))
    }
}
