use shared_types::{Address, CaseSnapshot, DispatchError, LetterCategory, Recipient};

use super::office_address::OfficeAddressLookup;

/// Computes the mailing name/address for a letter category on a case.
#[derive(Debug, Clone)]
pub struct RecipientResolver {
    offices: OfficeAddressLookup,
}

impl RecipientResolver {
    pub fn new(offices: OfficeAddressLookup) -> Self {
        Self { offices }
    }

    /// Resolve the recipient for one letter category.
    ///
    /// `other_party_id` is required for the two other-party categories and
    /// ignored otherwise.
    pub fn resolve(
        &self,
        case: &CaseSnapshot,
        category: LetterCategory,
        other_party_id: Option<&str>,
    ) -> Result<Recipient, DispatchError> {
        match category {
            LetterCategory::Appellant => Ok(self.resolve_appellant(case)),
            LetterCategory::Representative => Ok(self.resolve_representative(case)),
            LetterCategory::JointParty => self.resolve_joint_party(case),
            LetterCategory::OtherParty | LetterCategory::OtherPartyRepresentative => {
                self.resolve_other_party(case, category, other_party_id)
            }
            LetterCategory::Department => self.resolve_department(case),
        }
    }

    /// Appellant post goes to the appointee when one is active.
    fn resolve_appellant(&self, case: &CaseSnapshot) -> Recipient {
        if let Some(appointee) = case.appellant.active_appointee() {
            return Recipient {
                name: appointee.name.full_name(),
                address: appointee.address.clone(),
            };
        }
        Recipient {
            name: case.appellant.name.full_name(),
            address: case.appellant.address.clone(),
        }
    }

    /// A representative flagged present but without contact details gets
    /// the empty-address sentinel — a known degraded case, not an error.
    fn resolve_representative(&self, case: &CaseSnapshot) -> Recipient {
        match &case.representative {
            Some(rep) if rep.is_present() => {
                let name = rep
                    .name
                    .as_ref()
                    .map(|n| n.full_name())
                    .unwrap_or_default();
                let address = rep.address.clone().unwrap_or_else(Address::empty);
                if address.is_empty() {
                    tracing::warn!(
                        case_id = %case.case_id,
                        "Representative has no address — sending on empty address"
                    );
                }
                Recipient { name, address }
            }
            _ => {
                tracing::warn!(
                    case_id = %case.case_id,
                    "No representative on case — resolving to empty address"
                );
                Recipient { name: String::new(), address: Address::empty() }
            }
        }
    }

    fn resolve_joint_party(&self, case: &CaseSnapshot) -> Result<Recipient, DispatchError> {
        let joint = case
            .joint_party
            .as_ref()
            .filter(|j| j.is_present())
            .ok_or_else(|| {
                DispatchError::required_field_missing(format!(
                    "case {} has no joint party",
                    case.case_id
                ))
            })?;

        Ok(Recipient {
            name: joint.name.as_ref().map(|n| n.full_name()).unwrap_or_default(),
            address: joint.address.clone().unwrap_or_else(Address::empty),
        })
    }

    /// Locate the other-party entry whose own id, representative id, or
    /// appointee id matches; then apply the appointee-substitution rule, or
    /// return the representative's details when that category was asked for.
    fn resolve_other_party(
        &self,
        case: &CaseSnapshot,
        category: LetterCategory,
        other_party_id: Option<&str>,
    ) -> Result<Recipient, DispatchError> {
        let entity_id = other_party_id.ok_or_else(|| {
            DispatchError::required_field_missing("other-party letter without an entity id")
        })?;

        let party = case.other_party(entity_id).ok_or_else(|| {
            DispatchError::required_field_missing(format!(
                "case {} has no other party matching entity {}",
                case.case_id, entity_id
            ))
        })?;

        if category == LetterCategory::OtherPartyRepresentative {
            let rep = party.representative.as_ref().ok_or_else(|| {
                DispatchError::required_field_missing(format!(
                    "other party {} has no representative",
                    party.id
                ))
            })?;
            return Ok(Recipient {
                name: rep.name.full_name(),
                address: rep.address.clone(),
            });
        }

        if let Some(appointee) = &party.appointee {
            return Ok(Recipient {
                name: appointee.name.full_name(),
                address: appointee.address.clone(),
            });
        }

        Ok(Recipient {
            name: party.name.full_name(),
            address: party.address.clone(),
        })
    }

    /// Department address by (benefit, issuing office). A miss is a
    /// data-quality error for the caller — never retried.
    fn resolve_department(&self, case: &CaseSnapshot) -> Result<Recipient, DispatchError> {
        let office_code = case.issuing_office.as_deref().unwrap_or_default();
        let office = self
            .offices
            .address_for(&case.benefit.code, office_code)
            .ok_or_else(|| {
                DispatchError::address_not_found(format!(
                    "no department address for benefit '{}' office '{}'",
                    case.benefit.code, office_code
                ))
            })?;

        Ok(Recipient {
            name: office.name.clone(),
            address: office.address.clone(),
        })
    }
}
