use std::collections::HashMap;

use shared_types::Address;

/// A department issuing office: display name plus mailing address.
#[derive(Debug, Clone, PartialEq)]
pub struct OfficeAddress {
    pub name: String,
    pub address: Address,
}

/// Immutable department address table, keyed on (benefit code, issuing
/// office code). Benefit codes match case-insensitively; office codes match
/// exactly. Injected rather than static so tests can substitute fixtures.
#[derive(Debug, Clone)]
pub struct OfficeAddressLookup {
    entries: HashMap<(String, String), OfficeAddress>,
}

impl OfficeAddressLookup {
    pub fn new(entries: HashMap<(String, String), OfficeAddress>) -> Self {
        let entries = entries
            .into_iter()
            .map(|((benefit, office), addr)| ((benefit.to_lowercase(), office), addr))
            .collect();
        Self { entries }
    }

    /// The production table.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();

        for office in ["1", "2", "3", "4", "5"] {
            entries.insert(
                ("PIP".to_string(), office.to_string()),
                OfficeAddress {
                    name: format!("Personal Independence Payment ({office})"),
                    address: Address {
                        line1: format!("PIP Assessment Office ({office})"),
                        line2: Some("Mail Handling Site A".to_string()),
                        town: "Wolverhampton".to_string(),
                        county: None,
                        postcode: "WV98 1AA".to_string(),
                    },
                },
            );
        }

        entries.insert(
            ("ESA".to_string(), "Balham DRT".to_string()),
            OfficeAddress {
                name: "Employment and Support Allowance (Balham DRT)".to_string(),
                address: Address {
                    line1: "Balham Benefit Centre".to_string(),
                    line2: Some("Mail Handling Site A".to_string()),
                    town: "Wolverhampton".to_string(),
                    county: None,
                    postcode: "WV98 1AB".to_string(),
                },
            },
        );

        entries.insert(
            ("UC".to_string(), "Universal Credit".to_string()),
            OfficeAddress {
                name: "Universal Credit".to_string(),
                address: Address {
                    line1: "Universal Credit Full Service".to_string(),
                    line2: Some("Post Handling Site B".to_string()),
                    town: "Wolverhampton".to_string(),
                    county: None,
                    postcode: "WV99 1AJ".to_string(),
                },
            },
        );

        entries.insert(
            ("childSupport".to_string(), "CMS".to_string()),
            OfficeAddress {
                name: "Child Maintenance Service".to_string(),
                address: Address {
                    line1: "Child Maintenance Service Group".to_string(),
                    line2: Some("Mail Handling Site A".to_string()),
                    town: "Wolverhampton".to_string(),
                    county: None,
                    postcode: "WV98 1BA".to_string(),
                },
            },
        );

        Self::new(entries)
    }

    /// Look up the office for a benefit/office pair. A miss is logged as a
    /// warning and returned as `None` — callers decide whether that is an
    /// error; the lookup itself never fails.
    pub fn address_for(&self, benefit_code: &str, office_code: &str) -> Option<&OfficeAddress> {
        let key = (benefit_code.to_lowercase(), office_code.to_string());
        let found = self.entries.get(&key);
        if found.is_none() {
            tracing::warn!(
                benefit = benefit_code,
                office = office_code,
                "No department address found"
            );
        }
        found
    }
}
