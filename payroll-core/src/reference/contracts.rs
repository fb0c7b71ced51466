use crate::models::{ContractCategory, ContractType};

/// Every contract type offered on the salary form.
pub static CONTRACT_TYPES: [ContractType; 8] = [
    ContractType {
        id: "1",
        label: "CDI",
        description: "Open-ended employment contract",
        tax_exempt: false,
        category: ContractCategory::Permanent,
    },
    ContractType {
        id: "2",
        label: "CDD",
        description: "Fixed-term employment contract",
        tax_exempt: false,
        category: ContractCategory::Temporary,
    },
    ContractType {
        id: "3",
        label: "SIVP",
        description: "Professional life initiation traineeship for new graduates",
        tax_exempt: true,
        category: ContractCategory::Internship,
    },
    ContractType {
        id: "4",
        label: "KARAMA",
        description: "Dignity contract, professional insertion programme",
        tax_exempt: true,
        category: ContractCategory::Internship,
    },
    ContractType {
        id: "5",
        label: "Stage",
        description: "Agreed internship, practical training in a company",
        tax_exempt: true,
        category: ContractCategory::Internship,
    },
    ContractType {
        id: "6",
        label: "CAIP",
        description: "Professional adaptation and insertion contract",
        tax_exempt: true,
        category: ContractCategory::Internship,
    },
    ContractType {
        id: "7",
        label: "CIVP",
        description: "Professional life insertion contract",
        tax_exempt: true,
        category: ContractCategory::Internship,
    },
    ContractType {
        id: "8",
        label: "Autre",
        description: "Other arrangement (freelance, service contract, ...)",
        tax_exempt: false,
        category: ContractCategory::Other,
    },
];

/// Resolves contract ids to contract types.
///
/// Implementations must be pure lookups; the calculators call them on every
/// evaluation.
pub trait ContractLookup: Send + Sync {
    fn find(
        &self,
        id: &str,
    ) -> Option<&ContractType>;

    fn all(&self) -> &[ContractType];

    /// Unknown ids are never exempt.
    fn is_tax_exempt(
        &self,
        id: &str,
    ) -> bool {
        self.find(id).is_some_and(|c| c.tax_exempt)
    }
}

/// The built-in catalog backed by [`CONTRACT_TYPES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractCatalog;

impl ContractLookup for ContractCatalog {
    fn find(
        &self,
        id: &str,
    ) -> Option<&ContractType> {
        CONTRACT_TYPES.iter().find(|c| c.id == id)
    }

    fn all(&self) -> &[ContractType] {
        &CONTRACT_TYPES
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn find_returns_matching_contract() {
        let contract = ContractCatalog.find("3").unwrap();

        assert_eq!(contract.label, "SIVP");
        assert_eq!(contract.category, ContractCategory::Internship);
    }

    #[test]
    fn find_returns_none_for_unknown_id() {
        assert!(ContractCatalog.find("42").is_none());
        assert!(ContractCatalog.find("").is_none());
    }

    #[test]
    fn internship_contracts_are_exempt() {
        for id in ["3", "4", "5", "6", "7"] {
            assert!(ContractCatalog.is_tax_exempt(id), "contract {id}");
        }
    }

    #[test]
    fn employment_contracts_are_not_exempt() {
        for id in ["1", "2", "8"] {
            assert!(!ContractCatalog.is_tax_exempt(id), "contract {id}");
        }
    }

    #[test]
    fn unknown_contract_is_not_exempt() {
        assert!(!ContractCatalog.is_tax_exempt("99"));
    }

    #[test]
    fn all_lists_every_contract_in_id_order() {
        let ids: Vec<_> = ContractCatalog.all().iter().map(|c| c.id).collect();

        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
    }
}
