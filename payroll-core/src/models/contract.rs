use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContractCategory {
    Permanent,
    Temporary,
    Internship,
    Other,
}

impl ContractCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permanent => "PERMANENT",
            Self::Temporary => "TEMPORARY",
            Self::Internship => "INTERNSHIP",
            Self::Other => "OTHER",
        }
    }
}

/// An employment contract kind.
///
/// `tax_exempt` contracts (internship and insertion programmes) pay neither
/// CNSS nor IRPP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractType {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub tax_exempt: bool,
    pub category: ContractCategory,
}
