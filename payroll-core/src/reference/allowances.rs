use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AllowanceCategory {
    Transport,
    Housing,
    Food,
    Bonus,
    Other,
}

/// A kind of allowance an employer may pay on top of base salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowanceType {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub category: AllowanceCategory,
    /// Shown by default on the salary form.
    pub is_common: bool,
}

pub static ALLOWANCE_TYPES: [AllowanceType; 7] = [
    AllowanceType {
        id: "transport",
        label: "Transport",
        description: "Transport allowance",
        category: AllowanceCategory::Transport,
        is_common: true,
    },
    AllowanceType {
        id: "logement",
        label: "Logement",
        description: "Housing allowance",
        category: AllowanceCategory::Housing,
        is_common: true,
    },
    AllowanceType {
        id: "repas",
        label: "Repas",
        description: "Meal allowance",
        category: AllowanceCategory::Food,
        is_common: true,
    },
    AllowanceType {
        id: "deplacement",
        label: "Déplacement",
        description: "Travel allowance",
        category: AllowanceCategory::Transport,
        is_common: false,
    },
    AllowanceType {
        id: "telephone",
        label: "Téléphone",
        description: "Telephone allowance",
        category: AllowanceCategory::Other,
        is_common: false,
    },
    AllowanceType {
        id: "carburant",
        label: "Carburant",
        description: "Fuel allowance",
        category: AllowanceCategory::Transport,
        is_common: false,
    },
    AllowanceType {
        id: "prime",
        label: "Prime",
        description: "Exceptional bonus",
        category: AllowanceCategory::Bonus,
        is_common: false,
    },
];

pub fn find_allowance(id: &str) -> Option<&'static AllowanceType> {
    ALLOWANCE_TYPES.iter().find(|a| a.id == id)
}
