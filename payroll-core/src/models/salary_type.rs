use serde::{Deserialize, Serialize};

/// What kind of salary figure the caller entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryType {
    #[default]
    Base,
    Gross,
    Net,
}

impl SalaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Gross => "gross",
            Self::Net => "net",
        }
    }

    /// Case-insensitive parse of `base`, `gross` or `net`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Some(Self::Base),
            "gross" => Some(Self::Gross),
            "net" => Some(Self::Net),
            _ => None,
        }
    }
}
