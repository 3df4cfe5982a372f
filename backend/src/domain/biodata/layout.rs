//! Visual layouts a biodata can be rendered in.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Interchangeable rendering of a draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Modern,
    Traditional,
}

impl Layout {
    pub const ALL: [Layout; 2] = [Layout::Modern, Layout::Traditional];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Modern => "modern",
            Layout::Traditional => "traditional",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Layout::Modern => "Modern",
            Layout::Traditional => "Traditional",
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Layout {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(Layout::Modern),
            "traditional" => Ok(Layout::Traditional),
            _ => Err(ValidationError::invalid_format(
                "layout",
                format!("expected 'modern' or 'traditional', got '{}'", s),
            )),
        }
    }
}
