//! Finding categories tracked per patient.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Polyp finding class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Serrated lesions (sessile serrated, traditional serrated).
    Serrated,
    /// Conventional adenomas (tubular, tubulovillous, villous).
    Adenomatous,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Serrated, Category::Adenomatous];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Serrated => "serrated",
            Category::Adenomatous => "adenomatous",
        }
    }

    /// Human-readable label used in panels and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Serrated => "Serrated",
            Category::Adenomatous => "Adenomatous",
        }
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("serrated") {
            Ok(Category::Serrated)
        } else if trimmed.eq_ignore_ascii_case("adenomatous") {
            Ok(Category::Adenomatous)
        } else {
            Err(ModelError::UnknownCategory(s.to_string()))
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
