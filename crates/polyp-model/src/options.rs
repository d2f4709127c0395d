//! Configuration options for a counting session.

use serde::{Deserialize, Serialize};

/// What to do when a patient id outside the cohort reaches `scan`,
/// `increment` or `reset_patient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    /// Leave the cohort untouched, log a warning and return an ignored
    /// outcome naming the id.
    #[default]
    Ignore,
    /// Fail the operation with an out-of-range error.
    Reject,
}

/// How externally supplied cursor positions are bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorPolicy {
    /// Clamp into `1..=MAX_PATIENTS`.
    #[default]
    Clamp,
    /// Refuse the update and keep the current cursor.
    Reject,
}

/// How term text is turned into matcher syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TermMode {
    /// Escape literal terms, keep pattern terms as regex fragments.
    #[default]
    Typed,
    /// Escape every term, pattern terms included.
    ///
    /// Pattern terms then only match their raw text (backslashes and all),
    /// so the parenthesized variants and the wildcard term never fire.
    EscapeAll,
}

/// Options controlling session behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionOptions {
    pub out_of_range: OutOfRangePolicy,
    pub cursor: CursorPolicy,
    pub terms: TermMode,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_out_of_range(mut self, policy: OutOfRangePolicy) -> Self {
        self.out_of_range = policy;
        self
    }

    pub fn with_cursor(mut self, policy: CursorPolicy) -> Self {
        self.cursor = policy;
        self
    }

    pub fn with_terms(mut self, mode: TermMode) -> Self {
        self.terms = mode;
        self
    }

    /// Reject anything that does not fit the cohort.
    pub fn strict() -> Self {
        Self {
            out_of_range: OutOfRangePolicy::Reject,
            cursor: CursorPolicy::Reject,
            terms: TermMode::Typed,
        }
    }
}
