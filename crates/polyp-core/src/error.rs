use polyp_model::{Category, ModelError};
use thiserror::Error;

/// Failure to turn a term list into a matcher. Raised only at startup.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid {category} term {term:?}: {source}")]
    InvalidTerm {
        category: Category,
        term: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to compile combined {category} pattern: {source}")]
    Combined {
        category: Category,
        #[source]
        source: regex::Error,
    },

    #[error("{found} pattern set supplied where {expected} was expected")]
    CategoryMismatch { expected: Category, found: Category },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("patient id {0} is outside the cohort (1..={max})", max = polyp_model::MAX_PATIENTS)]
    OutOfRange(u32),

    #[error("invalid remote cohort: {0}")]
    InvalidCohort(#[from] ModelError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("empty key chord")]
    EmptyChord,

    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("unknown modifier: {0}")]
    UnknownModifier(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}
