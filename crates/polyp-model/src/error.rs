use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("patient id {0} is outside 1..={max}", max = crate::MAX_PATIENTS)]
    PatientOutOfRange(u32),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("cohort snapshot has {found} records, expected {expected}")]
    CohortSize { found: usize, expected: usize },
    #[error("cohort snapshot lists patient {0} more than once")]
    DuplicatePatient(u32),
}

pub type Result<T> = std::result::Result<T, ModelError>;
