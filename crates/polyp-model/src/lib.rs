//! Data model for the polyp counter: patients, categories, match terms and
//! session options.

pub mod category;
pub mod error;
pub mod ids;
pub mod options;
pub mod record;
pub mod term;

pub use category::Category;
pub use error::{ModelError, Result};
pub use ids::PatientId;
pub use options::{CursorPolicy, OutOfRangePolicy, SessionOptions, TermMode};
pub use record::{
    CategoryCounts, Cohort, CohortSnapshot, PatientEntry, PatientRecord, SessionSnapshot,
    SessionState,
};
pub use term::{PatternSet, Term};

/// Fixed cohort size.
pub const MAX_PATIENTS: u32 = 200;
