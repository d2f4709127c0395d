//! Per-patient tallies and the fixed-size cohort that holds them.
//!
//! A [`PatientRecord`] never stores its total: [`PatientRecord::total`] is
//! derived from the two category counts, so `total == serrated + adenomatous`
//! holds after every mutation without any bookkeeping.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Category, MAX_PATIENTS, ModelError, PatientId};

/// Counts produced by one classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub serrated: u32,
    pub adenomatous: u32,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Serrated => self.serrated,
            Category::Adenomatous => self.adenomatous,
        }
    }

    pub fn total(&self) -> u32 {
        self.serrated.saturating_add(self.adenomatous)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Running tally for a single patient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RecordRepr", from = "RecordRepr")]
pub struct PatientRecord {
    serrated: u32,
    adenomatous: u32,
}

impl PatientRecord {
    pub fn new(serrated: u32, adenomatous: u32) -> Self {
        Self {
            serrated,
            adenomatous,
        }
    }

    pub fn serrated(&self) -> u32 {
        self.serrated
    }

    pub fn adenomatous(&self) -> u32 {
        self.adenomatous
    }

    pub fn total(&self) -> u32 {
        self.serrated.saturating_add(self.adenomatous)
    }

    pub fn count(&self, category: Category) -> u32 {
        match category {
            Category::Serrated => self.serrated,
            Category::Adenomatous => self.adenomatous,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }

    pub fn add(&mut self, category: Category, amount: u32) {
        let slot = match category {
            Category::Serrated => &mut self.serrated,
            Category::Adenomatous => &mut self.adenomatous,
        };
        *slot = slot.saturating_add(amount);
    }

    pub fn add_counts(&mut self, counts: CategoryCounts) {
        self.add(Category::Serrated, counts.serrated);
        self.add(Category::Adenomatous, counts.adenomatous);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// Wire shape always carries `total`; it is recomputed on read.
#[derive(Serialize, Deserialize)]
struct RecordRepr {
    serrated: u32,
    adenomatous: u32,
    #[serde(default)]
    total: u32,
}

impl From<PatientRecord> for RecordRepr {
    fn from(record: PatientRecord) -> Self {
        Self {
            serrated: record.serrated,
            adenomatous: record.adenomatous,
            total: record.total(),
        }
    }
}

impl From<RecordRepr> for PatientRecord {
    fn from(repr: RecordRepr) -> Self {
        Self::new(repr.serrated, repr.adenomatous)
    }
}

/// All `MAX_PATIENTS` records, allocated up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cohort {
    records: Vec<PatientRecord>,
}

impl Default for Cohort {
    fn default() -> Self {
        Self::new()
    }
}

impl Cohort {
    pub fn new() -> Self {
        Self {
            records: vec![PatientRecord::default(); MAX_PATIENTS as usize],
        }
    }

    pub fn get(&self, id: PatientId) -> &PatientRecord {
        &self.records[id.index()]
    }

    pub fn get_mut(&mut self, id: PatientId) -> &mut PatientRecord {
        &mut self.records[id.index()]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatientId, &PatientRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| (PatientId::clamped(index as u32 + 1), record))
    }

    /// Zeroes every record in place.
    pub fn reset(&mut self) {
        self.records.iter_mut().for_each(PatientRecord::clear);
    }

    /// Sum of every record's counts.
    pub fn totals(&self) -> CategoryCounts {
        self.records
            .iter()
            .fold(CategoryCounts::default(), |acc, record| CategoryCounts {
                serrated: acc.serrated.saturating_add(record.serrated),
                adenomatous: acc.adenomatous.saturating_add(record.adenomatous),
            })
    }

    pub fn snapshot(&self) -> CohortSnapshot {
        CohortSnapshot {
            patients: self
                .iter()
                .map(|(patient, record)| PatientEntry {
                    patient,
                    record: *record,
                })
                .collect(),
        }
    }
}

impl TryFrom<CohortSnapshot> for Cohort {
    type Error = ModelError;

    /// Accepts a snapshot only when it lists every patient exactly once.
    fn try_from(snapshot: CohortSnapshot) -> Result<Self, Self::Error> {
        let expected = MAX_PATIENTS as usize;
        if snapshot.patients.len() != expected {
            return Err(ModelError::CohortSize {
                found: snapshot.patients.len(),
                expected,
            });
        }
        let mut seen = BTreeSet::new();
        let mut cohort = Cohort::new();
        for entry in snapshot.patients {
            if !seen.insert(entry.patient) {
                return Err(ModelError::DuplicatePatient(entry.patient.get()));
            }
            *cohort.get_mut(entry.patient) = entry.record;
        }
        Ok(cohort)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientEntry {
    pub patient: PatientId,
    #[serde(flatten)]
    pub record: PatientRecord,
}

/// Serializable view of a whole cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortSnapshot {
    pub patients: Vec<PatientEntry>,
}

/// The cursor plus the cohort it points into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub current: PatientId,
    pub cohort: Cohort,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::init()
    }
}

impl SessionState {
    /// Zeroed cohort with the cursor on patient 1.
    pub fn init() -> Self {
        Self {
            current: PatientId::first(),
            cohort: Cohort::new(),
        }
    }

    pub fn current_record(&self) -> &PatientRecord {
        self.cohort.get(self.current)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current: self.current,
            cohort: self.cohort.snapshot(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub current: PatientId,
    pub cohort: CohortSnapshot,
}
