#![deny(unsafe_code)]

use std::fmt;

use crate::{MAX_PATIENTS, ModelError};

/// A patient slot in the cohort, always within `1..=MAX_PATIENTS`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct PatientId(u32);

impl PatientId {
    /// Returns `None` when `value` is outside `1..=MAX_PATIENTS`.
    pub fn new(value: u32) -> Option<Self> {
        (1..=MAX_PATIENTS).contains(&value).then_some(Self(value))
    }

    pub fn first() -> Self {
        Self(1)
    }

    pub fn last() -> Self {
        Self(MAX_PATIENTS)
    }

    /// Clamps an arbitrary caller-supplied id into the cohort range.
    pub fn clamped(value: u32) -> Self {
        Self(value.clamp(1, MAX_PATIENTS))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn next_wrapping(self) -> Self {
        if self.0 < MAX_PATIENTS {
            Self(self.0 + 1)
        } else {
            Self::first()
        }
    }

    pub fn previous_wrapping(self) -> Self {
        if self.0 > 1 {
            Self(self.0 - 1)
        } else {
            Self::last()
        }
    }

    pub(crate) fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl TryFrom<u32> for PatientId {
    type Error = ModelError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ModelError::PatientOutOfRange(value))
    }
}

impl From<PatientId> for u32 {
    fn from(id: PatientId) -> Self {
        id.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Patient {}", self.0)
    }
}
