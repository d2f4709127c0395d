//! Patient session store.
//!
//! [`SessionStore`] is the single owner of the cohort and the cursor. Callers
//! hold it by `&mut` and every operation runs to completion before returning;
//! there is no shared or global state.
//!
//! After each operation that changes the state, the store first hands it to
//! its [`SaveHook`] and then notifies every [`RefreshListener`] synchronously.
//! Ignored and rejected operations notify nobody.
//! The notification carries no payload: listeners re-read the cursor and the
//! current record from the `&SessionState` they are given.
//!
//! Patient ids arrive as raw integers because they may come from outside the
//! cohort (remote sync, scripted input). Ids outside `1..=MAX_PATIENTS` are
//! handled by [`OutOfRangePolicy`] for record operations and by
//! [`CursorPolicy`] for cursor moves.

use polyp_model::{
    Category, CategoryCounts, Cohort, CohortSnapshot, CursorPolicy, OutOfRangePolicy, PatientId,
    PatientRecord, SessionOptions, SessionState,
};
use tracing::{debug, info, info_span, warn};

use crate::classify::Classifier;
use crate::error::{PatternError, SessionError};
use crate::normalize::normalize;
use crate::patterns::PatternRegistry;

/// Receives a call after every accepted session operation.
pub trait RefreshListener {
    fn refresh(&mut self, state: &SessionState);
}

impl<F> RefreshListener for F
where
    F: FnMut(&SessionState),
{
    fn refresh(&mut self, state: &SessionState) {
        self(state);
    }
}

/// Persistence seam, invoked before listeners are refreshed.
pub trait SaveHook {
    fn save(&mut self, state: &SessionState);
}

/// Save hook that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSave;

impl SaveHook for NoopSave {
    fn save(&mut self, _state: &SessionState) {}
}

/// Why an operation left the cohort unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    OutOfRange(u32),
    UnknownCategory(String),
}

/// Result of a record operation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Ignored(IgnoreReason),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Ignored(_) => None,
        }
    }
}

/// State pushed by an external collaborator (a shared or replayed session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteUpdate {
    Cursor(u32),
    Cohort(CohortSnapshot),
}

pub struct SessionStore {
    state: SessionState,
    classifier: Classifier,
    options: SessionOptions,
    save_hook: Box<dyn SaveHook>,
    listeners: Vec<Box<dyn RefreshListener>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &self.state.current)
            .field("options", &self.options)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(classifier: Classifier, options: SessionOptions) -> Self {
        Self {
            state: SessionState::init(),
            classifier,
            options,
            save_hook: Box::new(NoopSave),
            listeners: Vec::new(),
        }
    }

    /// Store over the built-in term lists, compiled per `options.terms`.
    ///
    /// # Errors
    ///
    /// Fails when a built-in term does not compile under the chosen mode.
    pub fn from_options(options: SessionOptions) -> Result<Self, PatternError> {
        let classifier = Classifier::new(&PatternRegistry::builtin(), options.terms)?;
        Ok(Self::new(classifier, options))
    }

    #[must_use]
    pub fn with_save_hook(mut self, hook: impl SaveHook + 'static) -> Self {
        self.save_hook = Box::new(hook);
        self
    }

    pub fn subscribe(&mut self, listener: impl RefreshListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn current(&self) -> PatientId {
        self.state.current
    }

    pub fn current_record(&self) -> &PatientRecord {
        self.state.current_record()
    }

    pub fn record(&self, patient: PatientId) -> &PatientRecord {
        self.state.cohort.get(patient)
    }

    /// Normalize `text`, count both categories and add the counts to the
    /// patient's record. Scans are cumulative.
    ///
    /// # Errors
    ///
    /// [`SessionError::OutOfRange`] under [`OutOfRangePolicy::Reject`].
    pub fn scan(
        &mut self,
        patient: u32,
        text: &str,
    ) -> Result<Outcome<CategoryCounts>, SessionError> {
        let span = info_span!("scan", patient);
        let _guard = span.enter();
        let Some(id) = self.resolve(patient)? else {
            return Ok(Outcome::Ignored(IgnoreReason::OutOfRange(patient)));
        };
        let normalized = normalize(text);
        let counts = self.classifier.classify(&normalized);
        self.state.cohort.get_mut(id).add_counts(counts);
        info!(
            serrated = counts.serrated,
            adenomatous = counts.adenomatous,
            text_len = normalized.len(),
            "scan complete"
        );
        self.commit();
        Ok(Outcome::Applied(counts))
    }

    /// Add one to `category` for `patient`.
    ///
    /// # Errors
    ///
    /// [`SessionError::OutOfRange`] under [`OutOfRangePolicy::Reject`].
    pub fn increment(
        &mut self,
        patient: u32,
        category: Category,
    ) -> Result<Outcome<PatientRecord>, SessionError> {
        let Some(id) = self.resolve(patient)? else {
            return Ok(Outcome::Ignored(IgnoreReason::OutOfRange(patient)));
        };
        let record = self.state.cohort.get_mut(id);
        record.add(category, 1);
        let record = *record;
        debug!(patient, %category, total = record.total(), "incremented");
        self.commit();
        Ok(Outcome::Applied(record))
    }

    /// String-keyed increment. An unrecognized category is a silent no-op.
    ///
    /// # Errors
    ///
    /// [`SessionError::OutOfRange`] under [`OutOfRangePolicy::Reject`].
    pub fn increment_one(
        &mut self,
        patient: u32,
        category: &str,
    ) -> Result<Outcome<PatientRecord>, SessionError> {
        match category.parse::<Category>() {
            Ok(category) => self.increment(patient, category),
            Err(_) => {
                debug!(patient, "ignoring increment for unknown category");
                Ok(Outcome::Ignored(IgnoreReason::UnknownCategory(
                    category.to_string(),
                )))
            }
        }
    }

    /// Zero one patient's record.
    ///
    /// # Errors
    ///
    /// [`SessionError::OutOfRange`] under [`OutOfRangePolicy::Reject`].
    pub fn reset_patient(&mut self, patient: u32) -> Result<Outcome<()>, SessionError> {
        let Some(id) = self.resolve(patient)? else {
            return Ok(Outcome::Ignored(IgnoreReason::OutOfRange(patient)));
        };
        self.state.cohort.get_mut(id).clear();
        debug!(patient, "patient reset");
        self.commit();
        Ok(Outcome::Applied(()))
    }

    /// Zero the whole cohort and return the cursor to patient 1.
    pub fn reset_all(&mut self) {
        self.state.cohort.reset();
        self.state.current = PatientId::first();
        info!("cohort reset");
        self.commit();
    }

    pub fn navigate_next(&mut self) -> PatientId {
        self.move_cursor(self.state.current.next_wrapping())
    }

    pub fn navigate_previous(&mut self) -> PatientId {
        self.move_cursor(self.state.current.previous_wrapping())
    }

    /// Direct cursor set from an external source.
    ///
    /// # Errors
    ///
    /// [`SessionError::OutOfRange`] under [`CursorPolicy::Reject`]; the cursor
    /// is left where it was.
    pub fn set_current(&mut self, patient: u32) -> Result<PatientId, SessionError> {
        let id = match (PatientId::new(patient), self.options.cursor) {
            (Some(id), _) => id,
            (None, CursorPolicy::Clamp) => {
                let clamped = PatientId::clamped(patient);
                warn!(patient, clamped = clamped.get(), "cursor clamped into cohort");
                clamped
            }
            (None, CursorPolicy::Reject) => {
                warn!(patient, "cursor update rejected");
                return Err(SessionError::OutOfRange(patient));
            }
        };
        Ok(self.move_cursor(id))
    }

    /// Apply a value pushed by an external collaborator.
    ///
    /// # Errors
    ///
    /// Cursor updates follow [`SessionStore::set_current`]. Cohort updates
    /// must list every patient exactly once; otherwise the cohort is left
    /// unchanged.
    pub fn apply_remote(&mut self, update: RemoteUpdate) -> Result<(), SessionError> {
        match update {
            RemoteUpdate::Cursor(patient) => self.set_current(patient).map(|_| ()),
            RemoteUpdate::Cohort(snapshot) => {
                self.state.cohort = Cohort::try_from(snapshot)?;
                info!("cohort replaced by remote update");
                self.commit();
                Ok(())
            }
        }
    }

    /// Re-notify listeners without changing anything.
    pub fn refresh(&mut self) {
        for listener in &mut self.listeners {
            listener.refresh(&self.state);
        }
    }

    fn move_cursor(&mut self, id: PatientId) -> PatientId {
        self.state.current = id;
        debug!(patient = id.get(), "cursor moved");
        self.commit();
        id
    }

    fn resolve(&self, patient: u32) -> Result<Option<PatientId>, SessionError> {
        match (PatientId::new(patient), self.options.out_of_range) {
            (Some(id), _) => Ok(Some(id)),
            (None, OutOfRangePolicy::Ignore) => {
                warn!(patient, "patient id outside cohort, ignoring");
                Ok(None)
            }
            (None, OutOfRangePolicy::Reject) => Err(SessionError::OutOfRange(patient)),
        }
    }

    fn commit(&mut self) {
        self.save_hook.save(&self.state);
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::from_options(SessionOptions::default()).expect("builtin patterns")
    }

    #[test]
    fn outcome_helpers() {
        let applied: Outcome<u32> = Outcome::Applied(3);
        assert!(applied.is_applied());
        assert_eq!(applied.applied(), Some(3));
        let ignored: Outcome<u32> = Outcome::Ignored(IgnoreReason::OutOfRange(0));
        assert_eq!(ignored.applied(), None);
    }

    #[test]
    fn debug_omits_cohort() {
        let rendered = format!("{:?}", store());
        assert!(rendered.starts_with("SessionStore"));
        assert!(!rendered.contains("cohort"));
    }
}
