//! Tests for the patient session store.

use std::cell::RefCell;
use std::rc::Rc;

use polyp_core::{IgnoreReason, Outcome, RemoteUpdate, SaveHook, SessionError, SessionStore};
use polyp_model::{
    Category, CategoryCounts, Cohort, CursorPolicy, MAX_PATIENTS, OutOfRangePolicy, PatientId,
    PatientRecord, SessionOptions, SessionState,
};
use proptest::prelude::*;

fn store() -> SessionStore {
    SessionStore::from_options(SessionOptions::default()).expect("builtin patterns")
}

fn record(serrated: u32, adenomatous: u32) -> PatientRecord {
    PatientRecord::new(serrated, adenomatous)
}

#[test]
fn test_increment_counts() {
    let mut store = store();
    for _ in 0..3 {
        store.increment_one(7, "serrated").expect("in range");
    }
    for _ in 0..2 {
        store.increment_one(7, "adenomatous").expect("in range");
    }
    let tally = store.record(PatientId::clamped(7));
    assert_eq!(*tally, record(3, 2));
    assert_eq!(tally.total(), 5);
}

#[test]
fn test_unknown_category_is_noop() {
    let mut store = store();
    store.increment_one(4, "serrated").expect("in range");
    let outcome = store.increment_one(4, "unknown").expect("not an error");
    assert_eq!(
        outcome,
        Outcome::Ignored(IgnoreReason::UnknownCategory("unknown".to_string()))
    );
    assert_eq!(*store.record(PatientId::clamped(4)), record(1, 0));
}

#[test]
fn test_scan_is_cumulative() {
    let mut store = store();
    let text = "Tubular adenoma and sessile serrated adenoma found";
    let first = store.scan(1, text).expect("in range");
    assert_eq!(
        first,
        Outcome::Applied(CategoryCounts {
            serrated: 1,
            adenomatous: 1,
        })
    );
    let once = *store.record(PatientId::first());
    store.scan(1, text).expect("in range");
    let twice = *store.record(PatientId::first());
    assert_eq!(twice.serrated(), once.serrated() * 2);
    assert_eq!(twice.adenomatous(), once.adenomatous() * 2);
    assert_eq!(twice.total(), once.total() * 2);
}

#[test]
fn test_scan_empty_text() {
    let mut store = store();
    let outcome = store.scan(1, "").expect("in range");
    assert_eq!(outcome, Outcome::Applied(CategoryCounts::default()));
    assert!(store.current_record().is_zero());
}

#[test]
fn test_scan_normalizes_wrapped_text() {
    let mut store = store();
    store
        .scan(2, "TUBULAR ADE-\n   NOMA, 4 mm")
        .expect("in range");
    assert_eq!(*store.record(PatientId::clamped(2)), record(0, 1));
}

#[test]
fn test_reset_patient_only_touches_one_record() {
    let mut store = store();
    store.increment(3, Category::Serrated).expect("in range");
    store.increment(4, Category::Adenomatous).expect("in range");
    store.reset_patient(3).expect("in range");
    assert!(store.record(PatientId::clamped(3)).is_zero());
    assert_eq!(*store.record(PatientId::clamped(4)), record(0, 1));
}

#[test]
fn test_reset_all_zeroes_cohort_and_cursor() {
    let mut store = store();
    store.increment(50, Category::Serrated).expect("in range");
    store.set_current(120).expect("in range");
    store.reset_all();
    assert_eq!(store.current(), PatientId::first());
    for patient in 1..=MAX_PATIENTS {
        let id = PatientId::new(patient).expect("in range");
        assert_eq!(*store.record(id), record(0, 0));
    }
}

#[test]
fn test_navigation_wraps_full_cycle() {
    let mut store = store();
    for _ in 0..MAX_PATIENTS {
        store.navigate_next();
    }
    assert_eq!(store.current(), PatientId::first());
    for _ in 0..MAX_PATIENTS {
        store.navigate_previous();
    }
    assert_eq!(store.current(), PatientId::first());
    assert_eq!(store.navigate_previous(), PatientId::last());
    assert_eq!(store.navigate_next(), PatientId::first());
}

#[test]
fn test_out_of_range_ignored_by_default() {
    let mut store = store();
    let outcome = store.increment(0, Category::Serrated).expect("ignored");
    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::OutOfRange(0)));
    let outcome = store.scan(MAX_PATIENTS + 1, "tubular adenoma").expect("ignored");
    assert!(!outcome.is_applied());
    assert_eq!(store.state().cohort.totals(), CategoryCounts::default());
}

#[test]
fn test_out_of_range_rejected_when_configured() {
    let options = SessionOptions::new().with_out_of_range(OutOfRangePolicy::Reject);
    let mut store = SessionStore::from_options(options).expect("builtin patterns");
    assert_eq!(
        store.reset_patient(201),
        Err(SessionError::OutOfRange(201))
    );
    assert_eq!(
        store.increment_one(0, "serrated"),
        Err(SessionError::OutOfRange(0))
    );
}

#[test]
fn test_set_current_clamps_by_default() {
    let mut store = store();
    assert_eq!(store.set_current(0), Ok(PatientId::first()));
    assert_eq!(store.set_current(5_000), Ok(PatientId::last()));
    assert_eq!(store.set_current(17).map(PatientId::get), Ok(17));
}

#[test]
fn test_set_current_rejects_when_configured() {
    let options = SessionOptions::new().with_cursor(CursorPolicy::Reject);
    let mut store = SessionStore::from_options(options).expect("builtin patterns");
    store.set_current(9).expect("in range");
    assert_eq!(store.set_current(201), Err(SessionError::OutOfRange(201)));
    assert_eq!(store.current().get(), 9);
}

#[test]
fn test_remote_cohort_replaces_records_but_not_cursor() {
    let mut store = store();
    store.set_current(3).expect("in range");
    let mut cohort = Cohort::new();
    cohort.get_mut(PatientId::clamped(3)).add(Category::Serrated, 6);
    store
        .apply_remote(RemoteUpdate::Cohort(cohort.snapshot()))
        .expect("complete snapshot");
    assert_eq!(store.current().get(), 3);
    assert_eq!(*store.current_record(), record(6, 0));
}

#[test]
fn test_remote_cohort_must_be_complete() {
    let mut store = store();
    store.increment(1, Category::Adenomatous).expect("in range");
    let mut snapshot = Cohort::new().snapshot();
    snapshot.patients.truncate(10);
    let result = store.apply_remote(RemoteUpdate::Cohort(snapshot));
    assert!(matches!(result, Err(SessionError::InvalidCohort(_))));
    assert_eq!(*store.record(PatientId::first()), record(0, 1));
}

#[test]
fn test_remote_cursor_uses_cursor_policy() {
    let mut store = store();
    store
        .apply_remote(RemoteUpdate::Cursor(999))
        .expect("clamped");
    assert_eq!(store.current(), PatientId::last());
}

#[test]
fn test_listeners_refresh_after_each_operation() {
    let seen: Rc<RefCell<Vec<(u32, u32)>>> = Rc::default();
    let mut store = store();
    let sink = Rc::clone(&seen);
    store.subscribe(move |state: &SessionState| {
        sink.borrow_mut()
            .push((state.current.get(), state.current_record().total()));
    });

    store.increment(1, Category::Serrated).expect("in range");
    store.navigate_next();
    store.increment_one(2, "bogus").expect("ignored");
    store.reset_all();
    store.refresh();

    assert_eq!(*seen.borrow(), vec![(1, 1), (2, 0), (1, 0), (1, 0)]);
}

#[test]
fn test_ignored_operation_does_not_refresh_or_save() {
    let refreshes = Rc::new(RefCell::new(0usize));
    let saved = Rc::new(RefCell::new(Vec::new()));
    let mut store = store().with_save_hook(RecordingSave(Rc::clone(&saved)));
    let sink = Rc::clone(&refreshes);
    store.subscribe(move |_: &SessionState| *sink.borrow_mut() += 1);

    let outcome = store.scan(0, "tubular adenoma").expect("ignored");
    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::OutOfRange(0)));
    let outcome = store
        .increment(MAX_PATIENTS + 1, Category::Serrated)
        .expect("ignored");
    assert!(!outcome.is_applied());
    assert!(!store.reset_patient(0).expect("ignored").is_applied());
    let outcome = store.increment_one(1, "hyperplastic").expect("ignored");
    assert!(!outcome.is_applied());

    assert_eq!(*refreshes.borrow(), 0);
    assert!(saved.borrow().is_empty());
}

#[test]
fn test_rejected_operation_does_not_refresh() {
    let count = Rc::new(RefCell::new(0usize));
    let options = SessionOptions::strict();
    let mut store = SessionStore::from_options(options).expect("builtin patterns");
    let sink = Rc::clone(&count);
    store.subscribe(move |_: &SessionState| *sink.borrow_mut() += 1);
    assert!(store.set_current(0).is_err());
    assert!(store.scan(0, "tubular adenoma").is_err());
    assert_eq!(*count.borrow(), 0);
}

struct RecordingSave(Rc<RefCell<Vec<u32>>>);

impl SaveHook for RecordingSave {
    fn save(&mut self, state: &SessionState) {
        self.0.borrow_mut().push(state.cohort.totals().total());
    }
}

#[test]
fn test_save_hook_sees_every_mutation() {
    let saved = Rc::new(RefCell::new(Vec::new()));
    let mut store = store().with_save_hook(RecordingSave(Rc::clone(&saved)));
    store.increment(1, Category::Serrated).expect("in range");
    store.increment(2, Category::Adenomatous).expect("in range");
    store.reset_patient(1).expect("in range");
    assert_eq!(*saved.borrow(), vec![1, 2, 1]);
}

#[derive(Debug, Clone)]
enum Op {
    Scan(u32, &'static str),
    Increment(u32, Category),
    IncrementRaw(u32, &'static str),
    Reset(u32),
    ResetAll,
    Next,
    Previous,
    SetCurrent(u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let patient = 0u32..=MAX_PATIENTS + 5;
    let text = prop::sample::select(vec![
        "",
        "tubular adenoma",
        "sessile serrated lesion and villous adenoma",
        "traditional serrated adenoma x2, tubular adenomas",
    ]);
    let category = prop::sample::select(vec![Category::Serrated, Category::Adenomatous]);
    let raw = prop::sample::select(vec!["serrated", "adenomatous", "hyperplastic"]);
    prop_oneof![
        (patient.clone(), text).prop_map(|(p, t)| Op::Scan(p, t)),
        (patient.clone(), category).prop_map(|(p, c)| Op::Increment(p, c)),
        (patient.clone(), raw).prop_map(|(p, r)| Op::IncrementRaw(p, r)),
        patient.clone().prop_map(Op::Reset),
        Just(Op::ResetAll),
        Just(Op::Next),
        Just(Op::Previous),
        patient.prop_map(Op::SetCurrent),
    ]
}

proptest! {
    #[test]
    fn total_invariant_holds(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut store = store();
        for op in ops {
            match op {
                Op::Scan(p, t) => { store.scan(p, t).expect("ignore policy"); }
                Op::Increment(p, c) => { store.increment(p, c).expect("ignore policy"); }
                Op::IncrementRaw(p, r) => { store.increment_one(p, r).expect("ignore policy"); }
                Op::Reset(p) => { store.reset_patient(p).expect("ignore policy"); }
                Op::ResetAll => store.reset_all(),
                Op::Next => { store.navigate_next(); }
                Op::Previous => { store.navigate_previous(); }
                Op::SetCurrent(p) => { store.set_current(p).expect("clamp policy"); }
            }
            let current = store.current().get();
            prop_assert!((1..=MAX_PATIENTS).contains(&current));
            for (_, record) in store.state().cohort.iter() {
                prop_assert_eq!(record.total(), record.serrated() + record.adenomatous());
            }
        }
    }
}
