//! End-to-end sessions driven by script input and config files.

use std::fs;
use std::path::Path;

use polyp_cli::config::Config;
use polyp_cli::script::{FilePage, SessionRunner};
use polyp_core::{Dispatcher, SessionStore};
use polyp_model::{PatientId, PatientRecord};
use tempfile::TempDir;

const REPORT: &str = "FINAL DIAGNOSIS:\nTubular adenoma x2.\nSessile ser-\n  rated lesion.";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

fn session(config: &Config) -> (SessionStore, SessionRunner) {
    let store = SessionStore::from_options(config.session).expect("builtin patterns");
    let runner = SessionRunner::new(
        Dispatcher::new(config.keys.to_bindings()),
        FilePage::default(),
    );
    (store, runner)
}

#[test]
fn script_scans_page_and_marks_findings() {
    let dir = TempDir::new().expect("tempdir");
    let page = write(dir.path(), "report.txt", REPORT);
    let script = format!(
        "# patient 1\npage {}\nF3\n\nF12\nF2\nF2\nshift+F12\n",
        page.display()
    );
    let (mut store, mut runner) = session(&Config::default());

    let report = runner.run(&mut store, script.as_bytes()).expect("run");

    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert_eq!(report.commands, 6);
    assert_eq!(runner.page().path(), Some(page.as_path()));
    assert_eq!(store.current(), PatientId::first());
    assert_eq!(*store.record(PatientId::first()), PatientRecord::new(1, 1));
    assert_eq!(*store.record(PatientId::clamped(2)), PatientRecord::new(2, 0));
}

#[test]
fn bad_lines_are_reported_and_skipped() {
    let (mut store, mut runner) = session(&Config::default());
    let script = "F2\nbogus\nalt+F2\ngoto seven\nF2\n";

    let report = runner.run(&mut store, script.as_bytes()).expect("run");

    assert_eq!(report.commands, 2);
    assert_eq!(report.errors.len(), 3);
    assert!(report.errors[0].starts_with("line 2:"));
    assert_eq!(store.current_record().serrated(), 2);
}

#[test]
fn goto_clamps_by_default() {
    let (mut store, mut runner) = session(&Config::default());

    let report = runner.run(&mut store, "goto 250\n".as_bytes()).expect("run");

    assert!(report.errors.is_empty());
    assert_eq!(store.current(), PatientId::last());
}

#[test]
fn config_file_drives_policies_and_keys() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        dir.path(),
        "polyp.toml",
        r#"
[session]
cursor = "reject"

[keys]
next_patient = ["n"]
mark_serrated = ["s"]
"#,
    );
    let config = Config::load(Some(&path)).expect("load config");
    let (mut store, mut runner) = session(&config);

    let report = runner
        .run(&mut store, "s\nn\ns\ngoto 0\nF12\n".as_bytes())
        .expect("run");

    // goto 0 is rejected and F12 is no longer bound.
    assert_eq!(report.errors.len(), 2);
    assert_eq!(store.current(), PatientId::clamped(2));
    assert_eq!(store.record(PatientId::first()).serrated(), 1);
    assert_eq!(store.current_record().serrated(), 1);
}

#[test]
fn ctrl_reset_clears_cohort_and_rewinds() {
    let (mut store, mut runner) = session(&Config::default());

    let report = runner
        .run(&mut store, "F1\nF12\nF1\nF1\nctrl+F4\n".as_bytes())
        .expect("run");

    assert!(report.errors.is_empty());
    assert_eq!(store.current(), PatientId::first());
    assert_eq!(store.state().cohort.totals().total(), 0);
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
}
