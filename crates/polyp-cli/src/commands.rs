use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use polyp_cli::config::Config;
use polyp_cli::panel::ConsolePanel;
use polyp_cli::script::{FilePage, ScriptReport, SessionRunner};
use polyp_cli::summary::{
    CountsExport, SessionExport, apply_table_style, counts_table, print_summary,
};
use polyp_core::{Classifier, Dispatcher, PatternRegistry, SessionStore, normalize};

use crate::cli::{CountArgs, SessionArgs};

pub fn run_count(args: &CountArgs, config: &Config) -> Result<()> {
    let text = read_report(&args.report)?;
    let classifier = Classifier::new(&PatternRegistry::builtin(), config.session.terms)
        .context("compile detection terms")?;
    let counts = classifier.classify(&normalize(&text));
    info!(
        serrated = counts.serrated,
        adenomatous = counts.adenomatous,
        "report counted"
    );
    if args.json {
        let export = CountsExport::from(counts);
        println!(
            "{}",
            serde_json::to_string_pretty(&export).context("serialize counts")?
        );
    } else {
        println!("{}", counts_table(counts));
    }
    Ok(())
}

pub fn run_patterns() -> Result<()> {
    let registry = PatternRegistry::builtin();
    let mut table = Table::new();
    table.set_header(vec!["Category", "Kind", "Term"]);
    apply_table_style(&mut table);
    for set in registry.iter() {
        for term in set.terms() {
            table.add_row(vec![set.category().label(), term.kind(), term.text()]);
        }
    }
    println!("{table}");
    Ok(())
}

pub fn run_session(args: &SessionArgs, config: &Config) -> Result<ScriptReport> {
    let span = info_span!("session");
    let _guard = span.enter();
    let mut store =
        SessionStore::from_options(config.session).context("compile detection terms")?;
    // JSON output owns stdout.
    if !(args.quiet_panel || args.json) {
        store.subscribe(ConsolePanel::new(io::stdout()));
    }
    let dispatcher = Dispatcher::new(config.keys.to_bindings());
    let mut runner = SessionRunner::new(dispatcher, FilePage::new(args.page.clone()));
    store.refresh();

    let report = match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("open script {}", path.display()))?;
            runner.run(&mut store, BufReader::new(file))?
        }
        None => runner.run(&mut store, io::stdin().lock())?,
    };
    info!(
        commands = report.commands,
        errors = report.errors.len(),
        "session finished"
    );

    if args.json {
        let export = SessionExport::new(store.state());
        println!(
            "{}",
            serde_json::to_string_pretty(&export).context("serialize session")?
        );
    } else {
        print_summary(store.state());
    }
    for error in &report.errors {
        eprintln!("error: {error}");
    }
    Ok(report)
}

fn read_report(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("read report from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("read report {}", path.display()))
}
