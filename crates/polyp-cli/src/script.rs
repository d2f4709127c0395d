//! Line-oriented session input.
//!
//! Each line is a key chord (`F12`, `shift+F12`, `ctrl+F4`) or one of the
//! directives below. Blank lines and `#` comments are skipped.
//!
//! - `page <FILE>`: make FILE the visible page for later scans
//! - `goto <N>`: move the cursor as a remote update would
//! - `show`: redraw the panel

use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polyp_core::{Dispatcher, PageSource, RemoteUpdate, SessionStore};
use tracing::{trace, warn};

use crate::logging::redact_value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Chord(String),
    Page(PathBuf),
    Goto(u32),
    Show,
}

/// Parse one input line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Directive>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };
    let directive = match word.to_ascii_lowercase().as_str() {
        "page" if !rest.is_empty() => Directive::Page(PathBuf::from(rest)),
        "page" => anyhow::bail!("page directive needs a file"),
        "goto" => {
            let patient = rest
                .parse()
                .with_context(|| format!("invalid patient number {rest:?}"))?;
            Directive::Goto(patient)
        }
        "show" if rest.is_empty() => Directive::Show,
        _ => Directive::Chord(trimmed.to_string()),
    };
    Ok(Some(directive))
}

/// Page backed by a report file, re-read on every scan.
#[derive(Debug, Clone, Default)]
pub struct FilePage {
    path: Option<PathBuf>,
}

impl FilePage {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn set(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl PageSource for FilePage {
    fn visible_text(&self) -> String {
        let Some(path) = &self.path else {
            warn!("no page loaded, scanning empty text");
            return String::new();
        };
        match fs::read_to_string(path) {
            Ok(text) => {
                trace!(path = %path.display(), text = redact_value(&text), "page read");
                text
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to read page, scanning empty text");
                String::new()
            }
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    pub commands: usize,
    pub errors: Vec<String>,
}

/// Runs input lines against a store, one event at a time.
pub struct SessionRunner {
    dispatcher: Dispatcher,
    page: FilePage,
}

impl SessionRunner {
    pub fn new(dispatcher: Dispatcher, page: FilePage) -> Self {
        Self { dispatcher, page }
    }

    pub fn page(&self) -> &FilePage {
        &self.page
    }

    /// Apply one line. Errors are returned for the caller to report; the
    /// store is left as it was before the failing line.
    pub fn run_line(&mut self, store: &mut SessionStore, line: &str) -> Result<bool> {
        let Some(directive) = parse_line(line)? else {
            return Ok(false);
        };
        match directive {
            Directive::Chord(chord) => {
                self.dispatcher
                    .dispatch_chord(store, &chord, &self.page)
                    .with_context(|| format!("key {chord:?}"))?;
            }
            Directive::Page(path) => self.page.set(path),
            Directive::Goto(patient) => store
                .apply_remote(RemoteUpdate::Cursor(patient))
                .with_context(|| format!("goto {patient}"))?,
            Directive::Show => store.refresh(),
        }
        Ok(true)
    }

    /// Apply every line from `input`, collecting per-line errors.
    pub fn run<R: BufRead>(&mut self, store: &mut SessionStore, input: R) -> Result<ScriptReport> {
        let mut report = ScriptReport::default();
        for (index, line) in input.lines().enumerate() {
            let line = line.context("read session input")?;
            match self.run_line(store, &line) {
                Ok(true) => report.commands += 1,
                Ok(false) => {}
                Err(error) => {
                    let message = format!("line {}: {error:#}", index + 1);
                    warn!("{message}");
                    report.errors.push(message);
                }
            }
        }
        Ok(report)
    }
}
