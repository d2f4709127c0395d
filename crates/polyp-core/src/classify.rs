//! Per-category occurrence counting.
//!
//! Each [`PatternSet`] is compiled once into a single case-insensitive
//! alternation, one non-capturing group per term. Counting walks the text left
//! to right and resumes after the end of every match, so matches inside one
//! category never overlap. The two categories are counted independently over
//! the same text: a span that satisfies terms from both sets counts once in
//! each.
//!
//! Alternation is leftmost-first: when several terms match at the same
//! position the earliest-listed one wins. Only the number of matches is
//! observed, so term order does not change the counts produced by the
//! built-in lists.

use std::borrow::Cow;

use polyp_model::{Category, CategoryCounts, PatternSet, Term, TermMode};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::PatternError;
use crate::patterns::PatternRegistry;

/// Matcher source for one term under the given mode.
pub fn term_source(term: &Term, mode: TermMode) -> Cow<'static, str> {
    match (*term, mode) {
        (Term::Pattern(fragment), TermMode::Typed) => Cow::Borrowed(fragment),
        (Term::Pattern(text) | Term::Literal(text), _) => Cow::Owned(regex::escape(text)),
    }
}

fn build(source: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source).case_insensitive(true).build()
}

/// Compile a pattern set into one alternation.
///
/// Every term is compiled on its own first so a failure names the offending
/// term rather than the combined expression. An empty set yields `None`,
/// which counts zero everywhere.
///
/// # Errors
///
/// Returns [`PatternError::InvalidTerm`] for the first term that does not
/// compile.
pub fn compile_set(set: &PatternSet, mode: TermMode) -> Result<Option<Regex>, PatternError> {
    if set.is_empty() {
        return Ok(None);
    }
    let mut branches = Vec::with_capacity(set.len());
    for term in set.terms() {
        let source = term_source(term, mode);
        build(&source).map_err(|source| PatternError::InvalidTerm {
            category: set.category(),
            term: term.text().to_string(),
            source,
        })?;
        branches.push(format!("(?:{source})"));
    }
    let combined = branches.join("|");
    let regex = build(&combined).map_err(|source| PatternError::Combined {
        category: set.category(),
        source,
    })?;
    debug!(
        category = %set.category(),
        terms = set.len(),
        mode = ?mode,
        "compiled pattern set"
    );
    Ok(Some(regex))
}

fn count_matches(regex: Option<&Regex>, text: &str) -> usize {
    regex.map_or(0, |regex| regex.find_iter(text).count())
}

/// Compile `set` and count its occurrences in `text` in one call.
///
/// # Errors
///
/// Propagates compilation failures from [`compile_set`].
pub fn count_with(set: &PatternSet, text: &str, mode: TermMode) -> Result<usize, PatternError> {
    let regex = compile_set(set, mode)?;
    Ok(count_matches(regex.as_ref(), text))
}

/// Compiled matchers for both categories.
#[derive(Debug, Clone)]
pub struct Classifier {
    serrated: Option<Regex>,
    adenomatous: Option<Regex>,
    mode: TermMode,
}

impl Classifier {
    /// Compile every set in `registry`.
    ///
    /// # Errors
    ///
    /// Any term that fails to compile aborts construction; callers treat this
    /// as a startup failure.
    pub fn new(registry: &PatternRegistry, mode: TermMode) -> Result<Self, PatternError> {
        Ok(Self {
            serrated: compile_set(registry.get(Category::Serrated), mode)?,
            adenomatous: compile_set(registry.get(Category::Adenomatous), mode)?,
            mode,
        })
    }

    /// Built-in term lists with typed escaping.
    ///
    /// # Errors
    ///
    /// See [`Classifier::new`].
    pub fn builtin() -> Result<Self, PatternError> {
        Self::new(&PatternRegistry::builtin(), TermMode::Typed)
    }

    pub fn mode(&self) -> TermMode {
        self.mode
    }

    pub fn count_occurrences(&self, text: &str, category: Category) -> usize {
        let regex = match category {
            Category::Serrated => self.serrated.as_ref(),
            Category::Adenomatous => self.adenomatous.as_ref(),
        };
        count_matches(regex, text)
    }

    /// Count both categories over the same text.
    pub fn classify(&self, text: &str) -> CategoryCounts {
        let count = |category| {
            u32::try_from(self.count_occurrences(text, category)).unwrap_or(u32::MAX)
        };
        CategoryCounts {
            serrated: count(Category::Serrated),
            adenomatous: count(Category::Adenomatous),
        }
    }
}
