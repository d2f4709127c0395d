//! Match terms and the per-category sets they belong to.

use std::fmt;

use serde::Serialize;

use crate::Category;

/// A single detection term.
///
/// The kind is declared where the term is written so that the counter never
/// has to guess whether a backslash or parenthesis is meant literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Term {
    /// Plain phrase, matched verbatim.
    Literal(&'static str),
    /// Regex fragment with intentional syntax (groups, escapes, wildcards).
    Pattern(&'static str),
}

impl Term {
    pub fn text(&self) -> &'static str {
        match self {
            Term::Literal(text) | Term::Pattern(text) => text,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Term::Literal(_) => "literal",
            Term::Pattern(_) => "pattern",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Ordered, immutable term list for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    category: Category,
    terms: Vec<Term>,
}

impl PatternSet {
    pub fn new(category: Category, terms: impl IntoIterator<Item = Term>) -> Self {
        Self {
            category,
            terms: terms.into_iter().collect(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
