//! Built-in term lists for each finding category.
//!
//! Plain phrases are declared as [`Term::Literal`]. Entries that carry
//! matcher syntax on purpose (escaped parentheses around a qualifier, or the
//! lazy wildcard that lets "traditional ... serrated ... adenoma" span other
//! words) are declared as [`Term::Pattern`].

use polyp_model::{Category, PatternSet, Term};

use crate::error::PatternError;

const SERRATED_TERMS: &[Term] = &[
    Term::Literal("traditional serrated adenoma"),
    Term::Literal("sessile serrated adenoma"),
    Term::Literal("sessile serrated polyp"),
    Term::Literal("sessile serrated polyps"),
    Term::Literal("sessile serrated lesion"),
    Term::Literal("sessile serrated lesions"),
    Term::Literal("sessile serrated adenomas"),
    Term::Literal("sessile serrated lesion/polyp"),
    Term::Pattern(r"sessile serrated lesion \(sessile serrated polyp\)"),
    Term::Pattern(r"sessile serrated lesion \(sessile serrated adenoma\)"),
    Term::Pattern(r"Traditional[\s\S]*?Serrated[\s\S]*?Adenoma"),
];

const ADENOMATOUS_TERMS: &[Term] = &[
    Term::Literal("tubular adenoma"),
    Term::Literal("tubular adenomas"),
    Term::Literal("tubulovillous adenoma"),
    Term::Literal("tubular adenomata"),
    Term::Literal("villous adenoma"),
    Term::Pattern(r"tubulovillous adenoma \(ta\)"),
    Term::Literal("villotubular adenoma"),
    Term::Literal("tubular adenomatous"),
    Term::Pattern(r"tubular adenoma \(s\)"),
    Term::Pattern(r"tubular adenoma\(s\)"),
    Term::Literal("tubular adenomas"),
];

pub fn serrated_polyps() -> PatternSet {
    PatternSet::new(Category::Serrated, SERRATED_TERMS.iter().copied())
}

pub fn adenomatous_polyps() -> PatternSet {
    PatternSet::new(Category::Adenomatous, ADENOMATOUS_TERMS.iter().copied())
}

/// One pattern set per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRegistry {
    serrated: PatternSet,
    adenomatous: PatternSet,
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PatternRegistry {
    pub fn builtin() -> Self {
        Self {
            serrated: serrated_polyps(),
            adenomatous: adenomatous_polyps(),
        }
    }

    /// Builds a registry from caller-supplied sets.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::CategoryMismatch`] when a set is passed in the
    /// other category's slot.
    pub fn new(serrated: PatternSet, adenomatous: PatternSet) -> Result<Self, PatternError> {
        for (expected, set) in [
            (Category::Serrated, &serrated),
            (Category::Adenomatous, &adenomatous),
        ] {
            if set.category() != expected {
                return Err(PatternError::CategoryMismatch {
                    expected,
                    found: set.category(),
                });
            }
        }
        Ok(Self {
            serrated,
            adenomatous,
        })
    }

    pub fn get(&self, category: Category) -> &PatternSet {
        match category {
            Category::Serrated => &self.serrated,
            Category::Adenomatous => &self.adenomatous,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternSet> + '_ {
        [&self.serrated, &self.adenomatous].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_keep_insertion_order() {
        let serrated = serrated_polyps();
        assert_eq!(serrated.len(), 11);
        assert_eq!(serrated.terms()[0].text(), "traditional serrated adenoma");
        let adenomatous = adenomatous_polyps();
        assert_eq!(adenomatous.len(), 11);
        assert_eq!(adenomatous.terms()[0].text(), "tubular adenoma");
    }

    #[test]
    fn registry_files_sets_by_category() {
        let registry = PatternRegistry::builtin();
        for category in Category::ALL {
            assert_eq!(registry.get(category).category(), category);
        }
        assert_eq!(registry.iter().count(), 2);
    }

    #[test]
    fn registry_rejects_swapped_sets() {
        let result = PatternRegistry::new(adenomatous_polyps(), serrated_polyps());
        assert!(matches!(
            result,
            Err(PatternError::CategoryMismatch {
                expected: Category::Serrated,
                found: Category::Adenomatous,
            })
        ));
    }
}
