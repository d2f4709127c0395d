//! Canonicalization of raw report text before matching.

use std::sync::LazyLock;

use regex::Regex;

/// A hyphen at a line wrap: `-`, optional whitespace, newline, optional whitespace.
static LINE_WRAP_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\s*\n\s*").expect("Invalid line-wrap regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Normalize extracted page text for matching.
///
/// Steps, in order:
/// 1. Rejoin words split by a line-wrap hyphen.
/// 2. Collapse whitespace runs to a single space.
/// 3. Drop characters outside printable ASCII (`0x20..=0x7E`).
/// 4. Lower-case.
/// 5. Trim.
pub fn normalize(raw: &str) -> String {
    let joined = LINE_WRAP_HYPHEN.replace_all(raw, "");
    let collapsed = WHITESPACE_RUN.replace_all(&joined, " ");
    let printable: String = collapsed
        .chars()
        .filter(|ch| matches!(ch, ' '..='~'))
        .map(|ch| ch.to_ascii_lowercase())
        .collect();
    printable.trim().to_string()
}
