// tubundle/src/entry.rs
//! Entry-file selection: which source holds `main` and therefore goes last.
//!
//! Preference order:
//! 1. a source whose basename is `main.<ext>` (case-insensitive)
//! 2. the first source whose comment-stripped text declares `int main(`
//! 3. the first source in input order
//!
//! Comment stripping is textual only. A string literal containing `/*` or `//`
//! can hide or expose text; that imprecision is accepted.

use regex::Regex;
use std::sync::OnceLock;

use crate::source_file::SourceFile;

fn main_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^main\.(cpp|cc|cxx|c)$").expect("valid main-name regex"))
}

fn block_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block-comment regex"))
}

fn line_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)//.*$").expect("valid line-comment regex"))
}

fn int_main_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bint\s+main\s*\(").expect("valid int-main regex"))
}

/// Why an entry file was chosen. Surfaced in bundle stats and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryReason {
    FileName,
    MainFunction,
    FirstSource,
}

/// Pick the entry among `sources` (already filtered to the bundle language).
/// Returns its position in `sources`, or `None` when there are no sources.
pub fn select_entry(sources: &[&SourceFile]) -> Option<(usize, EntryReason)> {
    if sources.is_empty() {
        return None;
    }
    if let Some(i) = sources.iter().position(|f| is_main_file_name(&f.name)) {
        return Some((i, EntryReason::FileName));
    }
    if let Some(i) = sources.iter().position(|f| has_main(&f.content)) {
        return Some((i, EntryReason::MainFunction));
    }
    Some((0, EntryReason::FirstSource))
}

/// `main.c`, `Main.CPP`, `src/main.cc` ... judged on the basename.
pub fn is_main_file_name(name: &str) -> bool {
    main_name_re().is_match(crate::util::basename(name))
}

/// True if `code` declares an int-returning `main` outside comments.
pub fn has_main(code: &str) -> bool {
    let no_block = block_comment_re().replace_all(code, "");
    let no_line = line_comment_re().replace_all(&no_block, "");
    int_main_re().is_match(&no_line)
}
