// tubundle/src/source_file.rs
//! Named text buffers handed in by the caller, plus the language/kind tags
//! the bundler classifies them with.
//!
//! A `SourceFile` is read-only for the whole bundle call: the bundler borrows
//! it, never rewrites it in place.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::util::basename;

/// One `{name, content}` record. `name` is the path exactly as supplied.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { name: name.into(), content: content.into() }
    }

    /// Leaf component of `name` (after the last `/` or `\`).
    pub fn basename(&self) -> &str {
        basename(&self.name)
    }

    pub fn kind(&self, lang: Lang) -> FileKind {
        FileKind::classify(&self.name, lang)
    }
}

/* ================================== Language ================================== */

/// Target language of a bundle. Request strings are normalized first
/// (see `util::normalize_lang`), then mapped here.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    C,
    Cpp,
}

impl Lang {
    /// Map an already-normalized language tag. Anything but `c`/`cpp` is not bundled.
    pub fn from_normalized(s: &str) -> Option<Self> {
        match s {
            "c" => Some(Lang::C),
            "cpp" => Some(Lang::Cpp),
            _ => None,
        }
    }

    /// Name of the synthetic single-unit output.
    pub fn bundle_name(self) -> &'static str {
        match self {
            Lang::C => "main.c",
            Lang::Cpp => "main.cpp",
        }
    }

    /// Extensions (lowercase, no dot) that count as compilable sources.
    pub fn source_exts(self) -> &'static [&'static str] {
        match self {
            Lang::C => &["c"],
            Lang::Cpp => &["cpp", "cc", "cxx"],
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lang::C => "c",
            Lang::Cpp => "cpp",
        })
    }
}

/* ================================== File kind ================================== */

pub const HEADER_EXTS: &[&str] = &["h", "hh", "hpp", "hxx"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Header,
    Source,
    Other,
}

impl FileKind {
    /// Extension-based, case-insensitive. Headers are never sources, and a
    /// `.c` file is `Other` in a C++ bundle (and vice versa).
    pub fn classify(name: &str, lang: Lang) -> Self {
        let ext = match extension(name) {
            Some(e) => e.to_ascii_lowercase(),
            None => return FileKind::Other,
        };
        if HEADER_EXTS.contains(&ext.as_str()) {
            FileKind::Header
        } else if lang.source_exts().contains(&ext.as_str()) {
            FileKind::Source
        } else {
            FileKind::Other
        }
    }
}

fn extension(name: &str) -> Option<&str> {
    let leaf = basename(name);
    match leaf.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/* ================================== Tests ================================== */
