// tubundle/src/file_index.rs
//! Dual-keyed lookup over one bundle call's file set.
//!
//! `#include "sub/foo.h"` and `#include "foo.h"` should both find `sub/foo.h`
//! even when the caller's names don't mirror a real directory tree, so every
//! file is indexed by its full name and by its basename.

use std::collections::HashMap;

use crate::{source_file::SourceFile, util::basename};

/// Borrowed index; lives exactly as long as the bundle call's input slice.
#[derive(Debug, Default)]
pub struct FileIndex<'a> {
    by_exact: HashMap<&'a str, &'a SourceFile>,
    by_basename: HashMap<&'a str, &'a SourceFile>,
}

impl<'a> FileIndex<'a> {
    /// Later files win on collisions (same full name, or same leaf in different dirs).
    pub fn build(files: &'a [SourceFile]) -> Self {
        let mut by_exact = HashMap::with_capacity(files.len());
        let mut by_basename = HashMap::with_capacity(files.len());
        for f in files {
            by_exact.insert(f.name.as_str(), f);
            by_basename.insert(f.basename(), f);
        }
        Self { by_exact, by_basename }
    }

    /// Exact name first, then basename of `include_spec` against file basenames.
    pub fn lookup(&self, include_spec: &str) -> Option<&'a SourceFile> {
        self.by_exact
            .get(include_spec)
            .or_else(|| self.by_basename.get(basename(include_spec)))
            .copied()
    }

    /// Distinct full names indexed.
    pub(crate) fn len(&self) -> usize {
        self.by_exact.len()
    }
}
