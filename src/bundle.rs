// tubundle/src/bundle.rs
//! Bundle assembler: many C/C++ files in, one translation unit out.
//!
//! Secondary sources are expanded first (input order), the entry file last, all
//! through one shared `ExpansionState` so a header reachable from several
//! sources is inlined only at its first occurrence. Headers are never emitted
//! on their own; they arrive through the sources that include them.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    entry::{select_entry, EntryReason},
    expand::{expand_includes, ExpansionContext, ExpansionState, ExpansionStats, DEFAULT_MAX_DEPTH},
    file_index::FileIndex,
    source_file::{FileKind, Lang, SourceFile},
    util::{line_directive, with_trailing_newline},
};

/// Knobs for one bundle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleOptions {
    pub max_depth: usize,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

/// Where the entry came from and what the expander did.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BundleStats {
    pub entry: Option<String>,
    pub entry_reason: Option<EntryReason>,
    pub secondary: Vec<String>,
    /// No sources for the language: every input was concatenated verbatim.
    pub headers_only: bool,
    #[serde(flatten)]
    pub expansion: ExpansionStats,
}

/// Result of one bundle call: a single synthetic file.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub output: SourceFile,
    pub stats: BundleStats,
}

impl Bundle {
    /// The single-element file list forwarded to the runner.
    pub fn into_files(self) -> Vec<SourceFile> {
        vec![self.output]
    }
}

/// Bundle `files` into one `main.c` / `main.cpp`. Never fails.
pub fn bundle_to_single_unit(lang: Lang, files: &[SourceFile], opts: &BundleOptions) -> Bundle {
    let bundled_name = lang.bundle_name();
    let sources: Vec<&SourceFile> = files
        .iter()
        .filter(|f| f.kind(lang) == FileKind::Source)
        .collect();

    let Some((entry_pos, reason)) = select_entry(&sources) else {
        debug!(lang = %lang, files = files.len(), "no sources; concatenating inputs verbatim");
        return Bundle {
            output: SourceFile::new(bundled_name, concat_verbatim(files)),
            stats: BundleStats { headers_only: true, ..Default::default() },
        };
    };

    let index = FileIndex::build(files);
    let entry = sources[entry_pos];
    let secondary: Vec<&SourceFile> = sources
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != entry_pos)
        .map(|(_, f)| *f)
        .collect();

    let mut state = ExpansionState::new();
    let mut chunks = Vec::with_capacity(sources.len());
    for f in secondary.iter().copied().chain(std::iter::once(entry)) {
        let ctx = ExpansionContext::root(opts.max_depth);
        let expanded = expand_includes(&f.name, &f.content, &index, &ctx, &mut state);
        chunks.push(chunk(&f.name, &expanded));
    }

    let headers_inlined = state.seen_count();
    let stats = BundleStats {
        entry: Some(entry.name.clone()),
        entry_reason: Some(reason),
        secondary: secondary.iter().map(|f| f.name.clone()).collect(),
        headers_only: false,
        expansion: state.stats,
    };
    info!(
        lang = %lang,
        entry = %entry.name,
        indexed = index.len(),
        sources = sources.len(),
        inlined = headers_inlined,
        duplicates = stats.expansion.duplicates.len(),
        recursive = stats.expansion.recursive.len(),
        unresolved = stats.expansion.unresolved.len(),
        "bundled into {bundled_name}"
    );

    Bundle {
        output: SourceFile::new(bundled_name, chunks.join("\n\n")),
        stats,
    }
}

/// One expanded top-level source pinned to line 1 of its own file.
fn chunk(name: &str, expanded: &str) -> String {
    format!("{}{}", line_directive(1, name), with_trailing_newline(expanded))
}

/// Fallback when nothing compilable is present: `// --- name ---` blocks.
fn concat_verbatim(files: &[SourceFile]) -> String {
    files
        .iter()
        .map(|f| format!("// --- {} ---\n{}\n", f.name, f.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/* =================================== Tests =================================== */
