// tubundle/src/scan.rs
//! Load a C/C++ project from disk into `SourceFile`s.
//!
//! The bundler itself never touches the filesystem; this is the CLI's way of
//! building the in-memory file set.

use anyhow::{
    Context,
    Result
};
use ignore::{
    gitignore::GitignoreBuilder,
    WalkBuilder
};
use std::{
    fs,
    io::Read,
    path::{
        Path,
        PathBuf
    },
};
use tracing::debug;

use crate::source_file::{
    FileKind,
    Lang,
    SourceFile
};


const MAX_FILE_BYTES: u64 = 512_000;   // ~0.5 MB hard cap per file
const BINARY_SNIFF_BYTES: usize = 4096;

/// Walk `root` (gitignore-aware) and collect every C/C++ source and header.
/// Names are `/`-separated paths relative to `root`; output is sorted by name.
pub fn collect_project(root: &Path) -> Result<Vec<SourceFile>> {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let mut files = Vec::new();

    // Build ignore matcher
    let mut gitignore = GitignoreBuilder::new(&root);
    if root.join(".gitignore").exists() {
        gitignore.add(root.join(".gitignore"));
    }
    let matcher = gitignore.build()?;

    // Walk with standard filters (hidden dirs, .git, etc.)
    let walker = WalkBuilder::new(&root).standard_filters(true).build();

    for dent in walker.filter_map(|e| e.ok()) {
        let path = dent.path();
        if !path.is_file() {
            continue;
        }

        let rel_path = normalize_rel(&root, path);
        if matcher.matched_path_or_any_parents(path, false).is_ignore() {
            continue;
        }
        if !is_c_family(&rel_path) {
            continue;
        }

        // Metadata / size gate
        let meta = dent.metadata()?;
        let size = meta.len();
        if size == 0 || size > MAX_FILE_BYTES {
            debug!(path = %rel_path, size, "skipping empty or oversized file");
            continue;
        }
        if is_probably_binary(path)? {
            debug!(path = %rel_path, "skipping binary file");
            continue;
        }

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!(path = %rel_path, error = %e, "skipping unreadable or non-UTF-8 file");
                continue;
            }
        };
        files.push(SourceFile::new(rel_path, content));
    }

    // Deterministic output: sort by path
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Read an explicit list of files, naming each by the path as given.
pub fn load_files(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths
        .iter()
        .map(|p| {
            let content = fs::read_to_string(p)
                .with_context(|| format!("read {}", p.display()))?;
            Ok(SourceFile::new(p.to_string_lossy().replace('\\', "/"), content))
        })
        .collect()
}

/// `cpp` if any C++ source is present, else `c`.
pub fn infer_lang(files: &[SourceFile]) -> Lang {
    if files.iter().any(|f| f.kind(Lang::Cpp) == FileKind::Source) {
        Lang::Cpp
    } else {
        Lang::C
    }
}

/* ----------------------------- helpers ----------------------------- */

fn normalize_rel(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

fn is_c_family(name: &str) -> bool {
    FileKind::classify(name, Lang::C) != FileKind::Other
        || FileKind::classify(name, Lang::Cpp) != FileKind::Other
}

fn is_probably_binary(path: &Path) -> Result<bool> {
    let mut f = fs::File::open(path)?;
    let mut buf = [0u8; BINARY_SNIFF_BYTES];
    let n = f.read(&mut buf)?;
    Ok(buf[..n].iter().any(|&b| b == 0))
}
