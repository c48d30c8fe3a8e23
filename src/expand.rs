// tubundle/src/expand.rs
//! Include expander: inlines quoted `#include "..."` directives against the
//! in-memory file set.
//!
//! Textual and line-anchored on purpose. No macros, no `#if`, no `<...>`
//! includes; every line that isn't a quoted include is copied verbatim.
//!
//! Two pieces of state travel with the recursion:
//! - `ExpansionContext` is per branch (depth + chain of files being expanded),
//!   rebuilt on every descent.
//! - `ExpansionState` is per bundle call (the global `seen` set + stats),
//!   borrowed mutably by every call so a header is inlined at most once
//!   across all top-level sources.

use regex::Regex;
use serde::Serialize;
use std::{borrow::Cow, collections::HashSet, sync::OnceLock};
use tracing::{debug, warn};

use crate::{file_index::FileIndex, util::line_directive};

/// Recursion ceiling for nested includes.
pub const DEFAULT_MAX_DEPTH: usize = 32;

fn include_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^[ \t]*#[ \t]*include[ \t]*"([^"]+)"[^\n]*$"#).expect("valid include regex")
    })
}

fn pragma_once_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?mi)^[ \t]*#[ \t]*pragma[ \t]+once\b[^\n]*$").expect("valid pragma regex")
    })
}

/* ============================== Context & state ============================== */

/// Branch-scoped recursion state.
#[derive(Debug, Clone)]
pub struct ExpansionContext<'a> {
    pub depth: usize,
    /// Keys of the files currently being expanded on this branch, outermost first.
    pub stack: Vec<&'a str>,
    pub max_depth: usize,
}

impl<'a> ExpansionContext<'a> {
    /// Depth 0, empty stack.
    pub fn root(max_depth: usize) -> Self {
        Self { depth: 0, stack: Vec::new(), max_depth }
    }

    /// Copy of this context one level deeper with `key` appended to the stack.
    pub fn descend(&self, key: &'a str) -> Self {
        let mut stack = Vec::with_capacity(self.stack.len() + 1);
        stack.extend_from_slice(&self.stack);
        stack.push(key);
        Self { depth: self.depth + 1, stack, max_depth: self.max_depth }
    }

    pub fn in_stack(&self, key: &str) -> bool {
        self.stack.iter().any(|k| *k == key)
    }
}

impl Default for ExpansionContext<'_> {
    fn default() -> Self {
        Self::root(DEFAULT_MAX_DEPTH)
    }
}

/// What happened to each include while expanding one bundle.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ExpansionStats {
    /// Header keys in the order they were physically inlined.
    pub inlined: Vec<String>,
    pub duplicates: Vec<String>,
    pub recursive: Vec<String>,
    /// Files whose expansion was cut off by the depth ceiling.
    pub depth_limited: Vec<String>,
    /// Include specs that matched nothing in the file set (left verbatim).
    pub unresolved: Vec<String>,
}

/// Bundle-scoped state shared by every expansion in one bundle call.
#[derive(Debug, Default)]
pub struct ExpansionState<'a> {
    seen: HashSet<&'a str>,
    pub stats: ExpansionStats,
}

impl<'a> ExpansionState<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_seen(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Returns `false` if `key` was already marked.
    pub fn mark_seen(&mut self, key: &'a str) -> bool {
        self.seen.insert(key)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/* ================================= Expansion ================================= */

/// Expand quoted includes in `code` (the text of `origin_name`).
///
/// Never fails. Anomalies degrade to verbatim text or a marker comment:
/// - unresolved include: directive kept as-is for the real compiler to report
/// - include already on this branch's stack: `/* skipped recursive include "K" */`
/// - include already inlined anywhere in this bundle: `/* skipped duplicate include "K" */`
/// - depth ceiling exceeded: `/* include depth limit exceeded at ORIGIN */`, then the
///   untouched text re-pinned to line 1 of ORIGIN
///
/// An inlined header is wrapped in begin/end markers with `#line` directives so
/// diagnostics point at the header, then back at the origin line after the directive.
pub fn expand_includes<'a>(
    origin_name: &str,
    code: &str,
    index: &FileIndex<'a>,
    ctx: &ExpansionContext<'a>,
    state: &mut ExpansionState<'a>,
) -> String {
    if ctx.depth > ctx.max_depth {
        warn!(origin = origin_name, depth = ctx.depth, max_depth = ctx.max_depth, "include depth limit exceeded");
        state.stats.depth_limited.push(origin_name.to_string());
        return format!(
            "/* include depth limit exceeded at {origin_name} */\n{}{code}",
            line_directive(1, origin_name)
        );
    }

    let mut out = String::with_capacity(code.len());

    for (idx, raw) in code.split_inclusive('\n').enumerate() {
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let Some(spec) = quoted_include(line) else {
            out.push_str(raw);
            continue;
        };

        let Some(target) = index.lookup(spec) else {
            debug!(origin = origin_name, include = spec, "unresolved include left in place");
            state.stats.unresolved.push(spec.to_string());
            out.push_str(raw);
            continue;
        };
        let key = target.name.as_str();

        if ctx.in_stack(key) {
            debug!(origin = origin_name, include = key, "skipping recursive include");
            state.stats.recursive.push(key.to_string());
            out.push_str(&format!("/* skipped recursive include \"{key}\" */\n"));
            continue;
        }
        if state.is_seen(key) {
            debug!(origin = origin_name, include = key, "skipping duplicate include");
            state.stats.duplicates.push(key.to_string());
            out.push_str(&format!("/* skipped duplicate include \"{key}\" */\n"));
            continue;
        }

        state.mark_seen(key);
        state.stats.inlined.push(key.to_string());
        debug!(origin = origin_name, include = key, depth = ctx.depth + 1, "inlining include");

        let body = strip_pragma_once(&target.content);
        let nested = expand_includes(key, &body, index, &ctx.descend(key), state);

        out.push_str(&format!("// === begin include {key} ===\n"));
        out.push_str(&line_directive(1, key));
        out.push_str(&nested);
        if !nested.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("// === end include {key} ===\n"));
        // Resume at the line after the directive in the origin.
        out.push_str(&line_directive(idx + 2, origin_name));
    }

    out
}

/// The quoted filename if `line` is a line-anchored `#include "..."` directive.
pub fn quoted_include(line: &str) -> Option<&str> {
    include_re()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Blank out every `#pragma once` line (case-insensitive). The line itself stays
/// so positions after it still match the original file under `#line 1`.
pub fn strip_pragma_once(content: &str) -> Cow<'_, str> {
    pragma_once_re().replace_all(content, "")
}

/* =================================== Tests =================================== */
