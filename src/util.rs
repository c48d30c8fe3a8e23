// tubundle/src/util.rs

/// Leaf component of a path, splitting on either `/` or `\`.
/// Caller-supplied names may come from any OS, so both separators count.
pub fn basename(p: &str) -> &str {
    match p.rfind(['/', '\\']) {
        Some(i) => &p[i + 1..],
        None => p,
    }
}

/// Normalize a request language tag: lowercase, C++ aliases folded to `cpp`.
/// Unknown tags pass through lowercased so non-C languages still reach the runner.
pub fn normalize_lang(lang: &str) -> String {
    let l = lang.trim().to_ascii_lowercase();
    match l.as_str() {
        "c++" | "cpp" | "cxx" | "cc" => "cpp".to_string(),
        _ => l,
    }
}

/// RFC3339 (sortable) + a compact stamp string.
pub fn now_timestamp() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    // e.g., 2025-08-10T14:03:59-05:00 | 20250810_140359
    let rfc3339 = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let compact = now.format("%Y%m%d_%H%M%S").to_string();
    format!("{compact} ({rfc3339})")
}

/// `#line N "<name>"` directive. `\` and `"` in the name are escaped, since the
/// compiler reads the name as a string literal.
pub fn line_directive(line: usize, name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch == '\\' || ch == '"' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("#line {line} \"{escaped}\"\n")
}

/// Owned copy of `s` that is guaranteed to end with `\n`.
pub fn with_trailing_newline(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 1);
    out.push_str(s);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Number of lines as an editor would show them (a trailing newline does not open a new line).
pub fn line_count(s: &str) -> usize {
    s.lines().count()
}

/* ================================== Tests ================================== */
