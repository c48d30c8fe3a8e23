// tubundle/src/report.rs

use serde_json::{json, Value};
use sha1::{Digest, Sha1};

use crate::{
    bundle::Bundle,
    source_file::SourceFile,
    util::{line_count, now_timestamp},
};


/// Structured summary of one bundle call.
/// - Input/output sizes and a SHA-1 of the produced unit
/// - Entry selection and include outcomes (inlined, skipped, unresolved)
pub fn bundle_report(bundle: &Bundle, inputs: &[SourceFile]) -> Value {
    let out = &bundle.output;
    let input_bytes: usize = inputs.iter().map(|f| f.content.len()).sum();
    let stats = &bundle.stats;

    // Summary up top for quick UX
    let summary = json!({
        "inputs": inputs.len(),
        "input_bytes": input_bytes,
        "inlined": stats.expansion.inlined.len(),
        "duplicates": stats.expansion.duplicates.len(),
        "recursive": stats.expansion.recursive.len(),
        "depth_limited": stats.expansion.depth_limited.len(),
        "unresolved": stats.expansion.unresolved.len(),
    });

    json!({
        "version": 1,
        "generated_at": now_timestamp(),
        "summary": summary,
        "output": {
            "name": out.name,
            "bytes": out.content.len(),
            "lines": line_count(&out.content),
            "sha1": sha1_hex(&out.content),
        },
        "stats": stats,
    })
}

fn sha1_hex(s: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}
