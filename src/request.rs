// tubundle/src/request.rs
//! Run-request boundary: the JSON a client posts, and the payload forwarded to
//! the remote single-file runner.
//!
//! Bundling only kicks in for C/C++ with more than one file; everything else is
//! forwarded untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    bundle::{bundle_to_single_unit, Bundle, BundleOptions, BundleStats},
    source_file::{Lang, SourceFile},
    util::normalize_lang,
};

pub const DEFAULT_VERSION: &str = "latest";

#[derive(Debug, Error)]
pub enum RequestError {
    /// Not JSON, or `files` is not a list of `{name, content}` records.
    #[error("malformed run request: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Inbound request body.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunRequest {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub stdin: Option<String>,
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

/// Outbound body for the runner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunPayload {
    pub language: String,
    pub version: String,
    pub files: Vec<SourceFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,
}

/// A prepared payload plus bundle stats when bundling ran.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub payload: RunPayload,
    pub stats: Option<BundleStats>,
}

pub fn parse_request(body: &str) -> Result<RunRequest, RequestError> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    Ok(serde_json::from_str(body)?)
}

/// Normalize the language, default the version, and bundle when it applies.
pub fn prepare_payload(req: RunRequest, opts: &BundleOptions) -> Prepared {
    let language = normalize_lang(req.language.as_deref().unwrap_or(""));
    let version = req.version.unwrap_or_else(|| DEFAULT_VERSION.to_string());

    let (files, stats) = match Lang::from_normalized(&language) {
        Some(lang) if req.files.len() > 1 => {
            let Bundle { output, stats } = bundle_to_single_unit(lang, &req.files, opts);
            (vec![output], Some(stats))
        }
        _ => {
            debug!(language = %language, files = req.files.len(), "passing files through unbundled");
            (req.files, None)
        }
    };

    Prepared {
        payload: RunPayload { language, version, files, stdin: req.stdin },
        stats,
    }
}
