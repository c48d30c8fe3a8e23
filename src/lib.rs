// src/lib.rs
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod util;
pub mod source_file;

pub mod file_index;
pub mod entry;
pub mod expand;
pub mod bundle;

pub mod request;
pub mod scan;
pub mod report;

pub mod commands;

pub use bundle::{bundle_to_single_unit, Bundle, BundleOptions, BundleStats};
pub use request::{parse_request, prepare_payload, RequestError, RunPayload, RunRequest};
pub use source_file::{Lang, SourceFile};
