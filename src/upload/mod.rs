//! Upload-pipeline integration.
//!
//! Bridges a host's file-upload hook to the sanitizer: the host hands over
//! a file path, the filter rewrites it in place or rejects the upload.

mod filter;

pub use filter::{FilterOutcome, SVG_MIME, SvgUploadFilter, Uploader, resolve_mime, svg_extension};
