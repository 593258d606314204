//! svgward — SVG upload sanitization for CMS media pipelines.
//!
//! A host's upload hook hands over a file path; svgward validates that the
//! content is structurally SVG, sanitizes it against element/attribute
//! allow-lists and a denylist of dangerous patterns, and either rewrites the
//! file in place with fully-conforming markup or rejects the upload. It
//! never lets a partially-sanitized or unsanitized file through.

pub mod config;
pub mod dom;
pub mod error;
pub mod policy;
pub mod sanitize;
pub mod upload;

pub use config::GuardConfig;
pub use error::{GuardError, GuardResult};
pub use policy::Policy;
pub use sanitize::Sanitizer;
pub use upload::{FilterOutcome, SvgUploadFilter, Uploader};
