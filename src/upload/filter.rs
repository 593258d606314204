//! Upload filter.
//!
//! Per-upload state machine: `received → validated → sanitized → written`,
//! with any stage able to transition to `rejected` (terminal). One upload is
//! processed to completion before the call returns; there is no queuing and
//! no shared mutable state.

use std::path::Path;

use serde::Serialize;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::GuardConfig;
use crate::error::{GuardError, GuardResult};
use crate::sanitize::{Sanitizer, validate};

/// MIME type served for SVG uploads.
pub const SVG_MIME: &str = "image/svg+xml";

/// SVG file extension of a filename, if it has one.
pub fn svg_extension(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename).extension()?.to_str()?;
    if ext.eq_ignore_ascii_case("svg") {
        Some("svg")
    } else if ext.eq_ignore_ascii_case("svgz") {
        Some("svgz")
    } else {
        None
    }
}

/// Resolve the MIME type for a filename the host's own detection may have
/// misidentified. Only answers for SVG extensions.
pub fn resolve_mime(filename: &str) -> Option<&'static str> {
    svg_extension(filename).map(|_| SVG_MIME)
}

/// Capabilities of the user performing the upload. Read-only input supplied
/// by the host's permission layer.
#[derive(Debug, Clone, Copy)]
pub struct Uploader {
    pub can_upload_files: bool,
    pub is_admin: bool,
}

/// Result of running the filter over one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterOutcome {
    /// Not an SVG upload; the file was not touched.
    NotApplicable,
    /// The file was sanitized and rewritten in place.
    Sanitized { bytes_written: usize },
}

/// Bridge between the host's upload hook and the sanitizer.
///
/// Owns no state beyond its configuration; each call handles exactly the
/// one file it is given.
#[derive(Debug, Clone, Default)]
pub struct SvgUploadFilter {
    config: GuardConfig,
    sanitizer: Sanitizer,
}

impl SvgUploadFilter {
    /// Create a filter with the given configuration and the default policy.
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            sanitizer: Sanitizer::default(),
        }
    }

    /// Create a filter with a custom sanitizer.
    pub fn with_sanitizer(config: GuardConfig, sanitizer: Sanitizer) -> Self {
        Self { config, sanitizer }
    }

    /// Run the filter over an uploaded file.
    ///
    /// On success the file at `path` holds sanitized content. On any error
    /// the file is untouched and the upload must be refused by the caller —
    /// the original bytes are never safe to serve.
    pub async fn filter(&self, path: &Path, uploader: &Uploader) -> GuardResult<FilterOutcome> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        let Some(ext) = svg_extension(filename) else {
            return Ok(FilterOutcome::NotApplicable);
        };

        debug!(path = %path.display(), ext, "svg upload received");

        if !self.config.enabled {
            warn!(path = %path.display(), "svg upload rejected: support disabled");
            return Err(GuardError::NotPermitted(
                "SVG uploads are disabled on this site".to_string(),
            ));
        }
        if !uploader.can_upload_files {
            return Err(GuardError::NotPermitted(
                "you are not allowed to upload files".to_string(),
            ));
        }
        if self.config.admin_only && !uploader.is_admin {
            return Err(GuardError::NotPermitted(
                "SVG uploads are restricted to administrators".to_string(),
            ));
        }

        // Size gate runs on metadata before the file is buffered, so an
        // oversize upload never gets read into memory. The post-read check
        // below guards against the file growing between the two calls.
        let reported = fs::metadata(path)
            .await
            .map_err(GuardError::UnreadableFile)?
            .len();
        if reported > self.config.max_file_size as u64 {
            return Err(GuardError::TooLarge {
                size: usize::try_from(reported).unwrap_or(usize::MAX),
                max: self.config.max_file_size,
            });
        }

        let data = fs::read(path).await.map_err(GuardError::UnreadableFile)?;

        if data.len() > self.config.max_file_size {
            return Err(GuardError::TooLarge {
                size: data.len(),
                max: self.config.max_file_size,
            });
        }

        // Content sniffing: a candidate whose magic bytes identify a known
        // binary format is not SVG, whatever its extension claims. Text
        // matches are ignored here because the XML prologue itself sniffs
        // as text/xml; the parser decides whether text is actually SVG.
        if let Some(kind) = infer::get(&data) {
            if kind.matcher_type() != infer::MatcherType::Text {
                warn!(
                    path = %path.display(),
                    detected = kind.mime_type(),
                    "svg upload rejected: masquerading content"
                );
                let message = if ext == "svgz" && kind.mime_type() == "application/gzip" {
                    "compressed svgz payloads are not supported; upload plain SVG".to_string()
                } else {
                    format!("file content is {}, not SVG", kind.mime_type())
                };
                return Err(GuardError::InvalidMarkup(message));
            }
        }

        let text = std::str::from_utf8(&data)
            .map_err(|_| GuardError::InvalidMarkup("file is not valid UTF-8".to_string()))?;

        // Stage: validated.
        validate::parse_document(text)?;
        debug!(path = %path.display(), "svg upload validated");

        // Stage: sanitized.
        let output = self.sanitizer.sanitize(text)?;
        debug!(path = %path.display(), "svg upload sanitized");

        // Stage: written.
        fs::write(path, output.as_bytes())
            .await
            .map_err(GuardError::WriteFailure)?;

        info!(
            path = %path.display(),
            bytes = output.len(),
            "svg upload sanitized and rewritten in place"
        );

        Ok(FilterOutcome::Sanitized {
            bytes_written: output.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_detection() {
        assert_eq!(svg_extension("logo.svg"), Some("svg"));
        assert_eq!(svg_extension("logo.SVG"), Some("svg"));
        assert_eq!(svg_extension("logo.svgz"), Some("svgz"));
        assert_eq!(svg_extension("logo.png"), None);
        assert_eq!(svg_extension("svg"), None);
        assert_eq!(svg_extension("archive.svg.zip"), None);
    }

    #[test]
    fn mime_resolution() {
        assert_eq!(resolve_mime("icon.svg"), Some(SVG_MIME));
        assert_eq!(resolve_mime("icon.svgz"), Some(SVG_MIME));
        assert_eq!(resolve_mime("icon.jpg"), None);
    }
}
