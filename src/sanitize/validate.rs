//! Structural validation of SVG candidates.

use tracing::debug;

use crate::dom::{ParseMode, Tree};
use crate::error::{GuardError, GuardResult};

/// Quick on-topic check: does the content contain `<svg` at all?
///
/// Runs before any parsing so obviously unrelated content is rejected
/// cheaply.
pub fn is_candidate(content: &[u8]) -> bool {
    content.windows(4).any(|w| w.eq_ignore_ascii_case(b"<svg"))
}

/// Validate candidate text and return ownership of the parsed tree.
///
/// Strict XML parsing is attempted first; on failure a single lenient
/// re-parse recovers what it can, HTML-style. Either way the result must
/// expose at least one `<svg>` element or the candidate is rejected. Fails
/// closed: there is no path that accepts content without an `<svg>` root.
pub fn parse_document(content: &str) -> GuardResult<Tree> {
    if !is_candidate(content.as_bytes()) {
        return Err(GuardError::InvalidMarkup(
            "no <svg> element found".to_string(),
        ));
    }

    match Tree::parse(content, ParseMode::Strict) {
        Ok(tree) => {
            if tree.find_svg_root().is_some() {
                return Ok(tree);
            }
            Err(GuardError::InvalidMarkup(
                "document contains no <svg> element".to_string(),
            ))
        }
        Err(strict_err) => {
            debug!(error = %strict_err, "strict parse failed, retrying leniently");

            let tree = Tree::parse(content, ParseMode::Lenient)?;
            if tree.is_empty() {
                return Err(GuardError::InvalidMarkup(
                    "nothing recoverable in document".to_string(),
                ));
            }
            if tree.find_svg_root().is_some() {
                Ok(tree)
            } else {
                Err(GuardError::InvalidMarkup(
                    "document contains no <svg> element".to_string(),
                ))
            }
        }
    }
}
