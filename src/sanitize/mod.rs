//! SVG sanitization pipeline.
//!
//! The sanitizer either returns fully-conforming output or fails — it never
//! returns partially-sanitized content. Pass ordering matters: the textual
//! denylist runs before structural parsing so raw-text attacks a parser
//! might normalize away are caught first.

pub mod dimensions;
pub mod validate;

use tracing::debug;

use crate::dom::{Attribute, NodeId, Tree};
use crate::error::{GuardError, GuardResult};
use crate::policy::{Policy, denylist};

/// Tree sanitizer over an immutable [`Policy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer {
    policy: Policy,
}

impl Sanitizer {
    /// Create a sanitizer with a custom policy.
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    /// Sanitize raw SVG text.
    ///
    /// Applies, in order: the denylist pass over the raw text, structural
    /// validation, the element allow-list pass (mark), the attribute
    /// allow-list pass, deferred element removal, and serialization of the
    /// surviving `<svg>` subtree. The serialized result is re-scanned
    /// against the denylist before being returned.
    pub fn sanitize(&self, raw: &str) -> GuardResult<String> {
        let cleaned = denylist::apply(raw)?;
        let mut tree = validate::parse_document(&cleaned)?;

        // Read-only traversal collecting violations; removal is deferred.
        let mut condemned: Vec<NodeId> = Vec::new();
        for id in tree.element_ids() {
            let Some(name) = tree.element_name(id) else {
                continue;
            };
            if !self.policy.allows_element(name) {
                debug!(element = name, "removing disallowed element");
                condemned.push(id);
            }
        }

        for id in tree.element_ids() {
            if condemned.contains(&id) {
                continue;
            }
            self.clean_attributes(&mut tree, id);
        }

        for id in condemned {
            tree.remove_subtree(id);
        }

        let root = tree.find_svg_root().ok_or_else(|| {
            GuardError::Unsanitizable("no <svg> root survived sanitization".to_string())
        })?;

        let output = tree.serialize_subtree(root)?;

        // Conforming output must not match any denylist rule.
        if let Some(rule) = denylist::residual_match(&output)? {
            return Err(GuardError::Unsanitizable(format!(
                "output still matches denylist rule {rule}"
            )));
        }

        Ok(output)
    }

    /// Sanitize raw bytes. Non-UTF-8 content is rejected.
    pub fn sanitize_bytes(&self, raw: &[u8]) -> GuardResult<String> {
        let text = std::str::from_utf8(raw)
            .map_err(|_| GuardError::InvalidMarkup("content is not valid UTF-8".to_string()))?;
        self.sanitize(text)
    }

    fn clean_attributes(&self, tree: &mut Tree, id: NodeId) {
        let is_use = tree
            .element_name(id)
            .is_some_and(|name| name.eq_ignore_ascii_case("use"));

        let kept: Vec<Attribute> = tree
            .attributes(id)
            .iter()
            .filter(|attr| {
                let lower = attr.name.to_ascii_lowercase();

                // Event handlers go regardless of anything else.
                if lower.starts_with("on") && lower.len() > 2 {
                    return false;
                }
                if !self.policy.allows_attribute(&attr.name) {
                    debug!(attribute = %attr.name, "removing disallowed attribute");
                    return false;
                }
                if is_dangerous_value(&attr.value) {
                    debug!(attribute = %attr.name, "removing attribute with dangerous value");
                    return false;
                }
                // A <use> pulling an external document is a same-origin
                // bypass; only fragment references survive.
                if is_use
                    && (lower == "href" || lower == "xlink:href")
                    && is_external_reference(&attr.value)
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        tree.set_attributes(id, kept);
    }
}

/// Check an attribute value for script-bearing or non-image data URIs.
///
/// Whitespace and control characters are removed before matching: browsers
/// tolerate `java\nscript:` and friends, so the check has to as well.
fn is_dangerous_value(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase();

    compact.starts_with("javascript:")
        || compact.starts_with("vbscript:")
        || (compact.starts_with("data:")
            && !(compact.starts_with("data:image/") && !compact.starts_with("data:image/svg")))
}

fn is_external_reference(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with("http://") || trimmed.starts_with("https://") || trimmed.starts_with("//")
}
