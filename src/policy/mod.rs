//! Sanitization policy.
//!
//! Allow-lists of permitted SVG elements and attributes, plus the ordered
//! denylist of dangerous textual patterns. All policy data is immutable
//! after first use.

pub mod attributes;
pub mod denylist;
pub mod elements;

pub use denylist::{DenyAction, DenyRule};

/// Sanitization policy: which elements and attributes survive.
///
/// The shipping policy is [`Policy::default`]; tests construct narrower
/// policies from their own tables.
#[derive(Debug, Clone, Copy)]
pub struct Policy {
    /// Permitted element names, lowercase.
    pub elements: &'static [&'static str],
    /// Permitted attribute names, lowercase.
    pub attributes: &'static [&'static str],
}

impl Policy {
    /// Check whether an element name is permitted. Comparison is
    /// case-insensitive.
    pub fn allows_element(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        self.elements.contains(&lower.as_str())
    }

    /// Check whether an attribute name is permitted. Comparison is
    /// case-insensitive; `data-*` attributes are always permitted.
    pub fn allows_attribute(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        lower.starts_with("data-") || self.attributes.contains(&lower.as_str())
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            elements: elements::ALLOWED_ELEMENTS,
            attributes: attributes::ALLOWED_ATTRIBUTES,
        }
    }
}
