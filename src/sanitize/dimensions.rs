//! Intrinsic dimension extraction.
//!
//! Hosts need width/height for media-library previews, and SVG files often
//! carry them only as a `viewBox`. Values are read from the `<svg>` root's
//! `width`/`height` attributes, falling back to the third and fourth
//! `viewBox` fields; unit suffixes like `px` or `pt` are stripped.

use crate::dom::Tree;
use crate::sanitize::validate;

/// Extracted dimensions, always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Extract the intrinsic size of an SVG document.
///
/// Returns `None` when the content does not parse as SVG or no positive
/// width/height pair can be derived.
pub fn intrinsic_size(content: &str) -> Option<Dimensions> {
    let tree = validate::parse_document(content).ok()?;
    let root = tree.find_svg_root()?;

    let mut width = attribute_value(&tree, root, "width").and_then(numeric_prefix);
    let mut height = attribute_value(&tree, root, "height").and_then(numeric_prefix);

    if width.is_none() || height.is_none() {
        if let Some(viewbox) = attribute_value(&tree, root, "viewbox") {
            let parts: Vec<&str> = viewbox
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .collect();
            if parts.len() >= 4 {
                width = width.or_else(|| numeric_prefix(parts[2].to_string()));
                height = height.or_else(|| numeric_prefix(parts[3].to_string()));
            }
        }
    }

    match (width, height) {
        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some(Dimensions {
            width: w,
            height: h,
        }),
        _ => None,
    }
}

fn attribute_value(tree: &Tree, id: crate::dom::NodeId, name: &str) -> Option<String> {
    tree.attributes(id)
        .iter()
        .find(|attr| attr.name.eq_ignore_ascii_case(name))
        .map(|attr| attr.value.clone())
}

/// Parse the numeric part of a length value, dropping unit suffixes.
fn numeric_prefix(value: String) -> Option<f64> {
    let digits: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_width_and_height() {
        let dims = intrinsic_size(r#"<svg width="120" height="80"/>"#).unwrap();
        assert_eq!(dims.width, 120.0);
        assert_eq!(dims.height, 80.0);
    }

    #[test]
    fn unit_suffixes_stripped() {
        let dims = intrinsic_size(r#"<svg width="120px" height="80.5pt"/>"#).unwrap();
        assert_eq!(dims.width, 120.0);
        assert_eq!(dims.height, 80.5);
    }

    #[test]
    fn viewbox_fallback() {
        let dims = intrinsic_size(r#"<svg viewBox="0 0 300 150"/>"#).unwrap();
        assert_eq!(dims.width, 300.0);
        assert_eq!(dims.height, 150.0);
    }

    #[test]
    fn viewbox_with_commas() {
        let dims = intrinsic_size(r#"<svg viewBox="0,0,24,24"/>"#).unwrap();
        assert_eq!(dims.width, 24.0);
        assert_eq!(dims.height, 24.0);
    }

    #[test]
    fn missing_dimensions() {
        assert!(intrinsic_size("<svg/>").is_none());
        assert!(intrinsic_size(r#"<svg width="0" height="0"/>"#).is_none());
        assert!(intrinsic_size("not svg at all").is_none());
    }
}
