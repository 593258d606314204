//! End-to-end sanitization tests over realistic documents.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use svgward::Sanitizer;

fn sanitize(input: &str) -> Result<String, svgward::GuardError> {
    Sanitizer::default().sanitize(input)
}

const ICON: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
    r#"viewBox="0 0 24 24" width="24" height="24">"#,
    r#"<title>settings</title>"#,
    r#"<defs><radialGradient id="rg" cx="0.5" cy="0.5" r="0.5">"#,
    r##"<stop offset="0" stop-color="#fff"></stop>"##,
    r##"<stop offset="1" stop-color="#888"></stop>"##,
    r#"</radialGradient></defs>"#,
    r##"<g fill="url(#rg)" stroke="#333" stroke-width="1.5">"##,
    r#"<circle cx="12" cy="12" r="3.2"></circle>"#,
    r#"<path d="M19.4 13a1.6 1.6 0 0 0 .1-1l2-1.6-2-3.4-2.4 1a7.9 7.9 0 0 0-1.7-1l-.4-2.6h-4l-.4 2.6a7.9 7.9 0 0 0-1.7 1l-2.4-1-2 3.4 2 1.6a1.6 1.6 0 0 0 .1 1"></path>"#,
    r#"</g></svg>"#
);

#[test]
fn realistic_icon_is_unchanged() {
    let out = sanitize(ICON).unwrap();
    assert_eq!(out, ICON);
}

#[test]
fn sanitization_is_idempotent_on_dirty_input() {
    let dirty = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<svg xmlns="http://www.w3.org/2000/svg" onload="steal()">"#,
        r#"<script type="text/javascript">fetch('https://evil.example')</script>"#,
        r#"<rect width="10" height="10" onclick="boom()"/>"#,
        r#"<foreignObject><iframe src="https://evil.example"></iframe></foreignObject>"#,
        r#"</svg>"#
    );

    let once = sanitize(dirty).unwrap();
    let twice = sanitize(&once).unwrap();
    assert_eq!(once, twice);

    for needle in ["script", "onload", "onclick", "iframe", "foreignObject", "evil"] {
        assert!(!once.contains(needle), "output still contains {needle}: {once}");
    }
    assert!(once.contains(r#"<rect width="10" height="10">"#));
}

#[test]
fn xml_declaration_prologue_stripped() {
    let out = sanitize(r#"<?xml version="1.0"?><svg><g/></svg>"#).unwrap();
    assert!(out.starts_with("<svg"));
}

#[test]
fn event_handler_variants_never_survive() {
    let cases = [
        r#"<svg onload="alert(1)"/>"#,
        r#"<svg ONLOAD="alert(1)"/>"#,
        r#"<svg onmouseover='alert(1)'><g/></svg>"#,
        r#"<svg><rect width="1" height="1" onerror=alert(1)/></svg>"#,
    ];
    for case in cases {
        let out = sanitize(case).unwrap();
        let lower = out.to_lowercase();
        assert!(!lower.contains("onload"), "{case} -> {out}");
        assert!(!lower.contains("onmouseover"), "{case} -> {out}");
        assert!(!lower.contains("onerror"), "{case} -> {out}");
        assert!(!lower.contains("alert"), "{case} -> {out}");
    }
}

#[test]
fn script_uri_variants_never_survive() {
    let cases = [
        r#"<svg><a href="javascript:alert(1)"><text>x</text></a></svg>"#,
        r#"<svg><a href="JaVaScRiPt:alert(1)"><text>x</text></a></svg>"#,
        r#"<svg><a xlink:href="vbscript:msgbox"><text>x</text></a></svg>"#,
    ];
    for case in cases {
        let out = sanitize(case).unwrap().to_lowercase();
        assert!(!out.contains("javascript:"), "{case} -> {out}");
        assert!(!out.contains("vbscript:"), "{case} -> {out}");
    }
}

#[test]
fn doctype_with_external_entity_is_refused() {
    let payload = concat!(
        r#"<?xml version="1.0"?>"#,
        r#"<!DOCTYPE svg [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>"#,
        r#"<svg><text>&xxe;</text></svg>"#
    );
    assert!(sanitize(payload).is_err());
}

#[test]
fn plain_doctype_is_tolerated() {
    let input = concat!(
        r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "#,
        r#""http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#,
        r#"<svg><circle r="5"/></svg>"#
    );
    let out = sanitize(input).unwrap();
    assert_eq!(out, r#"<svg><circle r="5"></circle></svg>"#);
}

#[test]
fn smil_animation_elements_removed() {
    let out = sanitize(concat!(
        r#"<svg><rect width="5" height="5">"#,
        r#"<animate attributeName="x" from="0" to="100" dur="1s"/>"#,
        r#"</rect></svg>"#
    ))
    .unwrap();
    assert!(!out.contains("animate"));
    assert!(out.contains("<rect"));
}

#[test]
fn nested_svg_inside_foreign_object_goes_with_it() {
    let out = sanitize(concat!(
        r#"<svg id="outer"><foreignObject><svg id="inner"><script>x()</script></svg>"#,
        r#"</foreignObject><g/></svg>"#
    ))
    .unwrap();
    assert!(out.contains(r#"id="outer""#));
    assert!(!out.contains("inner"));
    assert!(!out.contains("script"));
}

#[test]
fn cdata_content_is_preserved_in_allowed_elements() {
    let out = sanitize("<svg><desc><![CDATA[plain description]]></desc></svg>").unwrap();
    assert!(out.contains("plain description"));
}

#[test]
fn dimensions_survive_sanitization() {
    let out = sanitize(r#"<svg width="48px" height="48px" viewBox="0 0 48 48"><g/></svg>"#)
        .unwrap();
    let dims = svgward::sanitize::dimensions::intrinsic_size(&out).unwrap();
    assert_eq!(dims.width, 48.0);
    assert_eq!(dims.height, 48.0);
}
