//! Permitted SVG element names.
//!
//! Anything not listed here is removed together with its entire subtree.
//! Deliberately absent: `script`, `foreignObject`, `iframe`, `embed`,
//! `object`, `style`, `handler`, the SMIL animation elements (`set`,
//! `animate`, `animateTransform`, `animateMotion`), and everything else that
//! can execute code or pull in external documents.

/// Element allow-list, lowercase.
pub const ALLOWED_ELEMENTS: &[&str] = &[
    "svg",
    "a",
    "circle",
    "clippath",
    "defs",
    "desc",
    "ellipse",
    "feblend",
    "fecolormatrix",
    "fecomponenttransfer",
    "fecomposite",
    "feconvolvematrix",
    "fediffuselighting",
    "fedisplacementmap",
    "fedistantlight",
    "fedropshadow",
    "feflood",
    "fefunca",
    "fefuncb",
    "fefuncg",
    "fefuncr",
    "fegaussianblur",
    "femerge",
    "femergenode",
    "femorphology",
    "feoffset",
    "fepointlight",
    "fespecularlighting",
    "fespotlight",
    "fetile",
    "feturbulence",
    "filter",
    "g",
    "image",
    "line",
    "lineargradient",
    "marker",
    "mask",
    "metadata",
    "mpath",
    "path",
    "pattern",
    "polygon",
    "polyline",
    "radialgradient",
    "rect",
    "stop",
    "switch",
    "symbol",
    "text",
    "textpath",
    "title",
    "tspan",
    "use",
    "view",
];
