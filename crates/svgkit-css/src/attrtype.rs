//! Attribute-type classification for inline editing controls.
//!
//! Maps an attribute name (case-insensitive) to the editing control and
//! validation rule it should get: a fixed option list, a color well, a
//! numeric field (non-numeric commits are rejected by the editor), or
//! free text.

use serde::Serialize;

/// Editing kind for an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttrKind {
    /// Fixed legal option list.
    Enum(&'static [&'static str]),
    Color,
    Numeric,
    Text,
}

/// Classify an attribute name.
pub fn classify_attribute(name: &str) -> AttrKind {
    match name.to_ascii_lowercase().as_str() {
        "stroke-linecap" => AttrKind::Enum(&["butt", "round", "square"]),
        "stroke-linejoin" => AttrKind::Enum(&["miter", "round", "bevel"]),
        "display" => AttrKind::Enum(&["inline", "block", "none"]),
        "visibility" => AttrKind::Enum(&["visible", "hidden", "collapse"]),
        "fill-rule" | "clip-rule" => AttrKind::Enum(&["nonzero", "evenodd"]),
        "text-anchor" => AttrKind::Enum(&["start", "middle", "end"]),
        "dominant-baseline" => AttrKind::Enum(&[
            "auto",
            "middle",
            "hanging",
            "central",
            "text-bottom",
            "text-top",
        ]),
        "overflow" => AttrKind::Enum(&["visible", "hidden", "scroll", "auto"]),

        "fill" | "stroke" | "stop-color" | "flood-color" | "lighting-color" => AttrKind::Color,

        "width" | "height" | "x" | "y" | "cx" | "cy" | "r" | "rx" | "ry" | "x1" | "y1" | "x2"
        | "y2" | "dx" | "dy" | "opacity" | "fill-opacity" | "stroke-opacity" | "stroke-width"
        | "stroke-miterlimit" | "font-size" | "letter-spacing" | "word-spacing" => {
            AttrKind::Numeric
        }

        _ => AttrKind::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_enums_with_options() {
        match classify_attribute("stroke-linecap") {
            AttrKind::Enum(options) => assert_eq!(options, &["butt", "round", "square"]),
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn classifies_colors() {
        assert_eq!(classify_attribute("fill"), AttrKind::Color);
        assert_eq!(classify_attribute("stop-color"), AttrKind::Color);
    }

    #[test]
    fn classifies_numerics() {
        assert_eq!(classify_attribute("r"), AttrKind::Numeric);
        assert_eq!(classify_attribute("stroke-width"), AttrKind::Numeric);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify_attribute("FILL"), AttrKind::Color);
        assert_eq!(classify_attribute("Stroke-Width"), AttrKind::Numeric);
    }

    #[test]
    fn unknown_names_are_text() {
        assert_eq!(classify_attribute("d"), AttrKind::Text);
        assert_eq!(classify_attribute("transform"), AttrKind::Text);
    }
}
