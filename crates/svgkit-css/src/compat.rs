//! Platform-compatibility advisories.
//!
//! Some rendering targets fall short of the full SVG/CSS surface. A
//! `CompatProfile` turns (attribute, value) pairs into human-readable
//! warnings and gives the fixed verdict on declarative markup animations.
//! Profiles are pluggable; the built-in one models the Android WebView
//! renderer the original advisories were written against.

/// A rendering target's compatibility profile.
pub trait CompatProfile {
    /// Human-readable target name.
    fn name(&self) -> &str;

    /// Whether declarative markup (SMIL) animations play on this target.
    fn supports_declarative_markup(&self) -> bool;

    /// The advisory attached to declarative markup animations.
    fn declarative_warning(&self) -> String;

    /// Advisory for an attribute value, or `None` when it is safe.
    fn advise(&self, attr_name: &str, attr_value: &str) -> Option<String>;
}

/// The Android WebView rendering target.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidWebView;

impl CompatProfile for AndroidWebView {
    fn name(&self) -> &str {
        "Android WebView"
    }

    fn supports_declarative_markup(&self) -> bool {
        false
    }

    fn declarative_warning(&self) -> String {
        "SMIL animations are not supported on Android WebView".to_string()
    }

    fn advise(&self, attr_name: &str, attr_value: &str) -> Option<String> {
        let name = attr_name.to_ascii_lowercase();
        match name.as_str() {
            "filter" => Some("filter is not supported on Android WebView".to_string()),
            "mask" => Some("mask has limited Android support".to_string()),
            "clip-path" if attr_value.contains("url(") => {
                Some("Complex clip-path may not render on Android".to_string())
            }
            "fill" | "stroke" if is_unsafe_color(attr_value) => {
                Some("Use #RRGGBB hex for Android compatibility".to_string())
            }
            "transform" if has_skew(attr_value) => {
                Some("skew transforms not supported on all Android renderers".to_string())
            }
            "font-family" if has_custom_font(attr_value) => {
                Some("Custom fonts may not load on Android".to_string())
            }
            _ => None,
        }
    }
}

/// Named colors every SVG 1.1 renderer handles.
const SVG_SAFE_NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure",
    "beige", "bisque", "black", "blanchedalmond", "blue",
    "blueviolet", "brown", "burlywood",
    "cadetblue", "chartreuse", "chocolate", "coral", "cornflowerblue",
    "cornsilk", "crimson", "cyan",
    "darkblue", "darkcyan", "darkgoldenrod", "darkgray", "darkgreen",
    "darkgrey", "darkkhaki", "darkmagenta", "darkolivegreen", "darkorange",
    "darkorchid", "darkred", "darksalmon", "darkseagreen", "darkslateblue",
    "darkslategray", "darkslategrey", "darkturquoise", "darkviolet",
    "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue",
    "firebrick", "floralwhite", "forestgreen", "fuchsia",
    "gainsboro", "ghostwhite", "gold", "goldenrod", "gray", "green",
    "greenyellow", "grey",
    "honeydew", "hotpink",
    "indianred", "indigo", "ivory",
    "khaki",
    "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray",
    "lightgreen", "lightgrey", "lightpink", "lightsalmon", "lightseagreen",
    "lightskyblue", "lightslategray", "lightslategrey", "lightsteelblue",
    "lightyellow", "lime", "limegreen", "linen",
    "magenta", "maroon", "mediumaquamarine", "mediumblue", "mediumorchid",
    "mediumpurple", "mediumseagreen", "mediumslateblue", "mediumspringgreen",
    "mediumturquoise", "mediumvioletred", "midnightblue", "mintcream",
    "mistyrose", "moccasin",
    "navajowhite", "navy",
    "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid",
    "palegoldenrod", "palegreen", "paleturquoise", "palevioletred",
    "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue",
    "purple",
    "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna",
    "silver", "skyblue", "slateblue", "slategray", "slategrey", "snow",
    "springgreen", "steelblue",
    "tan", "teal", "thistle", "tomato", "turquoise",
    "violet",
    "wheat", "white", "whitesmoke",
    "yellow", "yellowgreen",
];

const SYSTEM_FONTS: &[&str] = &[
    "serif", "sans-serif", "monospace", "cursive", "fantasy", "system-ui",
];

fn is_unsafe_color(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    if v.is_empty() || v.starts_with('#') {
        return false;
    }
    if v.starts_with("rgb(") || v.starts_with("rgba(") {
        return false;
    }
    if v.starts_with("hsl")
        || v.starts_with("oklch")
        || v.starts_with("oklab")
        || v.starts_with("lch")
        || v.starts_with("lab")
    {
        return true;
    }
    if v == "currentcolor" {
        return true;
    }
    if v == "none" || v == "transparent" || v == "inherit" {
        return false;
    }
    if SVG_SAFE_NAMED_COLORS.binary_search(&v.as_str()).is_ok() {
        return false;
    }
    v.chars().all(|c| c.is_ascii_lowercase())
}

fn has_skew(value: &str) -> bool {
    let v = value.to_ascii_lowercase();
    v.contains("skewx") || v.contains("skewy")
}

fn has_custom_font(value: &str) -> bool {
    if value.trim().is_empty() {
        return false;
    }
    value.split(',').any(|font| {
        let f = font
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_ascii_lowercase();
        !SYSTEM_FONTS.contains(&f.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_color_table_is_sorted_for_binary_search() {
        let mut sorted = SVG_SAFE_NAMED_COLORS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, SVG_SAFE_NAMED_COLORS);
    }

    #[test]
    fn filter_and_mask_warn() {
        let profile = AndroidWebView;
        assert!(profile.advise("filter", "url(#blur)").is_some());
        assert!(profile.advise("mask", "url(#m)").is_some());
    }

    #[test]
    fn clip_path_warns_only_for_references() {
        let profile = AndroidWebView;
        assert!(profile.advise("clip-path", "url(#clip)").is_some());
        assert!(profile.advise("clip-path", "circle(40%)").is_none());
    }

    #[test]
    fn hex_and_rgb_colors_are_safe() {
        let profile = AndroidWebView;
        assert!(profile.advise("fill", "#ff0000").is_none());
        assert!(profile.advise("stroke", "rgb(1, 2, 3)").is_none());
        assert!(profile.advise("fill", "rgba(1, 2, 3, 0.5)").is_none());
    }

    #[test]
    fn safe_named_colors_pass() {
        let profile = AndroidWebView;
        assert!(profile.advise("fill", "rebeccapurple").is_some());
        assert!(profile.advise("fill", "tomato").is_none());
        assert!(profile.advise("fill", "none").is_none());
        assert!(profile.advise("fill", "transparent").is_none());
    }

    #[test]
    fn modern_color_spaces_and_currentcolor_warn() {
        let profile = AndroidWebView;
        assert!(profile.advise("fill", "oklch(70% 0.1 200)").is_some());
        assert!(profile.advise("fill", "hsl(120, 50%, 50%)").is_some());
        assert!(profile.advise("stroke", "currentColor").is_some());
    }

    #[test]
    fn skew_transforms_warn() {
        let profile = AndroidWebView;
        assert!(profile.advise("transform", "skewX(20)").is_some());
        assert!(profile.advise("transform", "rotate(20)").is_none());
    }

    #[test]
    fn custom_fonts_warn_system_fonts_do_not() {
        let profile = AndroidWebView;
        assert!(profile.advise("font-family", "\"Comic Sans MS\", cursive").is_some());
        assert!(profile.advise("font-family", "sans-serif").is_none());
        assert!(profile.advise("font-family", "monospace, serif").is_none());
    }

    #[test]
    fn declarative_markup_is_unsupported() {
        let profile = AndroidWebView;
        assert!(!profile.supports_declarative_markup());
        assert!(profile.declarative_warning().to_lowercase().contains("android"));
    }
}
