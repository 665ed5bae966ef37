//! # SvgKit CSS
//!
//! CSS parsing and value analysis for Motion Studio.
//!
//! ## Design Goals
//!
//! 1. **Stylesheet parsing**: author rules plus `@keyframes` capture from
//!    embedded SVG style blocks
//! 2. **Selector matching**: the simple-selector subset with CSS specificity
//! 3. **Shorthand expansion**: `animation`/`transition` shorthands resolved
//!    to the longhand lists a style engine would expose
//! 4. **Editing decoders**: transform string ⇄ structured values, attribute
//!    name → editing kind, platform-compatibility advisories
//!
//! This crate is document-model independent: matching operates on plain
//! (tag, id, classes) data, so callers decide how elements are represented.

pub mod attrtype;
pub mod compat;
pub mod parser;
pub mod selector;
pub mod shorthand;
pub mod transform;

pub use attrtype::{classify_attribute, AttrKind};
pub use compat::{AndroidWebView, CompatProfile};
pub use parser::{parse_declarations, parse_stylesheet, Declaration, KeyframesRule, StyleRule, Stylesheet};
pub use selector::{parse_selector_list, Selector};
pub use shorthand::{expand_animation, expand_transition, parse_time_seconds, split_commas, AnimationSegment, TransitionSegment};
pub use transform::{build_transform, parse_transform, Transform2D};

use thiserror::Error;

/// Errors that can occur while parsing CSS.
#[derive(Error, Debug, Clone)]
pub enum CssError {
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Leading-float parse with `parseFloat` semantics: optional sign, digits,
/// one dot, optional exponent; trailing junk ("45deg") ignored.
pub(crate) fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut e = end + 1;
        if e < bytes.len() && (bytes[e] == b'+' || bytes[e] == b'-') {
            e += 1;
        }
        let mut exp_digit = false;
        while e < bytes.len() && bytes[e].is_ascii_digit() {
            exp_digit = true;
            e += 1;
        }
        if exp_digit {
            end = e;
        }
    }
    s[..end].parse().ok()
}
