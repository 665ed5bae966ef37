//! Preview playback helpers.
//!
//! These operate on the live tree through inline style, the same channel
//! the host environment's animation engine reads. Which elements count as
//! animated is decided by the style resolver rather than any class-name
//! convention, so the helpers work on arbitrary documents.

use std::rc::Rc;
use svgkit_animation::{SheetStyleResolver, StyleResolver};
use svgkit_css::{parse_declarations, parse_time_seconds, split_commas};
use svgkit_dom::{is_smil_tag, Node, SvgDocument};
use tracing::debug;

/// Attribute caching the pre-scaling durations, so repeated speed changes
/// compose from the originals instead of drifting.
const ORIGINAL_DURATIONS_ATTR: &str = "data-orig-dur";

/// Scale every keyframe animation's duration by `speed` and set the shared
/// play state. A non-positive speed is ignored.
pub fn apply_speed(doc: &SvgDocument, speed: f32, paused: bool) {
    if speed <= 0.0 {
        return;
    }
    let play_state = if paused { "paused" } else { "running" };
    for (el, durations) in animated_elements(doc) {
        doc.set_style(&el, "animation-play-state", play_state);
        if !el.has_attribute(ORIGINAL_DURATIONS_ATTR) {
            let originals = durations
                .iter()
                .map(|d| parse_time_seconds(d).unwrap_or(0.0).to_string())
                .collect::<Vec<_>>()
                .join(",");
            doc.set_attribute(&el, ORIGINAL_DURATIONS_ATTR, &originals);
        }
        let originals: Vec<f64> = el
            .get_attribute(ORIGINAL_DURATIONS_ATTR)
            .unwrap_or_default()
            .split(',')
            .filter_map(|d| d.trim().parse().ok())
            .collect();
        let scaled = originals
            .iter()
            .map(|d| format!("{}s", d / speed as f64))
            .collect::<Vec<_>>()
            .join(", ");
        if !scaled.is_empty() {
            doc.set_style(&el, "animation-duration", &scaled);
        }
    }
    debug!(speed, paused, "playback speed applied");
}

/// Flip the play state of every animated element. Returns the new paused
/// state; `false` when nothing is animated.
pub fn toggle_pause(doc: &SvgDocument) -> bool {
    let animated = animated_elements(doc);
    let was_paused = animated
        .first()
        .map(|(el, _)| inline_play_state(el).as_deref() == Some("paused"))
        .unwrap_or(false);
    let next = if was_paused { "running" } else { "paused" };
    for (el, _) in &animated {
        doc.set_style(el, "animation-play-state", next);
    }
    !was_paused && !animated.is_empty()
}

/// Set `stroke-width` on every stroked element (skipping `stroke="none"`)
/// and on groups that already carry a stroke width.
pub fn set_stroke_width(doc: &SvgDocument, width: f64) {
    let value = width.to_string();
    for el in doc.query_selector_all("[stroke]") {
        if el.get_attribute("stroke").as_deref() != Some("none") {
            doc.set_attribute(&el, "stroke-width", &value);
        }
    }
    for el in doc.query_selector_all("g[stroke-width]") {
        doc.set_attribute(&el, "stroke-width", &value);
    }
}

/// Elements with an active keyframe animation, with their resolved
/// duration lists.
fn animated_elements(doc: &SvgDocument) -> Vec<(Rc<Node>, Vec<String>)> {
    let resolver = SheetStyleResolver::for_document(doc);
    let mut out = Vec::new();
    doc.traverse(|node| {
        if Rc::ptr_eq(node, doc.root()) {
            return;
        }
        if node.tag_name().is_some_and(is_smil_tag) {
            return;
        }
        let Some(style) = resolver.resolve(node) else {
            return;
        };
        match style.get("animation-name") {
            Some(name) if !name.is_empty() && name != "none" => {
                let durations = split_commas(style.get("animation-duration").unwrap_or("0s"));
                out.push((node.clone(), durations));
            }
            _ => {}
        }
    });
    out
}

fn inline_play_state(el: &Rc<Node>) -> Option<String> {
    let style = el.get_attribute("style")?;
    parse_declarations(&style)
        .into_iter()
        .find(|d| d.property.eq_ignore_ascii_case("animation-play-state"))
        .map(|d| d.value)
}
