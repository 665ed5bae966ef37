//! # SvgKit Animation
//!
//! Animation detection and timing for Motion Studio.
//!
//! ## Features
//!
//! - **Declarative markup discovery**: the SVG animation tag family
//!   (`<animate>`, `<animateTransform>`, `<animateMotion>`,
//!   `<animateColor>`, `<set>`) with target resolution
//! - **Style keyframe discovery**: animation longhands resolved per element
//! - **Style transition discovery**: named-property transitions with
//!   positional list decomposition
//! - **Timing functions**: easing parse/evaluate and the preset table
//!
//! ## Architecture
//!
//! ```text
//! detect_animations(doc, resolver, profile)
//!    ├── declarative pass   (markup, always first)
//!    ├── keyframe pass      (StyleResolver capability)
//!    └── transition pass    (StyleResolver capability)
//!           └── AnimationInfo records, recomputed fresh per call
//! ```
//!
//! Style computation is environment-dependent, so it hides behind the
//! [`StyleResolver`] trait: [`SheetStyleResolver`] cascades the document's
//! own `<style>` sheets, [`NullStyleResolver`] is the headless fallback.
//! A resolver miss skips that element, never the whole pass.

use serde::Serialize;
use std::collections::HashMap;
use std::rc::Rc;
use svgkit_css::{
    expand_animation, expand_transition, parse_declarations, parse_selector_list,
    parse_stylesheet, parse_time_seconds, split_commas, CompatProfile, Declaration, Selector,
};
use svgkit_dom::{is_smil_tag, Node, NodeId, SvgDocument};
use thiserror::Error;
use tracing::{debug, trace};

// ==================== Errors ====================

/// Errors that can occur in animation analysis.
#[derive(Error, Debug)]
pub enum AnimationError {
    #[error("Invalid timing function: {0}")]
    InvalidTimingFunction(String),
}

// ==================== Records ====================

/// Which mechanism declared an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mechanism {
    /// Declarative markup animation (SMIL tag family).
    Smil,
    /// Stylesheet keyframe animation.
    Css,
    /// Style property transition.
    Transition,
}

/// Normalized timing bag. Mechanisms expose different subsets, so most
/// fields are optional raw strings.
#[derive(Debug, Clone, Serialize)]
pub struct TimingProperties {
    pub duration: Option<String>,
    pub delay: Option<String>,
    pub easing: Option<String>,
    pub iteration_count: Option<String>,
    pub direction: Option<String>,
    pub fill_mode: Option<String>,
    pub play_state: String,
}

/// One detected animation declaration.
///
/// Elements are referenced by their parse-scoped [`NodeId`]; resolve them
/// against the *current* document, and expect misses after a reparse.
#[derive(Debug, Clone, Serialize)]
pub struct AnimationInfo {
    /// The element carrying the declaration.
    pub node_id: NodeId,
    pub mechanism: Mechanism,
    /// Tag name for declarative animations, animation name for keyframe
    /// animations, `transition-<property>` for transitions.
    pub name: String,
    pub properties: TimingProperties,
    /// The element being animated; differs from `node_id` for declarative
    /// animations that target another element by reference.
    pub target_id: Option<NodeId>,
    /// Raw declaration attributes, declarative mechanism only.
    pub smil_attributes: Option<Vec<(String, String)>>,
    pub platform_compatible: bool,
    pub warnings: Vec<String>,
}

/// Attributes captured raw from declarative animation elements.
const SMIL_ATTRIBUTE_NAMES: &[&str] = &[
    "attributeName",
    "from",
    "to",
    "values",
    "dur",
    "begin",
    "end",
    "repeatCount",
    "repeatDur",
    "fill",
    "type",
];

// ==================== Style resolution ====================

/// Effective style of an element: longhand property → value list string.
#[derive(Debug, Clone, Default)]
pub struct ResolvedStyle {
    properties: HashMap<String, String>,
}

impl ResolvedStyle {
    /// Look up a longhand property.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// Apply one declaration, expanding `animation`/`transition` shorthands
    /// into the longhand lists a style engine would report.
    pub fn apply(&mut self, property: &str, value: &str) {
        let property = property.trim().to_ascii_lowercase();
        match property.as_str() {
            "animation" => {
                let segments = expand_animation(value);
                if segments.is_empty() {
                    return;
                }
                let join = |f: fn(&svgkit_css::AnimationSegment) -> Option<&String>,
                            default: &str| {
                    segments
                        .iter()
                        .map(|s| f(s).cloned().unwrap_or_else(|| default.to_string()))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                self.properties
                    .insert("animation-name".into(), join(|s| s.name.as_ref(), "none"));
                self.properties.insert(
                    "animation-duration".into(),
                    join(|s| s.duration.as_ref(), "0s"),
                );
                self.properties
                    .insert("animation-delay".into(), join(|s| s.delay.as_ref(), "0s"));
                self.properties.insert(
                    "animation-timing-function".into(),
                    join(|s| s.timing_function.as_ref(), "ease"),
                );
                self.properties.insert(
                    "animation-iteration-count".into(),
                    join(|s| s.iteration_count.as_ref(), "1"),
                );
                self.properties.insert(
                    "animation-direction".into(),
                    join(|s| s.direction.as_ref(), "normal"),
                );
                self.properties.insert(
                    "animation-fill-mode".into(),
                    join(|s| s.fill_mode.as_ref(), "none"),
                );
                self.properties.insert(
                    "animation-play-state".into(),
                    join(|s| s.play_state.as_ref(), "running"),
                );
            }
            "transition" => {
                let segments = expand_transition(value);
                if segments.is_empty() {
                    return;
                }
                let join = |f: fn(&svgkit_css::TransitionSegment) -> Option<&String>,
                            default: &str| {
                    segments
                        .iter()
                        .map(|s| f(s).cloned().unwrap_or_else(|| default.to_string()))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                self.properties.insert(
                    "transition-property".into(),
                    join(|s| s.property.as_ref(), "all"),
                );
                self.properties.insert(
                    "transition-duration".into(),
                    join(|s| s.duration.as_ref(), "0s"),
                );
                self.properties
                    .insert("transition-delay".into(), join(|s| s.delay.as_ref(), "0s"));
                self.properties.insert(
                    "transition-timing-function".into(),
                    join(|s| s.timing_function.as_ref(), "ease"),
                );
            }
            _ => {
                self.properties.insert(property, value.trim().to_string());
            }
        }
    }
}

/// Capability interface for effective-style lookup.
///
/// `None` means "no style information for this element" and must be treated
/// as "no animation detected", not as a failure of the detection pass.
pub trait StyleResolver {
    fn resolve(&self, node: &Rc<Node>) -> Option<ResolvedStyle>;
}

/// Headless fallback: no style information at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStyleResolver;

impl StyleResolver for NullStyleResolver {
    fn resolve(&self, _node: &Rc<Node>) -> Option<ResolvedStyle> {
        None
    }
}

struct MatchableRule {
    selector: Selector,
    specificity: u32,
    order: usize,
    declarations: Vec<Declaration>,
}

/// Resolver backed by the document's own `<style>` sheets.
///
/// Matching rules cascade by specificity, then source order; the inline
/// `style` attribute is applied last.
pub struct SheetStyleResolver {
    rules: Vec<MatchableRule>,
}

impl SheetStyleResolver {
    /// Parse every `<style>` descendant of the document once.
    pub fn for_document(doc: &SvgDocument) -> Self {
        let mut rules = Vec::new();
        let mut order = 0usize;
        for style_el in doc.query_selector_all("style") {
            let Ok(sheet) = parse_stylesheet(&style_el.text_content()) else {
                continue;
            };
            for rule in sheet.rules {
                for selector in parse_selector_list(&rule.selector) {
                    rules.push(MatchableRule {
                        specificity: selector.specificity(),
                        selector,
                        order,
                        declarations: rule.declarations.clone(),
                    });
                    order += 1;
                }
            }
        }
        debug!(rule_count = rules.len(), "sheet resolver built");
        Self { rules }
    }
}

impl StyleResolver for SheetStyleResolver {
    fn resolve(&self, node: &Rc<Node>) -> Option<ResolvedStyle> {
        let tag = node.tag_name()?.to_string();
        let id = node.get_attribute("id");
        let classes = node.classes();

        let mut matched: Vec<&MatchableRule> = self
            .rules
            .iter()
            .filter(|r| r.selector.matches(&tag, id.as_deref(), &classes))
            .collect();
        matched.sort_by_key(|r| (r.specificity, r.order));

        let mut style = ResolvedStyle::default();
        for rule in &matched {
            for decl in rule.declarations.iter().filter(|d| !d.important) {
                style.apply(&decl.property, &decl.value);
            }
        }
        for rule in &matched {
            for decl in rule.declarations.iter().filter(|d| d.important) {
                style.apply(&decl.property, &decl.value);
            }
        }
        if let Some(inline) = node.get_attribute("style") {
            for decl in parse_declarations(&inline) {
                style.apply(&decl.property, &decl.value);
            }
        }
        Some(style)
    }
}

// ==================== Detection ====================

/// Detect every animation declared in the document.
///
/// Returns the declarative, keyframe, and transition passes concatenated in
/// that fixed order with no further sorting or de-duplication. Returns an
/// empty list, never an error, for a document whose root is not `<svg>`.
pub fn detect_animations(
    doc: &SvgDocument,
    resolver: &dyn StyleResolver,
    profile: &dyn CompatProfile,
) -> Vec<AnimationInfo> {
    if doc.root().tag_name().map(local_name) != Some("svg") {
        return Vec::new();
    }

    let mut descendants = Vec::new();
    doc.traverse(|node| {
        if !Rc::ptr_eq(node, doc.root()) {
            descendants.push(node.clone());
        }
    });

    let mut results = detect_smil(doc, &descendants, profile);
    results.extend(detect_css_animations(&descendants, resolver));
    results.extend(detect_transitions(&descendants, resolver));
    debug!(count = results.len(), "animations detected");
    results
}

fn detect_smil(
    doc: &SvgDocument,
    descendants: &[Rc<Node>],
    profile: &dyn CompatProfile,
) -> Vec<AnimationInfo> {
    let mut results = Vec::new();
    for node in descendants {
        let Some(tag) = node.tag_name() else { continue };
        if !is_smil_tag(tag) {
            continue;
        }
        let Some(node_id) = node.node_id() else {
            continue;
        };
        let target = resolve_smil_target(doc, node);
        let smil_attributes: Vec<(String, String)> = SMIL_ATTRIBUTE_NAMES
            .iter()
            .filter_map(|name| node.get_attribute(name).map(|v| (name.to_string(), v)))
            .collect();
        let get = |name: &str| {
            smil_attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
        };
        trace!(%node_id, tag, "declarative animation found");
        results.push(AnimationInfo {
            node_id,
            mechanism: Mechanism::Smil,
            name: tag.to_ascii_lowercase(),
            properties: TimingProperties {
                duration: get("dur"),
                delay: get("begin"),
                easing: None,
                iteration_count: get("repeatCount"),
                direction: None,
                fill_mode: get("fill"),
                play_state: "running".to_string(),
            },
            target_id: target.and_then(|t| t.node_id()),
            smil_attributes: Some(smil_attributes),
            platform_compatible: profile.supports_declarative_markup(),
            warnings: vec![profile.declarative_warning()],
        });
    }
    results
}

/// Resolution order: `href`, then `xlink:href`, then the parent element for
/// inline declarations (none when the parent is the root).
fn resolve_smil_target(doc: &SvgDocument, node: &Rc<Node>) -> Option<Rc<Node>> {
    for attr in ["href", "xlink:href"] {
        if let Some(value) = node.get_attribute(attr) {
            if let Some(id) = value.strip_prefix('#') {
                if let Some(target) = doc.get_element_by_id(id) {
                    return Some(target);
                }
            }
        }
    }
    let parent = node.parent()?;
    (!Rc::ptr_eq(&parent, doc.root())).then_some(parent)
}

fn detect_css_animations(
    descendants: &[Rc<Node>],
    resolver: &dyn StyleResolver,
) -> Vec<AnimationInfo> {
    let mut results = Vec::new();
    for node in descendants {
        let Some(tag) = node.tag_name() else { continue };
        if is_smil_tag(tag) {
            continue;
        }
        let Some(style) = resolver.resolve(node) else {
            continue;
        };
        let name_value = match style.get("animation-name") {
            Some(v) if !v.is_empty() && v != "none" => v.to_string(),
            _ => continue,
        };
        let Some(node_id) = node.node_id() else {
            continue;
        };

        let names = split_commas(&name_value);
        let durations = split_commas(style.get("animation-duration").unwrap_or("0s"));
        let delays = split_commas(style.get("animation-delay").unwrap_or("0s"));
        let timings = split_commas(style.get("animation-timing-function").unwrap_or("ease"));
        let iterations = split_commas(style.get("animation-iteration-count").unwrap_or("1"));
        let directions = split_commas(style.get("animation-direction").unwrap_or("normal"));
        let fill_modes = split_commas(style.get("animation-fill-mode").unwrap_or("none"));
        let play_states = split_commas(style.get("animation-play-state").unwrap_or("running"));

        for (i, name) in names.iter().enumerate() {
            if name.as_str() == "none" {
                continue;
            }
            trace!(%node_id, name, "keyframe animation found");
            results.push(AnimationInfo {
                node_id,
                mechanism: Mechanism::Css,
                name: name.clone(),
                properties: TimingProperties {
                    duration: Some(pick(&durations, i, "0s")),
                    delay: Some(pick(&delays, i, "0s")),
                    easing: Some(pick(&timings, i, "ease")),
                    iteration_count: Some(pick(&iterations, i, "1")),
                    direction: Some(pick(&directions, i, "normal")),
                    fill_mode: Some(pick(&fill_modes, i, "none")),
                    play_state: pick(&play_states, i, "running"),
                },
                target_id: Some(node_id),
                smil_attributes: None,
                platform_compatible: true,
                warnings: Vec::new(),
            });
        }
    }
    results
}

fn detect_transitions(
    descendants: &[Rc<Node>],
    resolver: &dyn StyleResolver,
) -> Vec<AnimationInfo> {
    let mut results = Vec::new();
    for node in descendants {
        let Some(tag) = node.tag_name() else { continue };
        if is_smil_tag(tag) {
            continue;
        }
        let Some(style) = resolver.resolve(node) else {
            continue;
        };
        let property_value = match style.get("transition-property") {
            Some(v) if !v.is_empty() && v != "none" && v != "all" => v.to_string(),
            _ => continue,
        };
        let durations = split_commas(style.get("transition-duration").unwrap_or("0s"));
        if durations.iter().all(|d| is_zero_time(d)) {
            continue;
        }
        let Some(node_id) = node.node_id() else {
            continue;
        };

        let properties = split_commas(&property_value);
        let delays = split_commas(style.get("transition-delay").unwrap_or("0s"));
        let timings = split_commas(style.get("transition-timing-function").unwrap_or("ease"));

        for (i, property) in properties.iter().enumerate() {
            // distinct named properties only
            if property.as_str() == "none" || property.as_str() == "all" {
                continue;
            }
            let duration = pick(&durations, i, "0s");
            if is_zero_time(&duration) {
                continue;
            }
            trace!(%node_id, property, "transition found");
            results.push(AnimationInfo {
                node_id,
                mechanism: Mechanism::Transition,
                name: format!("transition-{property}"),
                properties: TimingProperties {
                    duration: Some(duration),
                    delay: Some(pick(&delays, i, "0s")),
                    easing: Some(pick(&timings, i, "ease")),
                    iteration_count: Some("1".to_string()),
                    direction: Some("normal".to_string()),
                    fill_mode: Some("none".to_string()),
                    // transitions have no persistent running state
                    play_state: "idle".to_string(),
                },
                target_id: Some(node_id),
                smil_attributes: None,
                platform_compatible: true,
                warnings: Vec::new(),
            });
        }
    }
    results
}

fn pick(list: &[String], index: usize, default: &str) -> String {
    if list.is_empty() {
        default.to_string()
    } else {
        list[index % list.len()].clone()
    }
}

fn is_zero_time(value: &str) -> bool {
    parse_time_seconds(value).unwrap_or(0.0) == 0.0
}

fn local_name(tag: &str) -> &str {
    tag.rsplit(':').next().unwrap_or(tag)
}

// ==================== Timing functions ====================

/// CSS timing function (easing).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimingFunction {
    Linear,
    /// Default ease (0.25, 0.1, 0.25, 1.0).
    Ease,
    /// Ease in (0.42, 0, 1, 1).
    EaseIn,
    /// Ease out (0, 0, 0.58, 1).
    EaseOut,
    /// Ease in-out (0.42, 0, 0.58, 1).
    EaseInOut,
    CubicBezier(f64, f64, f64, f64),
    Steps(u32, StepPosition),
}

impl Default for TimingFunction {
    fn default() -> Self {
        TimingFunction::Ease
    }
}

impl TimingFunction {
    /// Evaluate the timing function at time t (0.0 to 1.0).
    pub fn evaluate(&self, t: f64) -> f64 {
        match self {
            TimingFunction::Linear => t,
            TimingFunction::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            TimingFunction::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            TimingFunction::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            TimingFunction::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => cubic_bezier(*x1, *y1, *x2, *y2, t),
            TimingFunction::Steps(steps, position) => step_function(*steps, *position, t),
        }
    }

    /// Parse from a CSS string.
    pub fn parse(s: &str) -> Result<Self, AnimationError> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "linear" => Ok(TimingFunction::Linear),
            "ease" => Ok(TimingFunction::Ease),
            "ease-in" => Ok(TimingFunction::EaseIn),
            "ease-out" => Ok(TimingFunction::EaseOut),
            "ease-in-out" => Ok(TimingFunction::EaseInOut),
            _ if s.starts_with("cubic-bezier(") => {
                let inner = s.trim_start_matches("cubic-bezier(").trim_end_matches(')');
                let parts: Vec<f64> = inner
                    .split(',')
                    .filter_map(|p| p.trim().parse().ok())
                    .collect();
                if parts.len() == 4 {
                    Ok(TimingFunction::CubicBezier(
                        parts[0], parts[1], parts[2], parts[3],
                    ))
                } else {
                    Err(AnimationError::InvalidTimingFunction(s))
                }
            }
            _ if s.starts_with("steps(") => {
                let inner = s.trim_start_matches("steps(").trim_end_matches(')');
                let parts: Vec<&str> = inner.split(',').map(|p| p.trim()).collect();
                let steps: u32 = parts
                    .first()
                    .and_then(|p| p.parse().ok())
                    .ok_or_else(|| AnimationError::InvalidTimingFunction(s.clone()))?;
                let position = parts
                    .get(1)
                    .map(|p| StepPosition::parse(p))
                    .unwrap_or(StepPosition::End);
                Ok(TimingFunction::Steps(steps, position))
            }
            _ => Err(AnimationError::InvalidTimingFunction(s)),
        }
    }
}

/// Position for step timing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepPosition {
    Start,
    #[default]
    End,
    Both,
    None,
}

impl StepPosition {
    fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "start" | "jump-start" => StepPosition::Start,
            "end" | "jump-end" => StepPosition::End,
            "both" | "jump-both" => StepPosition::Both,
            "none" | "jump-none" => StepPosition::None,
            _ => StepPosition::End,
        }
    }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    // Newton-Raphson iteration to find the curve parameter for x = t
    let epsilon = 1e-6;
    let mut guess = t;

    for _ in 0..8 {
        let x = bezier_value(x1, x2, guess) - t;
        if x.abs() < epsilon {
            break;
        }
        let dx = bezier_derivative(x1, x2, guess);
        if dx.abs() < epsilon {
            break;
        }
        guess -= x / dx;
    }

    bezier_value(y1, y2, guess)
}

fn bezier_value(p1: f64, p2: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    3.0 * mt2 * t * p1 + 3.0 * mt * t2 * p2 + t3
}

fn bezier_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let t2 = t * t;
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t2 * (1.0 - p2)
}

fn step_function(steps: u32, position: StepPosition, t: f64) -> f64 {
    let steps = steps as f64;
    match position {
        StepPosition::Start => (t * steps).ceil() / steps,
        StepPosition::End => (t * steps).floor() / steps,
        StepPosition::Both => ((t * (steps + 1.0)).floor() / steps).min(1.0),
        StepPosition::None => {
            if steps <= 1.0 {
                t
            } else {
                ((t * (steps - 1.0)).floor() / (steps - 1.0)).clamp(0.0, 1.0)
            }
        }
    }
}

// ==================== Easing presets ====================

/// Named easing presets offered by the timing editor.
pub const EASING_PRESETS: &[(&str, &str)] = &[
    ("linear", "linear"),
    ("ease", "ease"),
    ("ease-in", "ease-in"),
    ("ease-out", "ease-out"),
    ("ease-in-out", "ease-in-out"),
    ("bounce", "cubic-bezier(0.34, 1.56, 0.64, 1)"),
    ("elastic", "cubic-bezier(0.68, -0.55, 0.27, 1.55)"),
    ("smooth", "cubic-bezier(0.4, 0, 0.2, 1)"),
    ("sharp", "cubic-bezier(0.4, 0, 0.6, 1)"),
    ("decelerate", "cubic-bezier(0, 0, 0.2, 1)"),
    ("accelerate", "cubic-bezier(0.4, 0, 1, 1)"),
];

/// Preset CSS value by name.
pub fn preset_value(name: &str) -> Option<&'static str> {
    EASING_PRESETS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| *v)
}

/// Reverse lookup: preset name for a CSS easing value, if any.
pub fn preset_name(value: &str) -> Option<&'static str> {
    let v = value.trim().to_lowercase();
    EASING_PRESETS
        .iter()
        .find(|(_, css)| *css == v)
        .map(|(n, _)| *n)
}
