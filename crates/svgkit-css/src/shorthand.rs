//! `animation` and `transition` shorthand expansion.
//!
//! Sheet-authored shorthands must resolve to the longhand lists a style
//! engine would report. Commas split segments at paren depth 0 (so
//! `cubic-bezier(0.4, 0, 1, 1)` stays one token); within a segment the
//! first time value is the duration and the second the delay, keywords are
//! assigned to the earliest longhand that accepts them, and the remaining
//! identifier is the animation name / transition property.

use crate::parse_float_prefix;

/// One comma-separated segment of an `animation` shorthand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationSegment {
    pub name: Option<String>,
    pub duration: Option<String>,
    pub delay: Option<String>,
    pub timing_function: Option<String>,
    pub iteration_count: Option<String>,
    pub direction: Option<String>,
    pub fill_mode: Option<String>,
    pub play_state: Option<String>,
}

/// One comma-separated segment of a `transition` shorthand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionSegment {
    pub property: Option<String>,
    pub duration: Option<String>,
    pub delay: Option<String>,
    pub timing_function: Option<String>,
}

/// Expand an `animation` shorthand value into per-animation segments.
pub fn expand_animation(value: &str) -> Vec<AnimationSegment> {
    split_commas(value)
        .iter()
        .map(|segment| {
            let mut out = AnimationSegment::default();
            for token in split_tokens(segment) {
                if is_time(&token) {
                    if out.duration.is_none() {
                        out.duration = Some(token);
                    } else if out.delay.is_none() {
                        out.delay = Some(token);
                    }
                } else if is_timing_function(&token) && out.timing_function.is_none() {
                    out.timing_function = Some(token);
                } else if is_iteration_count(&token) && out.iteration_count.is_none() {
                    out.iteration_count = Some(token);
                } else if is_direction(&token) && out.direction.is_none() {
                    out.direction = Some(token);
                } else if is_fill_mode(&token) && out.fill_mode.is_none() {
                    out.fill_mode = Some(token);
                } else if is_play_state(&token) && out.play_state.is_none() {
                    out.play_state = Some(token);
                } else if out.name.is_none() {
                    out.name = Some(token);
                }
            }
            out
        })
        .collect()
}

/// Expand a `transition` shorthand value into per-property segments.
pub fn expand_transition(value: &str) -> Vec<TransitionSegment> {
    split_commas(value)
        .iter()
        .map(|segment| {
            let mut out = TransitionSegment::default();
            for token in split_tokens(segment) {
                if is_time(&token) {
                    if out.duration.is_none() {
                        out.duration = Some(token);
                    } else if out.delay.is_none() {
                        out.delay = Some(token);
                    }
                } else if is_timing_function(&token) && out.timing_function.is_none() {
                    out.timing_function = Some(token);
                } else if out.property.is_none() {
                    out.property = Some(token);
                }
            }
            out
        })
        .collect()
}

/// Split a property value on commas at paren depth 0.
pub fn split_commas(value: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in value.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    out
}

/// Parse a CSS time value to seconds (`2s`, `150ms`, bare numbers lenient).
pub fn parse_time_seconds(value: &str) -> Option<f64> {
    let v = value.trim().to_ascii_lowercase();
    if let Some(num) = v.strip_suffix("ms") {
        return num.trim().parse::<f64>().ok().map(|n| n / 1000.0);
    }
    if let Some(num) = v.strip_suffix('s') {
        return num.trim().parse::<f64>().ok();
    }
    v.parse::<f64>().ok()
}

fn split_tokens(segment: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in segment.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn is_time(token: &str) -> bool {
    let t = token.to_ascii_lowercase();
    (t.ends_with("ms") || t.ends_with('s'))
        && parse_float_prefix(&t).is_some()
        && parse_time_seconds(&t).is_some()
}

fn is_timing_function(token: &str) -> bool {
    let t = token.to_ascii_lowercase();
    matches!(
        t.as_str(),
        "linear" | "ease" | "ease-in" | "ease-out" | "ease-in-out" | "step-start" | "step-end"
    ) || t.starts_with("cubic-bezier(")
        || t.starts_with("steps(")
}

fn is_iteration_count(token: &str) -> bool {
    token.eq_ignore_ascii_case("infinite") || token.parse::<f64>().is_ok()
}

fn is_direction(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "normal" | "reverse" | "alternate" | "alternate-reverse"
    )
}

fn is_fill_mode(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "none" | "forwards" | "backwards" | "both"
    )
}

fn is_play_state(token: &str) -> bool {
    matches!(token.to_ascii_lowercase().as_str(), "running" | "paused")
}
