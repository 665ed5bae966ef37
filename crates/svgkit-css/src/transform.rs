//! Transform attribute decode/encode.
//!
//! The editing surface works on a structured `{x, y, rotation, scale}`
//! view. Decoding extracts `translate`/`rotate`/`scale` independently;
//! a raw `matrix(a,b,c,d,e,f)` is decomposed only when none of the three
//! explicit functions is present. Encoding emits only non-identity
//! components, so an all-identity value renders as the empty string
//! (meaning: remove the attribute).

use crate::parse_float_prefix;
use serde::{Deserialize, Serialize};

/// Structured transform: translate offset, rotation in degrees, uniform
/// scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform2D {
    /// True when every component is at its identity value.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Decode a transform string. Absent or unparseable input yields the
/// identity default.
pub fn parse_transform(input: &str) -> Transform2D {
    let mut result = Transform2D::default();
    if input.trim().is_empty() {
        return result;
    }

    let translate = function_args(input, "translate");
    if let Some(args) = &translate {
        result.x = args
            .first()
            .and_then(|a| parse_float_prefix(a))
            .unwrap_or(0.0);
        result.y = args
            .get(1)
            .and_then(|a| parse_float_prefix(a))
            .unwrap_or(0.0);
    }

    let rotate = function_args(input, "rotate");
    if let Some(args) = &rotate {
        result.rotation = args
            .first()
            .and_then(|a| parse_float_prefix(a))
            .unwrap_or(0.0);
    }

    let scale = function_args(input, "scale");
    if let Some(args) = &scale {
        result.scale = args
            .first()
            .and_then(|a| parse_float_prefix(a))
            .unwrap_or(1.0);
    }

    if translate.is_none() && rotate.is_none() && scale.is_none() {
        if let Some(args) = function_args(input, "matrix") {
            if args.len() == 6 {
                let m: Vec<f64> = args
                    .iter()
                    .map(|a| parse_float_prefix(a).unwrap_or(0.0))
                    .collect();
                let (a, b, e, f) = (m[0], m[1], m[4], m[5]);
                result.x = e;
                result.y = f;
                result.rotation = b.atan2(a).to_degrees();
                result.scale = (a * a + b * b).sqrt();
            }
        }
    }

    result
}

/// Encode a structured transform, omitting identity components in fixed
/// translate → rotate → scale order. Identity encodes to the empty string.
pub fn build_transform(t: &Transform2D) -> String {
    let mut parts = Vec::new();
    if t.x != 0.0 || t.y != 0.0 {
        parts.push(format!("translate({}, {})", t.x, t.y));
    }
    if t.rotation != 0.0 {
        parts.push(format!("rotate({})", t.rotation));
    }
    if t.scale != 1.0 {
        parts.push(format!("scale({})", t.scale));
    }
    parts.join(" ")
}

/// Arguments of the first `name(...)` occurrence, split on commas and
/// whitespace.
fn function_args<'a>(input: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let pattern = format!("{name}(");
    let start = input.find(&pattern)? + pattern.len();
    let end = input[start..].find(')')? + start;
    Some(
        input[start..end]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_identity() {
        assert!(parse_transform("").is_identity());
        assert!(parse_transform("   ").is_identity());
    }

    #[test]
    fn garbage_input_is_identity() {
        assert!(parse_transform("not-a-transform").is_identity());
    }

    #[test]
    fn parses_translate() {
        let t = parse_transform("translate(10, 20)");
        assert_eq!((t.x, t.y), (10.0, 20.0));
        assert_eq!(t.rotation, 0.0);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn parses_single_arg_translate() {
        let t = parse_transform("translate(15)");
        assert_eq!((t.x, t.y), (15.0, 0.0));
    }

    #[test]
    fn parses_combined_functions() {
        let t = parse_transform("translate(5, -3) rotate(45) scale(2)");
        assert_eq!((t.x, t.y), (5.0, -3.0));
        assert_eq!(t.rotation, 45.0);
        assert_eq!(t.scale, 2.0);
    }

    #[test]
    fn rotate_with_center_uses_angle_only() {
        let t = parse_transform("rotate(90 50 50)");
        assert_eq!(t.rotation, 90.0);
    }

    #[test]
    fn css_units_tolerated() {
        let t = parse_transform("translate(10px, 20px) rotate(30deg)");
        assert_eq!((t.x, t.y), (10.0, 20.0));
        assert_eq!(t.rotation, 30.0);
    }

    #[test]
    fn matrix_decomposed_only_without_explicit_functions() {
        // pure 90° rotation: matrix(0, 1, -1, 0, 40, 50)
        let t = parse_transform("matrix(0, 1, -1, 0, 40, 50)");
        assert_eq!((t.x, t.y), (40.0, 50.0));
        assert!((t.rotation - 90.0).abs() < 1e-9);
        assert!((t.scale - 1.0).abs() < 1e-9);

        // explicit translate wins; the matrix is ignored
        let t = parse_transform("translate(1, 2) matrix(0, 1, -1, 0, 40, 50)");
        assert_eq!((t.x, t.y), (1.0, 2.0));
        assert_eq!(t.rotation, 0.0);
    }

    #[test]
    fn matrix_uniform_scale() {
        let t = parse_transform("matrix(2, 0, 0, 2, 0, 0)");
        assert_eq!(t.scale, 2.0);
        assert_eq!(t.rotation, 0.0);
    }

    #[test]
    fn build_omits_identity_components() {
        let t = Transform2D {
            x: 10.0,
            y: 0.0,
            rotation: 0.0,
            scale: 1.0,
        };
        assert_eq!(build_transform(&t), "translate(10, 0)");
        let r = Transform2D {
            rotation: 45.0,
            ..Default::default()
        };
        assert_eq!(build_transform(&r), "rotate(45)");
    }

    #[test]
    fn identity_builds_empty_string() {
        assert_eq!(build_transform(&Transform2D::default()), "");
    }

    #[test]
    fn round_trips_representative_tuples() {
        let tuples = [
            Transform2D::default(),
            Transform2D {
                x: 10.0,
                y: 20.0,
                rotation: 0.0,
                scale: 1.0,
            },
            Transform2D {
                x: -4.5,
                y: 0.0,
                rotation: 90.0,
                scale: 2.0,
            },
            Transform2D {
                x: 0.0,
                y: 0.0,
                rotation: -30.0,
                scale: 0.5,
            },
        ];
        for t in tuples {
            assert_eq!(parse_transform(&build_transform(&t)), t);
        }
    }
}
