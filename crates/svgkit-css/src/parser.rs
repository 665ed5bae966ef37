//! Stylesheet and declaration parsing.
//!
//! A small author-CSS parser: qualified rules `selector { prop: value; }`,
//! `@keyframes` capture (name + raw body, since keyframe internals are not
//! evaluated here), other at-rules skipped with balanced braces. Not a full
//! CSS parser.

use crate::CssError;
use tracing::debug;

/// A parsed stylesheet.
#[derive(Debug, Default, Clone)]
pub struct Stylesheet {
    pub rules: Vec<StyleRule>,
    pub keyframes: Vec<KeyframesRule>,
}

/// A qualified rule.
#[derive(Debug, Clone)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

/// A single declaration.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// An `@keyframes` at-rule, body kept verbatim.
#[derive(Debug, Clone)]
pub struct KeyframesRule {
    pub name: String,
    pub body: String,
}

/// Parse a stylesheet.
///
/// Unknown at-rules are skipped without corrupting the rules around them;
/// an unclosed block is an error.
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, CssError> {
    let css = strip_comments(css);
    let mut out = Stylesheet::default();
    let mut rest = css.as_str();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if rest.starts_with('@') {
            let brace = rest.find('{');
            let semi = rest.find(';');
            match (brace, semi) {
                // statement at-rule (@import ...;), skip it
                (None, Some(s)) => rest = &rest[s + 1..],
                (Some(b), Some(s)) if s < b => rest = &rest[s + 1..],
                (Some(b), _) => {
                    let prelude = rest[..b].trim();
                    let (body, after) = read_block(&rest[b..]).ok_or(CssError::UnexpectedEof)?;
                    if let Some(name) = prelude.strip_prefix("@keyframes") {
                        let name = name.trim();
                        if !name.is_empty() {
                            out.keyframes.push(KeyframesRule {
                                name: name.to_string(),
                                body: body.trim().to_string(),
                            });
                        }
                    }
                    rest = after;
                }
                (None, None) => return Err(CssError::UnexpectedEof),
            }
            continue;
        }

        let Some(brace) = rest.find('{') else {
            // trailing junk without a block
            break;
        };
        let selector = rest[..brace].trim().to_string();
        let (body, after) = read_block(&rest[brace..]).ok_or(CssError::UnexpectedEof)?;
        let declarations = parse_declarations(body);
        if !selector.is_empty() && !declarations.is_empty() {
            out.rules.push(StyleRule {
                selector,
                declarations,
            });
        }
        rest = after;
    }

    debug!(
        rule_count = out.rules.len(),
        keyframes_count = out.keyframes.len(),
        "stylesheet parsed"
    );
    Ok(out)
}

/// Parse a run of `prop: value;` declarations (inline `style` attribute
/// text or a rule body). Malformed entries are dropped.
pub fn parse_declarations(text: &str) -> Vec<Declaration> {
    text.split(';')
        .filter_map(|entry| {
            let (property, value) = entry.split_once(':')?;
            let property = property.trim();
            let value_raw = value.trim();
            if property.is_empty() || value_raw.is_empty() {
                return None;
            }
            let (value, important) = strip_important(value_raw);
            Some(Declaration {
                property: property.to_string(),
                value: value.to_string(),
                important,
            })
        })
        .collect()
}

/// Given input starting at `{`, return (inner body, rest after the matching
/// `}`). `None` when braces never balance.
fn read_block(s: &str) -> Option<(&str, &str)> {
    debug_assert!(s.starts_with('{'));
    let mut depth = 0usize;
    for (idx, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&s[1..idx], &s[idx + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

fn strip_important(value: &str) -> (&str, bool) {
    let lower = value.to_ascii_lowercase();
    if let Some(idx) = lower.rfind("!important") {
        (value[..idx].trim_end(), true)
    } else {
        (value, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_stylesheet() {
        let css = r#"
            circle { fill: black; }
            .spinner { stroke: red; stroke-width: 2 !important; }
        "#;
        let sheet = parse_stylesheet(css).unwrap();
        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(sheet.rules[0].selector, "circle");
        assert_eq!(sheet.rules[0].declarations.len(), 1);
        assert_eq!(sheet.rules[1].selector, ".spinner");
        assert_eq!(sheet.rules[1].declarations.len(), 2);
        assert!(sheet.rules[1].declarations[1].important);
    }

    #[test]
    fn parse_with_comments() {
        let css = r#"
            /* comment */
            circle { fill: black; /* inside */ opacity: 0.5; }
        "#;
        let sheet = parse_stylesheet(css).unwrap();
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].declarations.len(), 2);
    }

    #[test]
    fn captures_keyframes_without_corrupting_rules() {
        let css = r#"
            @keyframes spin { from { transform: rotate(0deg); } to { transform: rotate(360deg); } }
            .spinner { animation: spin 2s linear infinite; }
            @keyframes fade { 0% { opacity: 1; } 100% { opacity: 0; } }
        "#;
        let sheet = parse_stylesheet(css).unwrap();
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].selector, ".spinner");
        let names: Vec<&str> = sheet.keyframes.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, ["spin", "fade"]);
        assert!(sheet.keyframes[0].body.contains("rotate(360deg)"));
    }

    #[test]
    fn skips_statement_and_unknown_at_rules() {
        let css = r#"
            @import url("theme.css");
            @media (max-width: 600px) { circle { r: 1; } }
            rect { fill: blue; }
        "#;
        let sheet = parse_stylesheet(css).unwrap();
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].selector, "rect");
    }

    #[test]
    fn unclosed_block_is_error() {
        let err = parse_stylesheet("circle { fill: black;").unwrap_err();
        assert!(matches!(err, CssError::UnexpectedEof));
    }

    #[test]
    fn parse_inline_declarations() {
        let decls = parse_declarations("fill: red; ; stroke-width: 2");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].property, "fill");
        assert_eq!(decls[1].value, "2");
    }
}
