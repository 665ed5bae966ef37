//! Selector matching over the parsed tree.
//!
//! Supports the subset the editing surfaces actually issue: `*`, `tag`,
//! `#id`, `.class`, `[attr]`, `[attr="value"]`, compounds of those
//! (`circle.spinner`), and comma-separated lists. Combinators are not
//! supported; an unparseable selector matches nothing rather than erroring.

use crate::Node;
use std::rc::Rc;

/// A comma-separated list of compound selectors.
#[derive(Debug, Clone)]
pub struct SelectorList {
    selectors: Vec<Compound>,
}

#[derive(Debug, Clone)]
struct Compound {
    parts: Vec<Part>,
}

#[derive(Debug, Clone)]
enum Part {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    AttrPresent(String),
    AttrEq(String, String),
}

impl SelectorList {
    /// Parse a selector list. Selectors that fall outside the supported
    /// subset are dropped; `None` when nothing usable remains.
    pub fn parse(input: &str) -> Option<Self> {
        let selectors: Vec<Compound> = input
            .split(',')
            .filter_map(|s| Compound::parse(s.trim()))
            .collect();
        (!selectors.is_empty()).then_some(Self { selectors })
    }

    /// Whether the element matches any selector in the list.
    pub fn matches(&self, node: &Rc<Node>) -> bool {
        self.selectors.iter().any(|s| s.matches(node))
    }
}

impl Compound {
    fn parse(input: &str) -> Option<Self> {
        if input.is_empty() || input.chars().any(char::is_whitespace) {
            return None;
        }
        let mut parts = Vec::new();
        let mut chars = input.char_indices().peekable();
        while let Some((idx, c)) = chars.next() {
            match c {
                '*' => parts.push(Part::Universal),
                '#' | '.' => {
                    let name: String = take_while(&mut chars, is_name_char);
                    if name.is_empty() {
                        return None;
                    }
                    parts.push(if c == '#' {
                        Part::Id(name)
                    } else {
                        Part::Class(name)
                    });
                }
                '[' => {
                    let rest = &input[idx + 1..];
                    let close = rest.find(']')?;
                    let inner = &rest[..close];
                    for _ in 0..inner.chars().count() + 1 {
                        chars.next();
                    }
                    parts.push(parse_attr_part(inner)?);
                }
                _ if is_name_char(c) => {
                    if !parts.is_empty() {
                        return None;
                    }
                    let mut name = String::new();
                    name.push(c);
                    name.push_str(&take_while(&mut chars, is_name_char));
                    parts.push(Part::Tag(name));
                }
                _ => return None,
            }
        }
        (!parts.is_empty()).then_some(Self { parts })
    }

    fn matches(&self, node: &Rc<Node>) -> bool {
        self.parts.iter().all(|part| match part {
            Part::Universal => true,
            Part::Tag(tag) => node
                .tag_name()
                .is_some_and(|t| t.eq_ignore_ascii_case(tag)),
            Part::Id(id) => node.get_attribute("id").as_deref() == Some(id.as_str()),
            Part::Class(class) => node.classes().iter().any(|c| c == class),
            Part::AttrPresent(name) => node.has_attribute(name),
            Part::AttrEq(name, value) => {
                node.get_attribute(name).as_deref() == Some(value.as_str())
            }
        })
    }
}

fn parse_attr_part(inner: &str) -> Option<Part> {
    match inner.split_once('=') {
        None => {
            let name = inner.trim();
            (!name.is_empty()).then(|| Part::AttrPresent(name.to_string()))
        }
        Some((name, value)) => {
            let name = name.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (!name.is_empty()).then(|| Part::AttrEq(name.to_string(), value.to_string()))
        }
    }
}

fn take_while(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    pred: impl Fn(char) -> bool,
) -> String {
    let mut out = String::new();
    while let Some((_, c)) = chars.peek() {
        if pred(*c) {
            out.push(*c);
            chars.next();
        } else {
            break;
        }
    }
    out
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SvgDocument;

    const DOC: &str = r#"<svg><g class="layer top"><circle id="a" class="dot" fill="red"/><circle id="b" fill="none"/></g><rect id="a2" class="dot"/></svg>"#;

    #[test]
    fn tag_selector() {
        let doc = SvgDocument::parse(DOC).unwrap();
        assert_eq!(doc.query_selector_all("circle").len(), 2);
    }

    #[test]
    fn id_selector() {
        let doc = SvgDocument::parse(DOC).unwrap();
        let el = doc.query_selector("#b").unwrap();
        assert_eq!(el.tag_name(), Some("circle"));
    }

    #[test]
    fn class_selector_matches_any_class() {
        let doc = SvgDocument::parse(DOC).unwrap();
        assert_eq!(doc.query_selector_all(".dot").len(), 2);
        assert_eq!(doc.query_selector_all(".top").len(), 1);
    }

    #[test]
    fn compound_selector() {
        let doc = SvgDocument::parse(DOC).unwrap();
        let hits = doc.query_selector_all("circle.dot");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].get_attribute("id").as_deref(), Some("a"));
    }

    #[test]
    fn attribute_selectors() {
        let doc = SvgDocument::parse(DOC).unwrap();
        assert_eq!(doc.query_selector_all("[fill]").len(), 2);
        assert_eq!(doc.query_selector_all(r#"[fill="none"]"#).len(), 1);
    }

    #[test]
    fn selector_list_unions() {
        let doc = SvgDocument::parse(DOC).unwrap();
        assert_eq!(doc.query_selector_all("rect, circle").len(), 3);
    }

    #[test]
    fn universal_selector() {
        let doc = SvgDocument::parse(DOC).unwrap();
        // descendants only, the root svg is excluded
        assert_eq!(doc.query_selector_all("*").len(), 4);
    }

    #[test]
    fn unsupported_selector_matches_nothing() {
        let doc = SvgDocument::parse(DOC).unwrap();
        assert!(doc.query_selector_all("g circle").is_empty());
        assert!(doc.query_selector_all("").is_empty());
    }

    #[test]
    fn smil_tag_case_insensitive() {
        let doc =
            SvgDocument::parse(r#"<svg><animateTransform attributeName="transform"/></svg>"#)
                .unwrap();
        assert_eq!(doc.query_selector_all("animateTransform").len(), 1);
        assert_eq!(doc.query_selector_all("animatetransform").len(), 1);
    }
}
