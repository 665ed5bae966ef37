//! Sheet-side selector matching with CSS specificity.
//!
//! Matching operates on plain element data (tag, id attribute, class list)
//! so any tree representation can drive it. Supported: `*`, `tag`, `#id`,
//! `.class`, and compounds; combinators and pseudo-classes fall outside the
//! subset and never match.

use serde::Serialize;

/// A parsed compound selector.
#[derive(Debug, Clone, Serialize)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    universal: bool,
}

impl Selector {
    /// Parse one compound selector; `None` when outside the subset.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input.chars().any(char::is_whitespace) {
            return None;
        }
        let mut sel = Self {
            tag: None,
            id: None,
            classes: Vec::new(),
            universal: false,
        };
        let mut chars = input.chars().peekable();
        let mut first = true;
        while let Some(c) = chars.next() {
            match c {
                '*' if first => sel.universal = true,
                '#' | '.' => {
                    let mut name = String::new();
                    while let Some(n) = chars.peek() {
                        if is_name_char(*n) {
                            name.push(*n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if name.is_empty() {
                        return None;
                    }
                    if c == '#' {
                        sel.id = Some(name);
                    } else {
                        sel.classes.push(name);
                    }
                }
                _ if first && is_name_char(c) => {
                    let mut name = String::new();
                    name.push(c);
                    while let Some(n) = chars.peek() {
                        if is_name_char(*n) {
                            name.push(*n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    sel.tag = Some(name);
                }
                _ => return None,
            }
            first = false;
        }
        Some(sel)
    }

    /// Whether the selector matches element data.
    pub fn matches(&self, tag: &str, id: Option<&str>, classes: &[String]) -> bool {
        if let Some(t) = &self.tag {
            if !t.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(want) = &self.id {
            if id != Some(want.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| classes.iter().any(|e| e == c))
    }

    /// CSS specificity: id 100, class 10, tag 1.
    pub fn specificity(&self) -> u32 {
        let id = u32::from(self.id.is_some()) * 100;
        let classes = self.classes.len() as u32 * 10;
        let tag = u32::from(self.tag.is_some());
        id + classes + tag
    }
}

/// Parse a comma-separated selector list, dropping unsupported entries.
pub fn parse_selector_list(input: &str) -> Vec<Selector> {
    input.split(',').filter_map(Selector::parse).collect()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tag_match() {
        let sel = Selector::parse("circle").unwrap();
        assert!(sel.matches("circle", None, &[]));
        assert!(!sel.matches("rect", None, &[]));
        assert_eq!(sel.specificity(), 1);
    }

    #[test]
    fn id_match() {
        let sel = Selector::parse("#main").unwrap();
        assert!(sel.matches("circle", Some("main"), &[]));
        assert!(!sel.matches("circle", Some("other"), &[]));
        assert_eq!(sel.specificity(), 100);
    }

    #[test]
    fn class_match() {
        let sel = Selector::parse(".spinner").unwrap();
        assert!(sel.matches("g", None, &classes(&["spinner", "big"])));
        assert!(!sel.matches("g", None, &classes(&["other"])));
        assert_eq!(sel.specificity(), 10);
    }

    #[test]
    fn compound_match() {
        let sel = Selector::parse("circle.dot.red").unwrap();
        assert!(sel.matches("circle", None, &classes(&["red", "dot"])));
        assert!(!sel.matches("circle", None, &classes(&["dot"])));
        assert_eq!(sel.specificity(), 21);
    }

    #[test]
    fn universal_matches_everything() {
        let sel = Selector::parse("*").unwrap();
        assert!(sel.matches("anything", None, &[]));
        assert_eq!(sel.specificity(), 0);
    }

    #[test]
    fn combinators_unsupported() {
        assert!(Selector::parse("g circle").is_none());
        assert!(Selector::parse("g > circle").is_none());
    }

    #[test]
    fn list_parsing_drops_invalid() {
        let list = parse_selector_list(".a, g circle, rect");
        assert_eq!(list.len(), 2);
    }
}
