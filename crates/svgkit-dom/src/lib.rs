//! # SvgKit DOM
//!
//! Identity-tagging SVG document model for Motion Studio.
//! Uses quick-xml for parsing and constructs an owned, traversable tree.
//!
//! ## Design Goals
//!
//! 1. **Stable per-parse identity**: every element is stamped with a `NodeId`
//!    at parse time, unique within the parse, starting at 1 in document order
//! 2. **Lossless serialization**: markup round-trips with the identity marker
//!    stripped; namespaced attributes and embedded style text survive intact
//! 3. **Query support**: element lookup by id attribute, selector subset,
//!    and parse-scoped `NodeId`
//! 4. **Mutation support**: attribute/style edits, child creation, removal,
//!    reordering, all on the live tree with no implicit history
//!
//! Identifiers do not survive a parse boundary: serializing and re-parsing
//! reassigns every `NodeId` from 1. Holders of ids from a prior parse must
//! revalidate against the current one.

pub mod selector;

use quick_xml::events::Event;
use quick_xml::Reader;
use selector::SelectorList;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::debug;

/// The SVG declarative animation tag family.
pub const SMIL_TAGS: &[&str] = &["animate", "animateTransform", "animateMotion", "animateColor", "set"];

/// Returns true for members of the declarative animation tag family.
pub fn is_smil_tag(tag: &str) -> bool {
    SMIL_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Errors that can occur in document model operations.
#[derive(Error, Debug)]
pub enum DomError {
    #[error("parse error: input is empty")]
    EmptyInput,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),
}

/// Unique identifier for an element within one parsed tree.
///
/// Assigned in document order starting at 1; not stable across re-parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a NodeId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Parse the string form produced by `to_string`.
    pub fn parse(label: &str) -> Option<Self> {
        label.trim().parse().ok().map(Self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload of a tree node.
#[derive(Debug)]
pub enum NodeData {
    Element {
        tag_name: String,
        /// Attributes in document order, namespaced names kept verbatim.
        attributes: RefCell<Vec<(String, String)>>,
        id: NodeId,
    },
    Text(String),
    CData(String),
    Comment(String),
}

/// A node in the parsed tree.
#[derive(Debug)]
pub struct Node {
    data: NodeData,
    parent: RefCell<Option<Weak<Node>>>,
    children: RefCell<Vec<Rc<Node>>>,
}

impl Node {
    fn new(data: NodeData) -> Rc<Self> {
        Rc::new(Self {
            data,
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
        })
    }

    /// Get the tag name for element nodes.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    /// Get the parse-scoped identifier for element nodes.
    pub fn node_id(&self) -> Option<NodeId> {
        match &self.data {
            NodeData::Element { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Get an attribute value.
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        match &self.data {
            NodeData::Element { attributes, .. } => attributes
                .borrow()
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    /// Check whether an attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        match &self.data {
            NodeData::Element { attributes, .. } => {
                attributes.borrow().iter().any(|(n, _)| n == name)
            }
            _ => false,
        }
    }

    /// All attributes in document order. The identity marker is not an
    /// attribute and never appears here.
    pub fn attributes(&self) -> Vec<(String, String)> {
        match &self.data {
            NodeData::Element { attributes, .. } => attributes.borrow().clone(),
            _ => Vec::new(),
        }
    }

    /// Whitespace-separated class list.
    pub fn classes(&self) -> Vec<String> {
        self.get_attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Concatenated text content of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, result: &mut String) {
        match &self.data {
            NodeData::Text(text) | NodeData::CData(text) => result.push_str(text),
            NodeData::Comment(_) => {}
            NodeData::Element { .. } => {
                for child in self.children.borrow().iter() {
                    child.collect_text(result);
                }
            }
        }
    }

    /// Get parent node.
    pub fn parent(&self) -> Option<Rc<Node>> {
        self.parent.borrow().as_ref().and_then(|w| w.upgrade())
    }

    /// Get child nodes.
    pub fn children(&self) -> Vec<Rc<Node>> {
        self.children.borrow().clone()
    }

    /// Element children only.
    pub fn child_elements(&self) -> Vec<Rc<Node>> {
        self.children
            .borrow()
            .iter()
            .filter(|c| c.is_element())
            .cloned()
            .collect()
    }

    /// Check if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let NodeData::Element { attributes, .. } = &self.data {
            let mut attrs = attributes.borrow_mut();
            if let Some(entry) = attrs.iter_mut().find(|(n, _)| n == name) {
                entry.1 = value.to_string();
            } else {
                attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    fn remove_attribute(&self, name: &str) {
        if let NodeData::Element { attributes, .. } = &self.data {
            attributes.borrow_mut().retain(|(n, _)| n != name);
        }
    }

    fn append_child(self: &Rc<Self>, child: Rc<Node>) {
        *child.parent.borrow_mut() = Some(Rc::downgrade(self));
        self.children.borrow_mut().push(child);
    }
}

/// Per-document summary of size and animation surface.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentStats {
    /// All element descendants of the root (root excluded).
    pub element_count: usize,
    /// Declarative animation tags plus textual `@keyframes` occurrences.
    pub animation_count: usize,
    pub dimensions: Dimensions,
    /// Byte size of the serialized markup.
    pub size_bytes: usize,
}

/// Root dimensional attributes, numerically parsed where possible.
#[derive(Debug, Clone, Serialize)]
pub struct Dimensions {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub view_box: Option<String>,
}

/// A parsed SVG document with identity-tagged elements.
///
/// Mutators operate on the live tree only; serialization and history are the
/// caller's concern. Mutators return `&Self` to permit chaining.
#[derive(Debug)]
pub struct SvgDocument {
    root: Rc<Node>,
    nodes: RefCell<HashMap<NodeId, Rc<Node>>>,
    next_id: Cell<u64>,
}

impl SvgDocument {
    /// Parse SVG markup into a document.
    ///
    /// Fails on empty/whitespace-only input, on reader syntax errors, and
    /// when the root element is not `<svg>`. On success every element (root
    /// included) carries a fresh `NodeId`, 1-based in document order.
    pub fn parse(markup: &str) -> Result<Self, DomError> {
        if markup.trim().is_empty() {
            return Err(DomError::EmptyInput);
        }
        debug!(len = markup.len(), "parsing SVG");

        let mut reader = Reader::from_str(markup);
        reader.config_mut().expand_empty_elements = true;

        let mut nodes: HashMap<NodeId, Rc<Node>> = HashMap::new();
        let mut next_id: u64 = 1;
        let mut stack: Vec<Rc<Node>> = Vec::new();
        let mut root: Option<Rc<Node>> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(DomError::Parse("multiple root elements".into()));
                    }
                    let tag_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    let mut attributes = Vec::new();
                    for attr in start.attributes() {
                        let attr = attr.map_err(|e| DomError::Parse(e.to_string()))?;
                        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                        let value = attr
                            .unescape_value()
                            .map_err(|e| DomError::Parse(e.to_string()))?
                            .into_owned();
                        attributes.push((name, value));
                    }
                    let id = NodeId::new(next_id);
                    next_id += 1;
                    let node = Node::new(NodeData::Element {
                        tag_name,
                        attributes: RefCell::new(attributes),
                        id,
                    });
                    nodes.insert(id, node.clone());
                    if let Some(parent) = stack.last() {
                        parent.append_child(node.clone());
                    } else {
                        root = Some(node.clone());
                    }
                    stack.push(node);
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(Event::Text(text)) => {
                    let text = text
                        .unescape()
                        .map_err(|e| DomError::Parse(e.to_string()))?
                        .into_owned();
                    match stack.last() {
                        Some(parent) => parent.append_child(Node::new(NodeData::Text(text))),
                        None => {
                            if !text.trim().is_empty() {
                                return Err(DomError::Parse(
                                    "text content outside of root element".into(),
                                ));
                            }
                        }
                    }
                }
                Ok(Event::CData(cdata)) => {
                    let text = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    if let Some(parent) = stack.last() {
                        parent.append_child(Node::new(NodeData::CData(text)));
                    }
                }
                Ok(Event::Comment(comment)) => {
                    let text = String::from_utf8_lossy(&comment.into_inner()).into_owned();
                    if let Some(parent) = stack.last() {
                        parent.append_child(Node::new(NodeData::Comment(text)));
                    }
                }
                Ok(Event::Decl(_)) | Ok(Event::DocType(_)) | Ok(Event::PI(_)) => {}
                Ok(Event::Eof) => break,
                Ok(Event::Empty(_)) => {
                    // expand_empty_elements rewrites these as Start/End pairs
                }
                Err(e) => return Err(DomError::Parse(e.to_string())),
            }
        }

        if !stack.is_empty() {
            return Err(DomError::Parse("unexpected end of input".into()));
        }
        let root = root.ok_or_else(|| DomError::Parse("no root element found".into()))?;
        let root_tag = root.tag_name().unwrap_or_default().to_string();
        if local_name(&root_tag) != "svg" {
            return Err(DomError::NotSvg(root_tag));
        }

        debug!(node_count = nodes.len(), "SVG parsed");
        Ok(Self {
            root,
            nodes: RefCell::new(nodes),
            next_id: Cell::new(next_id),
        })
    }

    /// The root `<svg>` element.
    pub fn root(&self) -> &Rc<Node> {
        &self.root
    }

    /// First element in document order (root included) whose `id` attribute
    /// matches. Returns `None` on a miss.
    pub fn get_element_by_id(&self, id: &str) -> Option<Rc<Node>> {
        let mut found = None;
        self.traverse(|node| {
            if found.is_none() && node.get_attribute("id").as_deref() == Some(id) {
                found = Some(node.clone());
            }
        });
        found
    }

    /// Resolve a parse-scoped identifier to its element.
    ///
    /// Ids minted by a prior parse, or belonging to elements removed from the
    /// tree, miss with `None` rather than erroring.
    pub fn get_by_node_id(&self, id: NodeId) -> Option<Rc<Node>> {
        let node = self.nodes.borrow().get(&id).cloned()?;
        self.is_connected(&node).then_some(node)
    }

    /// First descendant of the root matching the selector.
    ///
    /// Selector subset: `*`, `tag`, `#id`, `.class`, `[attr]`, `[attr="v"]`,
    /// compounds thereof, and comma-separated lists.
    pub fn query_selector(&self, selector: &str) -> Option<Rc<Node>> {
        self.query_selector_all(selector).into_iter().next()
    }

    /// All descendants of the root matching the selector, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Vec<Rc<Node>> {
        let Some(list) = SelectorList::parse(selector) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for child in self.root.children() {
            collect_matches(&child, &list, &mut out);
        }
        out
    }

    /// Visit every element (root included) in document order.
    pub fn traverse<F>(&self, mut callback: F)
    where
        F: FnMut(&Rc<Node>),
    {
        visit_elements(&self.root, &mut callback);
    }

    /// Attributes of an element as ordered name/value pairs. The identity
    /// marker is internal and never included.
    pub fn attributes(&self, node: &Rc<Node>) -> Vec<(String, String)> {
        node.attributes()
    }

    // ==================== Mutators ====================

    /// Set a single attribute on the live tree.
    pub fn set_attribute(&self, node: &Rc<Node>, name: &str, value: &str) -> &Self {
        node.set_attribute(name, value);
        self
    }

    /// Remove a single attribute from the live tree.
    pub fn remove_attribute(&self, node: &Rc<Node>, name: &str) -> &Self {
        node.remove_attribute(name);
        self
    }

    /// Upsert one declaration inside the element's `style` attribute.
    /// Property names are kebab-case CSS names.
    pub fn set_style(&self, node: &Rc<Node>, property: &str, value: &str) -> &Self {
        let existing = node.get_attribute("style").unwrap_or_default();
        let mut decls: Vec<(String, String)> = existing
            .split(';')
            .filter_map(|d| {
                let (p, v) = d.split_once(':')?;
                let (p, v) = (p.trim(), v.trim());
                (!p.is_empty()).then(|| (p.to_string(), v.to_string()))
            })
            .collect();
        let property = property.trim();
        if let Some(entry) = decls.iter_mut().find(|(p, _)| p.eq_ignore_ascii_case(property)) {
            entry.1 = value.to_string();
        } else {
            decls.push((property.to_string(), value.to_string()));
        }
        let rendered = decls
            .iter()
            .map(|(p, v)| format!("{p}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        node.set_attribute("style", &rendered);
        self
    }

    /// Create an element with the given tag and attributes, stamp it with the
    /// next identifier from this document's counter, and append it to
    /// `parent`. The new id is distinct from every id in this instance.
    pub fn add_child(&self, parent: &Rc<Node>, tag: &str, attrs: &[(&str, &str)]) -> Rc<Node> {
        let id = NodeId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        let node = Node::new(NodeData::Element {
            tag_name: tag.to_string(),
            attributes: RefCell::new(
                attrs
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect(),
            ),
            id,
        });
        self.nodes.borrow_mut().insert(id, node.clone());
        parent.append_child(node.clone());
        node
    }

    /// Detach an element from its parent. Detached ids no longer resolve.
    pub fn remove_element(&self, node: &Rc<Node>) -> &Self {
        if let Some(parent) = node.parent() {
            parent
                .children
                .borrow_mut()
                .retain(|c| !Rc::ptr_eq(c, node));
            *node.parent.borrow_mut() = None;
        }
        self
    }

    /// Reposition `node` immediately before `reference` (same parent as the
    /// reference). No-op when the reference has no parent.
    pub fn insert_before(&self, node: &Rc<Node>, reference: &Rc<Node>) -> &Self {
        if Rc::ptr_eq(node, reference) {
            return self;
        }
        let Some(parent) = reference.parent() else {
            return self;
        };
        self.remove_element(node);
        let mut children = parent.children.borrow_mut();
        let idx = children
            .iter()
            .position(|c| Rc::ptr_eq(c, reference))
            .unwrap_or(children.len());
        children.insert(idx, node.clone());
        drop(children);
        *node.parent.borrow_mut() = Some(Rc::downgrade(&parent));
        self
    }

    // ==================== Output ====================

    /// Render the tree back to markup. The identity marker never appears in
    /// the output; the result is safe to re-parse, persist, or copy out.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        render_node(&self.root, &mut out);
        debug!(len = out.len(), "SVG serialized");
        out
    }

    /// Fully independent copy: a fresh parse of `serialize()`. Identifiers
    /// are reassigned from 1 in the clone.
    pub fn clone_document(&self) -> Result<Self, DomError> {
        Self::parse(&self.serialize())
    }

    /// Summary statistics for the current tree.
    pub fn stats(&self) -> DocumentStats {
        let mut element_count = 0usize;
        let mut smil_count = 0usize;
        let mut keyframes_count = 0usize;
        self.traverse(|node| {
            if Rc::ptr_eq(node, &self.root) {
                return;
            }
            element_count += 1;
            let tag = node.tag_name().unwrap_or_default();
            if is_smil_tag(tag) {
                smil_count += 1;
            }
            if tag == "style" {
                keyframes_count += count_keyframes(&node.text_content());
            }
        });
        let serialized = self.serialize();
        DocumentStats {
            element_count,
            animation_count: smil_count + keyframes_count,
            dimensions: Dimensions {
                width: self
                    .root
                    .get_attribute("width")
                    .as_deref()
                    .and_then(parse_float_prefix),
                height: self
                    .root
                    .get_attribute("height")
                    .as_deref()
                    .and_then(parse_float_prefix),
                view_box: self.root.get_attribute("viewBox"),
            },
            size_bytes: serialized.len(),
        }
    }

    fn is_connected(&self, node: &Rc<Node>) -> bool {
        let mut current = node.clone();
        loop {
            if Rc::ptr_eq(&current, &self.root) {
                return true;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

fn visit_elements<F>(node: &Rc<Node>, callback: &mut F)
where
    F: FnMut(&Rc<Node>),
{
    if node.is_element() {
        callback(node);
    }
    for child in node.children() {
        visit_elements(&child, callback);
    }
}

fn collect_matches(node: &Rc<Node>, list: &SelectorList, out: &mut Vec<Rc<Node>>) {
    if node.is_element() && list.matches(node) {
        out.push(node.clone());
    }
    for child in node.children() {
        collect_matches(&child, list, out);
    }
}

fn local_name(tag: &str) -> &str {
    tag.rsplit(':').next().unwrap_or(tag)
}

/// Count `@keyframes` at-rule occurrences in style text (textual count).
fn count_keyframes(text: &str) -> usize {
    text.match_indices("@keyframes")
        .filter(|(i, m)| {
            text[i + m.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_whitespace())
        })
        .count()
}

/// Leading-float parse with `parseFloat` semantics: consumes an optional
/// sign, digits, one dot, and an exponent; trailing junk ("100px") is
/// ignored. `None` when no number leads the string.
fn parse_float_prefix(s: &str) -> Option<f64> {
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

fn render_node(node: &Rc<Node>, out: &mut String) {
    match &node.data {
        NodeData::Element {
            tag_name,
            attributes,
            ..
        } => {
            out.push('<');
            out.push_str(tag_name);
            for (name, value) in attributes.borrow().iter() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(out, value, true);
                out.push('"');
            }
            let children = node.children.borrow();
            if children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in children.iter() {
                    render_node(child, out);
                }
                out.push_str("</");
                out.push_str(tag_name);
                out.push('>');
            }
        }
        NodeData::Text(text) => escape_into(out, text, false),
        NodeData::CData(text) => {
            out.push_str("<![CDATA[");
            out.push_str(text);
            out.push_str("]]>");
        }
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

fn escape_into(out: &mut String, text: &str, quote: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quote => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
