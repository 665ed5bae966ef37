//! The inspector query surface: what editing panels read from a document.

use crate::store::EditorDocument;
use std::rc::Rc;
use svgkit_animation::{detect_animations, AnimationInfo, StyleResolver};
use svgkit_css::CompatProfile;
use svgkit_dom::{DocumentStats, NodeId};

impl EditorDocument {
    /// Attribute map of an element; empty on a stale or unknown id.
    pub fn attribute_map(&self, id: NodeId) -> Vec<(String, String)> {
        self.doc
            .get_by_node_id(id)
            .map(|node| node.attributes())
            .unwrap_or_default()
    }

    /// Ancestor tag names of an element: root first, nearest ancestor last,
    /// the element itself excluded. Empty on a stale id.
    pub fn parent_chain(&self, id: NodeId) -> Vec<String> {
        let Some(node) = self.doc.get_by_node_id(id) else {
            return Vec::new();
        };
        let mut chain = Vec::new();
        let mut current = node.parent();
        while let Some(ancestor) = current {
            if let Some(tag) = ancestor.tag_name() {
                chain.push(tag.to_string());
            }
            current = ancestor.parent();
        }
        chain.reverse();
        chain
    }

    /// Fresh detection pass over the whole document.
    pub fn animations(
        &self,
        resolver: &dyn StyleResolver,
        profile: &dyn CompatProfile,
    ) -> Vec<AnimationInfo> {
        detect_animations(&self.doc, resolver, profile)
    }

    /// Detected animations that declare on or target the given element.
    pub fn animations_for(
        &self,
        id: NodeId,
        resolver: &dyn StyleResolver,
        profile: &dyn CompatProfile,
    ) -> Vec<AnimationInfo> {
        self.animations(resolver, profile)
            .into_iter()
            .filter(|a| a.node_id == id || a.target_id == Some(id))
            .collect()
    }

    /// Document-level statistics.
    pub fn stats(&self) -> DocumentStats {
        self.doc.stats()
    }

    /// Resolve an element id against the current parse.
    pub fn element(&self, id: NodeId) -> Option<Rc<svgkit_dom::Node>> {
        self.doc.get_by_node_id(id)
    }
}
