//! Global selection/hover state.
//!
//! Selection is UI state decoupled from any one document, and it holds
//! parse-scoped element identifiers, so it must be revalidated whenever
//! the active document's tree crosses a parse boundary.

use serde::Serialize;
use svgkit_dom::{NodeId, SvgDocument};

/// Selected and hovered elements of the active document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub element: Option<NodeId>,
    pub hovered: Option<NodeId>,
}

/// Selection transitions.
#[derive(Debug, Clone, Copy)]
pub enum SelectionCommand {
    /// Select an element (or clear with `None`); hover resets.
    Select(Option<NodeId>),
    Hover(Option<NodeId>),
    Clear,
}

impl Selection {
    pub fn apply(&mut self, command: SelectionCommand) {
        match command {
            SelectionCommand::Select(id) => {
                self.element = id;
                self.hovered = None;
            }
            SelectionCommand::Hover(id) => self.hovered = id,
            SelectionCommand::Clear => *self = Self::default(),
        }
    }

    /// Drop identifiers that no longer resolve in the given document.
    /// Stale ids are expected after any reparse, not an error.
    pub fn revalidate(&mut self, doc: &SvgDocument) {
        if let Some(id) = self.element {
            if doc.get_by_node_id(id).is_none() {
                self.element = None;
            }
        }
        if let Some(id) = self.hovered {
            if doc.get_by_node_id(id).is_none() {
                self.hovered = None;
            }
        }
    }
}
