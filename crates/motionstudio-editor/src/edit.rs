//! Inline-edit commit policy.
//!
//! Attribute edits commit at interaction end (Enter/blur). A numeric-typed
//! attribute rejects input that does not parse as a number by reverting to
//! the stored value. That is a local recoverable condition, not an error.
//! Transform edits go through the structured decode/encode pair; an
//! all-identity transform removes the attribute.

use svgkit_css::{build_transform, classify_attribute, AttrKind, Transform2D};
use svgkit_dom::{NodeId, SvgDocument};

/// What happened to a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The value was written to the live tree.
    Committed,
    /// The edit was rejected; the stored value is unchanged.
    Reverted,
}

/// Commit a typed attribute value against the validation rule for its
/// attribute kind. Stale element ids revert (the stored value is gone with
/// the old parse, nothing to write).
pub fn commit_attribute_edit(
    doc: &SvgDocument,
    id: NodeId,
    name: &str,
    typed: &str,
) -> EditOutcome {
    let Some(element) = doc.get_by_node_id(id) else {
        return EditOutcome::Reverted;
    };
    if matches!(classify_attribute(name), AttrKind::Numeric) {
        let trimmed = typed.trim();
        if !trimmed.is_empty() && trimmed.parse::<f64>().is_err() {
            return EditOutcome::Reverted;
        }
    }
    doc.set_attribute(&element, name, typed);
    EditOutcome::Committed
}

/// Commit a structured transform edit. Identity encodes to nothing, which
/// removes the attribute.
pub fn commit_transform_edit(doc: &SvgDocument, id: NodeId, transform: &Transform2D) -> EditOutcome {
    let Some(element) = doc.get_by_node_id(id) else {
        return EditOutcome::Reverted;
    };
    let rendered = build_transform(transform);
    if rendered.is_empty() {
        doc.remove_attribute(&element, "transform");
    } else {
        doc.set_attribute(&element, "transform", &rendered);
    }
    EditOutcome::Committed
}
