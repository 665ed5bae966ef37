//! # SvgKit History
//!
//! Linear undo/redo over markup snapshots, with transactional batching.
//!
//! `History` is a persistent value: every operation returns a new instance
//! (or an equal value for no-ops) and never mutates the receiver, so
//! instances can be shared freely across a rendered view tree. Snapshots are
//! `Arc<str>`, shared structurally between generations rather than cloned.
//!
//! Batching collapses a run of intermediate edits into one undo step: the
//! anchor recorded at `begin_batch` becomes the "before" state, whatever
//! intermediate values existed are never recorded. A batch that is never
//! committed simply leaves the anchor unconsumed.

use std::sync::Arc;
use tracing::trace;

/// Default maximum retained undo depth.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Immutable undo/redo chain for one document's markup.
#[derive(Debug, Clone)]
pub struct History {
    past: Vec<Arc<str>>,
    present: Arc<str>,
    future: Vec<Arc<str>>,
    max_depth: usize,
    batch_anchor: Option<Arc<str>>,
}

impl History {
    /// Start a history at the given snapshot with the default depth cap.
    pub fn new(initial: &str) -> Self {
        Self::with_max_depth(initial, DEFAULT_MAX_DEPTH)
    }

    /// Start a history with an explicit depth cap.
    pub fn with_max_depth(initial: &str, max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            present: Arc::from(initial),
            future: Vec::new(),
            max_depth,
            batch_anchor: None,
        }
    }

    /// The present snapshot.
    pub fn current(&self) -> &str {
        &self.present
    }

    /// Whether an undo step exists.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether a redo step exists.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// (past, future) depths.
    pub fn depth(&self) -> (usize, usize) {
        (self.past.len(), self.future.len())
    }

    /// Whether a batch anchor is currently recorded.
    pub fn is_batching(&self) -> bool {
        self.batch_anchor.is_some()
    }

    /// Record a new snapshot. Pushing the present value is an identity-
    /// preserving no-op. Any real push moves the present into the past
    /// (evicting the oldest entry past the depth cap) and discards the
    /// redo branch.
    pub fn push(&self, new_src: &str) -> Self {
        if *self.present == *new_src {
            return self.clone();
        }
        trace!(len = new_src.len(), "history push");
        let mut past = self.past.clone();
        past.push(self.present.clone());
        evict(&mut past, self.max_depth);
        Self {
            past,
            present: Arc::from(new_src),
            future: Vec::new(),
            max_depth: self.max_depth,
            batch_anchor: None,
        }
    }

    /// Step back one snapshot; no-op when the past is empty.
    pub fn undo(&self) -> Self {
        if !self.can_undo() {
            return self.clone();
        }
        trace!("history undo");
        let mut past = self.past.clone();
        let previous = past.pop().unwrap_or_else(|| self.present.clone());
        let mut future = Vec::with_capacity(self.future.len() + 1);
        future.push(self.present.clone());
        future.extend(self.future.iter().cloned());
        Self {
            past,
            present: previous,
            future,
            max_depth: self.max_depth,
            batch_anchor: None,
        }
    }

    /// Step forward one snapshot; no-op when the future is empty.
    pub fn redo(&self) -> Self {
        if !self.can_redo() {
            return self.clone();
        }
        trace!("history redo");
        let mut future = self.future.clone();
        let next = future.remove(0);
        let mut past = self.past.clone();
        past.push(self.present.clone());
        Self {
            past,
            present: next,
            future,
            max_depth: self.max_depth,
            batch_anchor: None,
        }
    }

    /// Record the present snapshot as the batch anchor. Past and future are
    /// untouched; `current` is unchanged.
    pub fn begin_batch(&self) -> Self {
        Self {
            past: self.past.clone(),
            present: self.present.clone(),
            future: self.future.clone(),
            max_depth: self.max_depth,
            batch_anchor: Some(self.present.clone()),
        }
    }

    /// Close the batch with the final snapshot. Equal-to-anchor commits are
    /// no-ops on past/future; otherwise this behaves like `push(final_src)`
    /// with the anchor (not the call-time present) as the recorded
    /// "before" state.
    pub fn commit_batch(&self, final_src: &str) -> Self {
        let anchor = self
            .batch_anchor
            .clone()
            .unwrap_or_else(|| self.present.clone());
        if *anchor == *final_src {
            return Self {
                past: self.past.clone(),
                present: anchor,
                future: self.future.clone(),
                max_depth: self.max_depth,
                batch_anchor: None,
            };
        }
        trace!(len = final_src.len(), "history batch commit");
        let mut past = self.past.clone();
        past.push(anchor);
        evict(&mut past, self.max_depth);
        Self {
            past,
            present: Arc::from(final_src),
            future: Vec::new(),
            max_depth: self.max_depth,
            batch_anchor: None,
        }
    }
}

impl PartialEq for History {
    fn eq(&self, other: &Self) -> bool {
        self.past == other.past
            && self.present == other.present
            && self.future == other.future
            && self.max_depth == other.max_depth
            && self.batch_anchor == other.batch_anchor
    }
}

impl Eq for History {}

fn evict(past: &mut Vec<Arc<str>>, max_depth: usize) {
    if past.len() > max_depth {
        let excess = past.len() - max_depth;
        past.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = r#"<svg><circle r="1"/></svg>"#;
    const B: &str = r#"<svg><circle r="2"/></svg>"#;
    const C: &str = r#"<svg><circle r="3"/></svg>"#;
    const D: &str = r#"<svg><circle r="4"/></svg>"#;
    const E: &str = r#"<svg><circle r="5"/></svg>"#;

    #[test]
    fn starts_empty() {
        let h = History::new(A);
        assert_eq!(h.current(), A);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.depth(), (0, 0));
    }

    #[test]
    fn push_moves_present_into_past() {
        let h = History::new(A).push(B);
        assert_eq!(h.current(), B);
        assert!(h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn push_is_immutable() {
        let h1 = History::new(A);
        let h2 = h1.push(B);
        assert_eq!(h1.current(), A);
        assert!(!h1.can_undo());
        assert_eq!(h2.current(), B);
    }

    #[test]
    fn push_identical_is_noop() {
        let h = History::new(A);
        let same = h.push(A);
        assert_eq!(same, h);
        assert_eq!(same.depth(), (0, 0));
    }

    #[test]
    fn undo_restores_previous() {
        let h = History::new(A).push(B).undo();
        assert_eq!(h.current(), A);
        assert!(h.can_redo());
    }

    #[test]
    fn undo_on_empty_past_is_noop() {
        let h = History::new(A);
        assert_eq!(h.undo(), h);
    }

    #[test]
    fn redo_on_empty_future_is_noop() {
        let h = History::new(A).push(B);
        assert_eq!(h.redo(), h);
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let h = History::new(A).push(B);
        let back = h.undo().redo();
        assert_eq!(back.current(), B);
        assert!(!back.can_redo());
    }

    // push r=2 and r=3, walk all the way back and forward again
    #[test]
    fn undo_redo_scenario() {
        let h = History::new(A).push(B).push(C);

        let h = h.undo();
        assert_eq!(h.current(), B);
        assert!(h.can_redo());

        let h = h.undo();
        assert_eq!(h.current(), A);
        assert!(!h.can_undo());

        let h = h.redo().redo();
        assert_eq!(h.current(), C);
        assert!(!h.can_redo());
    }

    #[test]
    fn push_clears_redo_branch() {
        let h = History::new(A).push(B).push(C).undo();
        assert!(h.can_redo());
        let forked = h.push(D);
        assert_eq!(forked.current(), D);
        assert!(!forked.can_redo());
        // undo walks A <- B <- D
        let back = forked.undo();
        assert_eq!(back.current(), B);
        assert_eq!(back.undo().current(), A);
    }

    #[test]
    fn past_capped_at_max_depth_oldest_evicted() {
        let mut h = History::with_max_depth(A, 5);
        let extra = [
            r#"<svg><rect width="1"/></svg>"#,
            r#"<svg><rect width="2"/></svg>"#,
            r#"<svg><rect width="3"/></svg>"#,
            r#"<svg><rect width="4"/></svg>"#,
        ];
        for src in [B, C, D, E].into_iter().chain(extra) {
            h = h.push(src);
        }
        assert_eq!(h.depth().0, 5);
        let mut undone = h;
        for _ in 0..5 {
            undone = undone.undo();
        }
        assert!(!undone.can_undo());
        // A, B, C were evicted; the floor is D
        assert_eq!(undone.current(), D);
    }

    #[test]
    fn batch_collapses_to_single_undo_step() {
        let h = History::new(A).push(B);
        let batching = h.begin_batch();
        assert!(batching.is_batching());
        assert_eq!(batching.current(), B);
        assert_eq!(batching.depth(), h.depth());

        let committed = batching.commit_batch(E);
        assert_eq!(committed.current(), E);
        assert!(!committed.is_batching());
        assert_eq!(committed.undo().current(), B);
    }

    // intermediate values never enter the past
    #[test]
    fn batch_records_anchor_not_intermediates() {
        let h = History::new(A).begin_batch();
        // intermediate updates (r=2) happen on the live tree only; the
        // history sees nothing until commit
        let committed = h.commit_batch(C);
        assert_eq!(committed.depth(), (1, 0));
        let undone = committed.undo();
        assert_eq!(undone.current(), A);
        assert!(!undone.can_undo());
    }

    #[test]
    fn commit_batch_with_anchor_value_is_noop() {
        let h = History::new(A);
        let committed = h.begin_batch().commit_batch(A);
        assert_eq!(committed.current(), A);
        assert!(!committed.can_undo());
        assert_eq!(committed.depth(), (0, 0));
    }

    #[test]
    fn commit_batch_clears_redo() {
        let h = History::new(A).push(B).undo();
        assert!(h.can_redo());
        let committed = h.begin_batch().commit_batch(C);
        assert!(!committed.can_redo());
    }

    #[test]
    fn batch_preserves_deeper_past() {
        let h = History::new(A).push(B).push(C);
        let committed = h.begin_batch().commit_batch(E);
        let h1 = committed.undo();
        assert_eq!(h1.current(), C);
        let h2 = h1.undo();
        assert_eq!(h2.current(), B);
        let h3 = h2.undo();
        assert_eq!(h3.current(), A);
        assert!(!h3.can_undo());
    }

    #[test]
    fn snapshots_are_shared_not_copied() {
        let h1 = History::new(A);
        let h2 = h1.push(B);
        let h3 = h2.undo();
        assert!(Arc::ptr_eq(&h1.present, &h3.present));
    }
}
