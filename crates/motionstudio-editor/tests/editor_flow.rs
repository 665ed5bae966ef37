//! End-to-end editing flows across the store, history, document model,
//! and detector.

use motionstudio_editor::{
    commit_attribute_edit, DocumentCommand, DocumentStore, EditOutcome, Selection,
    SelectionCommand,
};
use svgkit_animation::SheetStyleResolver;
use svgkit_css::AndroidWebView;

const R1: &str = r#"<svg><circle r="1"/></svg>"#;

fn circle_r(store: &DocumentStore) -> String {
    let doc = store.active().unwrap();
    let circle = doc.doc.query_selector("circle").unwrap();
    circle.get_attribute("r").unwrap()
}

#[test]
fn undo_redo_walks_edit_history() {
    let mut store = DocumentStore::new();
    store
        .apply(DocumentCommand::Add {
            name: "doc".into(),
            src: R1.into(),
        })
        .unwrap();
    let id = store.active_id().unwrap();

    for r in ["2", "3"] {
        store
            .mutate_active(|doc| {
                let circle = doc.query_selector("circle").unwrap();
                doc.set_attribute(&circle, "r", r);
            })
            .unwrap();
    }
    assert_eq!(circle_r(&store), "3");

    store.apply(DocumentCommand::Undo { id }).unwrap();
    assert_eq!(circle_r(&store), "2");
    assert!(store.active().unwrap().history.can_redo());

    store.apply(DocumentCommand::Undo { id }).unwrap();
    assert_eq!(circle_r(&store), "1");
    assert!(!store.active().unwrap().history.can_undo());

    store.apply(DocumentCommand::Redo { id }).unwrap();
    store.apply(DocumentCommand::Redo { id }).unwrap();
    assert_eq!(circle_r(&store), "3");
    assert!(!store.active().unwrap().history.can_redo());
}

#[test]
fn batched_drag_collapses_to_one_undo_step() {
    let mut store = DocumentStore::new();
    store
        .apply(DocumentCommand::Add {
            name: "doc".into(),
            src: R1.into(),
        })
        .unwrap();
    let id = store.active_id().unwrap();

    store.apply(DocumentCommand::BatchBegin { id }).unwrap();
    for r in ["2", "3"] {
        store
            .mutate_active(|doc| {
                let circle = doc.query_selector("circle").unwrap();
                doc.set_attribute(&circle, "r", r);
            })
            .unwrap();
    }
    store.apply(DocumentCommand::BatchCommit { id }).unwrap();

    let history = &store.active().unwrap().history;
    assert_eq!(history.depth(), (1, 0));
    assert_eq!(circle_r(&store), "3");

    store.apply(DocumentCommand::Undo { id }).unwrap();
    assert_eq!(circle_r(&store), "1");
    assert!(!store.active().unwrap().history.can_undo());
}

#[test]
fn selection_survives_edits_but_not_reparse() {
    let mut store = DocumentStore::new();
    store
        .apply(DocumentCommand::Add {
            name: "doc".into(),
            src: r#"<svg><g><circle r="1"/><rect width="2" height="2"/></g></svg>"#.into(),
        })
        .unwrap();
    let id = store.active_id().unwrap();

    let rect_id = {
        let doc = store.active().unwrap();
        doc.doc.query_selector("rect").unwrap().node_id().unwrap()
    };
    let mut selection = Selection::default();
    selection.apply(SelectionCommand::Select(Some(rect_id)));

    // an update reparses the document; the held id crosses a parse boundary
    store
        .apply(DocumentCommand::Update {
            id,
            src: r#"<svg><g><circle r="9"/></g></svg>"#.into(),
        })
        .unwrap();
    selection.revalidate(&store.active().unwrap().doc);
    assert_eq!(selection.element, None);
}

#[test]
fn inline_numeric_edit_rejection_leaves_document_untouched() {
    let mut store = DocumentStore::new();
    store
        .apply(DocumentCommand::Add {
            name: "doc".into(),
            src: R1.into(),
        })
        .unwrap();
    let circle_id = {
        let doc = store.active().unwrap();
        doc.doc.query_selector("circle").unwrap().node_id().unwrap()
    };

    let before = store.active().unwrap().doc.serialize();
    let outcome = commit_attribute_edit(&store.active().unwrap().doc, circle_id, "r", "12abc");
    assert_eq!(outcome, EditOutcome::Reverted);
    assert_eq!(store.active().unwrap().doc.serialize(), before);
}

#[test]
fn timing_edit_round_trips_through_detection() {
    let mut store = DocumentStore::new();
    store
        .apply(DocumentCommand::Add {
            name: "doc".into(),
            src: r#"<svg><style>.s { animation: spin 2s linear infinite; }</style><rect class="s" width="4" height="4"/></svg>"#
                .into(),
        })
        .unwrap();

    // commit a timing edit the way the timing panel does: through inline style
    store
        .mutate_active(|doc| {
            let rect = doc.query_selector("rect").unwrap();
            doc.set_style(&rect, "animation-duration", "5s")
                .set_style(&rect, "animation-timing-function", "ease-in-out");
        })
        .unwrap();

    // the edit reparsed the document; look the element up again
    let doc = store.active().unwrap();
    let rect_id_now = doc.doc.query_selector("rect").unwrap().node_id().unwrap();
    let resolver = SheetStyleResolver::for_document(&doc.doc);
    let animations = doc.animations_for(rect_id_now, &resolver, &AndroidWebView);
    assert_eq!(animations.len(), 1);
    assert_eq!(animations[0].properties.duration.as_deref(), Some("5s"));
    assert_eq!(
        animations[0].properties.easing.as_deref(),
        Some("ease-in-out")
    );
}

#[test]
fn document_stats_follow_edits() {
    let mut store = DocumentStore::new();
    store
        .apply(DocumentCommand::Add {
            name: "doc".into(),
            src: R1.into(),
        })
        .unwrap();

    assert_eq!(store.active().unwrap().stats().element_count, 1);
    store
        .mutate_active(|doc| {
            let root = doc.root().clone();
            doc.add_child(&root, "rect", &[("width", "2"), ("height", "2")]);
        })
        .unwrap();
    assert_eq!(store.active().unwrap().stats().element_count, 2);
}
