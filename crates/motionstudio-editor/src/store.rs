//! Multi-document store and its command surface.

use motionstudio_core::{DocumentId, EditorConfig, StudioError, StudioResult};
use svgkit_dom::SvgDocument;
use svgkit_history::History;
use tracing::{debug, warn};

/// One open document: identity, display name, snapshot history, and the
/// live parsed tree. The live tree is always a fresh parse of
/// `history.current()`.
pub struct EditorDocument {
    pub id: DocumentId,
    pub name: String,
    pub history: History,
    pub doc: SvgDocument,
}

/// Commands accepted by the document store. Each is a total transition;
/// commands naming a missing document are ignored.
#[derive(Debug, Clone)]
pub enum DocumentCommand {
    /// Import a document. Rejected (nothing registered) when the source
    /// does not parse.
    Add { name: String, src: String },
    /// Replace a document's content wholesale, recording a history entry.
    Update { id: DocumentId, src: String },
    Remove { id: DocumentId },
    /// `None` clears the active document.
    SetActive { id: Option<DocumentId> },
    Undo { id: DocumentId },
    Redo { id: DocumentId },
    /// Record the batch anchor for a run of continuous edits.
    BatchBegin { id: DocumentId },
    /// Refresh the live tree mid-batch; the history sees nothing.
    BatchUpdate { id: DocumentId, src: String },
    /// Serialize the live tree and collapse the batch into one history step.
    BatchCommit { id: DocumentId },
}

/// The multi-document editing state. At most one document is active.
pub struct DocumentStore {
    documents: Vec<EditorDocument>,
    active_id: Option<DocumentId>,
    config: EditorConfig,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            documents: Vec::new(),
            active_id: None,
            config,
        }
    }

    pub fn documents(&self) -> &[EditorDocument] {
        &self.documents
    }

    pub fn get(&self, id: DocumentId) -> Option<&EditorDocument> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active_id
    }

    pub fn active(&self) -> Option<&EditorDocument> {
        self.active_id.and_then(|id| self.get(id))
    }

    /// Apply one command. Parse failures on import surface as errors and
    /// register nothing; everything else either transitions or no-ops.
    pub fn apply(&mut self, command: DocumentCommand) -> StudioResult<()> {
        match command {
            DocumentCommand::Add { name, src } => {
                let doc = SvgDocument::parse(&src)
                    .map_err(|e| StudioError::parse(e.to_string()))?;
                let history = History::with_max_depth(&src, self.config.max_history_depth);
                let id = DocumentId::new();
                debug!(%id, name = %name, "document added");
                self.documents.push(EditorDocument {
                    id,
                    name,
                    history,
                    doc,
                });
                self.active_id = Some(id);
                Ok(())
            }

            DocumentCommand::Update { id, src } => {
                let Some(entry) = self.get_mut(id) else {
                    return Ok(());
                };
                let doc = SvgDocument::parse(&src)
                    .map_err(|e| StudioError::parse(e.to_string()))?;
                entry.history = entry.history.push(&src);
                entry.doc = doc;
                Ok(())
            }

            DocumentCommand::Remove { id } => {
                self.documents.retain(|d| d.id != id);
                if self.active_id == Some(id) {
                    self.active_id = None;
                }
                Ok(())
            }

            DocumentCommand::SetActive { id } => {
                match id {
                    None => self.active_id = None,
                    Some(id) if self.get(id).is_some() => self.active_id = Some(id),
                    Some(id) => warn!(%id, "set-active ignored: unknown document"),
                }
                Ok(())
            }

            DocumentCommand::Undo { id } => {
                let Some(entry) = self.get_mut(id) else {
                    return Ok(());
                };
                if !entry.history.can_undo() {
                    return Ok(());
                }
                let history = entry.history.undo();
                entry.doc = SvgDocument::parse(history.current())
                    .map_err(|e| StudioError::parse(e.to_string()))?;
                entry.history = history;
                Ok(())
            }

            DocumentCommand::Redo { id } => {
                let Some(entry) = self.get_mut(id) else {
                    return Ok(());
                };
                if !entry.history.can_redo() {
                    return Ok(());
                }
                let history = entry.history.redo();
                entry.doc = SvgDocument::parse(history.current())
                    .map_err(|e| StudioError::parse(e.to_string()))?;
                entry.history = history;
                Ok(())
            }

            DocumentCommand::BatchBegin { id } => {
                if let Some(entry) = self.get_mut(id) {
                    entry.history = entry.history.begin_batch();
                }
                Ok(())
            }

            DocumentCommand::BatchUpdate { id, src } => {
                let Some(entry) = self.get_mut(id) else {
                    return Ok(());
                };
                entry.doc = SvgDocument::parse(&src)
                    .map_err(|e| StudioError::parse(e.to_string()))?;
                Ok(())
            }

            DocumentCommand::BatchCommit { id } => {
                if let Some(entry) = self.get_mut(id) {
                    let src = entry.doc.serialize();
                    entry.history = entry.history.commit_batch(&src);
                }
                Ok(())
            }
        }
    }

    /// Mutate the active document's live tree, then route the serialized
    /// result through the plain update path, or the batch path while a
    /// batch is open. No-op without an active document.
    pub fn mutate_active<F>(&mut self, mutate: F) -> StudioResult<()>
    where
        F: FnOnce(&SvgDocument),
    {
        let Some(active) = self.active() else {
            return Ok(());
        };
        let id = active.id;
        mutate(&active.doc);
        let src = active.doc.serialize();
        let batching = active.history.is_batching();
        if batching {
            self.apply(DocumentCommand::BatchUpdate { id, src })
        } else {
            self.apply(DocumentCommand::Update { id, src })
        }
    }

    fn get_mut(&mut self, id: DocumentId) -> Option<&mut EditorDocument> {
        self.documents.iter_mut().find(|d| d.id == id)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
