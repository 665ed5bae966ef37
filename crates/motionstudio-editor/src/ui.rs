//! Process-wide UI preferences.

use motionstudio_core::{DocumentId, EditorConfig, PreviewBackground};
use serde::Serialize;

/// Gallery and playback preferences shared across documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiState {
    pub grid_columns: u32,
    pub global_speed: f32,
    pub paused: bool,
    pub focused_document: Option<DocumentId>,
    pub editor_open: bool,
    pub preview_background: PreviewBackground,
}

/// UI transitions.
#[derive(Debug, Clone, Copy)]
pub enum UiCommand {
    SetGridColumns(u32),
    SetSpeed(f32),
    TogglePause,
    ResetSpeed,
    SetFocus(DocumentId),
    ClearFocus,
    ToggleEditor,
    SetPreviewBackground(PreviewBackground),
}

impl UiState {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            grid_columns: config.grid_columns,
            global_speed: config.playback_speed,
            paused: false,
            focused_document: None,
            editor_open: false,
            preview_background: config.preview_background,
        }
    }

    pub fn apply(&mut self, command: UiCommand) {
        match command {
            UiCommand::SetGridColumns(cols) => self.grid_columns = cols,
            UiCommand::SetSpeed(speed) => self.global_speed = speed,
            UiCommand::TogglePause => self.paused = !self.paused,
            UiCommand::ResetSpeed => self.global_speed = 1.0,
            UiCommand::SetFocus(id) => self.focused_document = Some(id),
            UiCommand::ClearFocus => self.focused_document = None,
            UiCommand::ToggleEditor => self.editor_open = !self.editor_open,
            UiCommand::SetPreviewBackground(bg) => self.preview_background = bg,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_config() {
        let ui = UiState::default();
        assert_eq!(ui.grid_columns, 2);
        assert_eq!(ui.global_speed, 1.0);
        assert!(!ui.paused);
        assert!(!ui.editor_open);
    }

    #[test]
    fn toggles_and_reset() {
        let mut ui = UiState::default();
        ui.apply(UiCommand::TogglePause);
        assert!(ui.paused);
        ui.apply(UiCommand::SetSpeed(2.5));
        ui.apply(UiCommand::ResetSpeed);
        assert_eq!(ui.global_speed, 1.0);
        ui.apply(UiCommand::ToggleEditor);
        assert!(ui.editor_open);
    }

    #[test]
    fn focus_follow_and_clear() {
        let mut ui = UiState::default();
        let id = DocumentId::new();
        ui.apply(UiCommand::SetFocus(id));
        assert_eq!(ui.focused_document, Some(id));
        ui.apply(UiCommand::ClearFocus);
        assert_eq!(ui.focused_document, None);
    }
}
