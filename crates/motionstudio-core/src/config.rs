//! Editor configuration.

use serde::{Deserialize, Serialize};

/// Background shown behind document previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewBackground {
    #[default]
    Dark,
    Light,
    Checker,
}

/// Editor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Maximum retained undo depth per document.
    pub max_history_depth: usize,
    /// Default gallery grid columns.
    pub grid_columns: u32,
    /// Default preview background.
    pub preview_background: PreviewBackground,
    /// Default global playback speed multiplier.
    pub playback_speed: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history_depth: 50,
            grid_columns: 2,
            preview_background: PreviewBackground::Dark,
            playback_speed: 1.0,
        }
    }
}
