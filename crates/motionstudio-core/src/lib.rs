//! Motion Studio Core Library
//!
//! This crate provides shared types, errors, and configuration for Motion Studio.

pub mod config;
pub mod error;
pub mod types;

pub use config::{EditorConfig, PreviewBackground};
pub use error::{StudioError, StudioResult};
pub use types::DocumentId;
