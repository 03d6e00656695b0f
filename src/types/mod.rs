use std::path::PathBuf;
use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::EditorError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Canonical root; every path served or written must stay under it
    pub root_dir: Arc<PathBuf>,
    /// Largest request body accepted by `/save` and `/preview`
    pub max_body_bytes: usize,
}

impl AppState {
    /// Validate the configured root and canonicalize it
    pub fn from_config(config: &Config) -> Result<Self, EditorError> {
        config.validate()?;
        let root_dir = config.root_dir.canonicalize()?;
        Ok(Self {
            root_dir: Arc::new(root_dir),
            max_body_bytes: config.max_body_bytes,
        })
    }
}

/// Markdown rendering result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownResult {
    pub html: String,
    pub title: Option<String>,
}

/// Template rendering context for the page shell
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub title: String,
    pub style: &'static str,
    pub content: String,
    pub script: String,
}

/// `?file=` query used by the view and edit routes
#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub file: String,
}

/// Form body posted by the editor
#[derive(Debug, Deserialize)]
pub struct SaveForm {
    pub file: String,
    pub content: String,
}

/// JSON answer to a save request
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResponse {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self { success: false, error: Some(message.into()) }
    }
}
