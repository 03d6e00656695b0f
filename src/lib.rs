//! mdpad - view and edit the Markdown files of a directory in the browser
//!
//! Lists every `.md` file under a root directory, renders them to HTML and
//! offers a side-by-side editor with live preview that saves back to disk.
//! Writes never leave the root directory.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod types;
pub mod utils;

use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};

// Re-export commonly used items
pub use config::Config;
pub use errors::EditorError;
pub use types::{AppState, MarkdownResult, SaveResponse};
pub use services::{FileService, MarkdownService};
pub use components::{TemplateComponent, ToolbarComponent};

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.max_body_bytes;
    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/view", get(handlers::handle_view))
        .route("/edit", get(handlers::handle_edit))
        .route("/save", post(handlers::handle_save))
        .route("/preview", post(handlers::handle_preview))
        .route("/*path", get(handlers::handle_path))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
