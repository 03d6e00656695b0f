use std::{fmt, io};
use axum::{http::StatusCode, response::{Html, IntoResponse, Response}};

use crate::components::TemplateComponent;

/// Errors raised while listing, reading, rendering or saving Markdown files
#[derive(Debug)]
pub enum EditorError {
    Io(io::Error),
    NotFound(String),
    AccessDenied(String),
    InvalidPath(String),
    InvalidRoot(String),
}

impl EditorError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            EditorError::NotFound(_) => StatusCode::NOT_FOUND,
            EditorError::AccessDenied(_) => StatusCode::FORBIDDEN,
            EditorError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            EditorError::Io(_) | EditorError::InvalidRoot(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::Io(e) => write!(f, "I/O error: {}", e),
            EditorError::NotFound(path) => write!(f, "File not found: {}", path),
            EditorError::AccessDenied(path) => write!(f, "Access denied: {}", path),
            EditorError::InvalidPath(path) => write!(f, "Invalid path: {}", path),
            EditorError::InvalidRoot(reason) => write!(f, "Invalid root directory: {}", reason),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for EditorError {
    fn from(err: io::Error) -> Self {
        EditorError::Io(err)
    }
}

impl IntoResponse for EditorError {
    fn into_response(self) -> Response {
        let status = self.status();
        let page = TemplateComponent::new().render_error(status, &self.to_string());
        (status, Html(page)).into_response()
    }
}
