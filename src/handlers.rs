use axum::{
    body::Body,
    extract::{rejection::FormRejection, Form, Path as AxumPath, Query, State},
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
    response::{Html, IntoResponse, Json},
};
use std::path::Path;

use crate::components::TemplateComponent;
use crate::errors::EditorError;
use crate::services::{FileService, MarkdownService};
use crate::types::{AppState, FileQuery, SaveForm, SaveResponse};
use crate::utils::{content_type_for, is_markdown, normalize_path};

/// Handle root path requests: list every Markdown file under the root
pub async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, EditorError> {
    log::info!("Index request received");
    let file_service = FileService::new(state.root_dir.as_ref().clone());
    let files = file_service.list_markdown_files()?;
    Ok(Html(TemplateComponent::new().render_index(&files)))
}

/// Handle `/view?file=<path>`
pub async fn handle_view(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Html<String>, EditorError> {
    log::info!("View request received: '{}'", query.file);
    render_view(&state, &query.file)
}

/// Handle `/edit?file=<path>`
pub async fn handle_edit(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Html<String>, EditorError> {
    log::info!("Edit request received: '{}'", query.file);
    render_editor(&state, &query.file)
}

/// Handle `POST /save`: write the submitted content to the file. Every
/// answer, including a malformed or oversized body, is a JSON `SaveResponse`.
pub async fn handle_save(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<SaveForm>, FormRejection>,
) -> (StatusCode, Json<SaveResponse>) {
    if !is_same_origin(&headers) {
        log::warn!("Rejected cross-origin save from {:?}", headers.get(header::ORIGIN));
        return (
            StatusCode::FORBIDDEN,
            Json(SaveResponse::err("Cross-origin save rejected")),
        );
    }

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            log::warn!("Malformed save request: {}", rejection.body_text());
            return (rejection.status(), Json(SaveResponse::err(rejection.body_text())));
        }
    };

    log::info!("Save request received: '{}' ({} bytes)", form.file, form.content.len());
    let file_service = FileService::new(state.root_dir.as_ref().clone());

    match file_service.write_markdown(&form.file, &form.content) {
        Ok(()) => (StatusCode::OK, Json(SaveResponse::ok())),
        Err(e) => {
            log::warn!("Save of '{}' refused: {}", form.file, e);
            (e.status(), Json(SaveResponse::err(e.to_string())))
        }
    }
}

/// A request without `Origin` (curl, same-origin navigation) passes; one with
/// `Origin` must name the same host and port as `Host`.
fn is_same_origin(headers: &HeaderMap) -> bool {
    let Some(origin) = headers.get(header::ORIGIN) else {
        return true;
    };
    let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        return false;
    };
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .map(|authority| authority.trim_end_matches('/').eq_ignore_ascii_case(host))
        .unwrap_or(false)
}

/// Handle `POST /preview`: render a Markdown body to an HTML fragment
pub async fn handle_preview(body: String) -> Html<String> {
    log::debug!("Preview request received ({} bytes)", body.len());
    Html(MarkdownService::new().render(&body).html)
}

/// Handle any other path: `<file>.md` renders, `edit/<file>.md` opens the
/// editor and everything else is served as a file from the root
pub async fn handle_path(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, EditorError> {
    log::info!("Path request received: '{}'", path);
    let normalized = normalize_path(&path);

    if let Some(file) = normalized.strip_prefix("edit/") {
        if is_markdown(Path::new(file)) {
            return render_editor(&state, file).map(IntoResponse::into_response);
        }
    }
    if is_markdown(Path::new(&normalized)) {
        return render_view(&state, &normalized).map(IntoResponse::into_response);
    }

    serve_asset(&state, &normalized)
}

fn render_view(state: &AppState, file: &str) -> Result<Html<String>, EditorError> {
    let file_service = FileService::new(state.root_dir.as_ref().clone());
    let content = file_service.read_markdown(file)?;
    let result = MarkdownService::new().render(&content);
    let modified = file_service.last_modified(file);
    let page = TemplateComponent::new().render_view(file, &result, modified.as_deref());
    log::info!("Serving rendered file: '{}'", file);
    Ok(Html(page))
}

fn render_editor(state: &AppState, file: &str) -> Result<Html<String>, EditorError> {
    let file_service = FileService::new(state.root_dir.as_ref().clone());
    let content = file_service.read_markdown(file)?;
    let page = TemplateComponent::new().render_editor(file, &content);
    log::info!("Serving editor for: '{}'", file);
    Ok(Html(page))
}

fn serve_asset(state: &AppState, file: &str) -> Result<Response<Body>, EditorError> {
    let file_service = FileService::new(state.root_dir.as_ref().clone());
    let (path, bytes) = file_service.read_asset(file)?;
    let mut resp = Response::new(Body::from(bytes));
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&path)),
    );
    Ok(resp)
}
