use std::fs;
use std::path::Path;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use mdpad::{build_router, AppState, Config, SaveResponse};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const BODY_LIMIT: usize = 1024 * 1024;

fn app_for(root: &Path) -> Router {
    let config = Config::new(root.to_path_buf());
    build_router(AppState::from_config(&config).unwrap())
}

fn app_with_limit(root: &Path, max_body_bytes: usize) -> Router {
    let mut state = AppState::from_config(&Config::new(root.to_path_buf())).unwrap();
    state.max_body_bytes = max_body_bytes;
    build_router(state)
}

fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("README.md"), "# Readme\n\nHello *world*\n").unwrap();
    fs::create_dir_all(root.join("docs/guides")).unwrap();
    fs::write(root.join("docs/guides/setup.md"), "## Setup\n").unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join(".git/notes.md"), "hidden").unwrap();
    fs::write(root.join(".git/HEAD"), "ref: refs/heads/main").unwrap();
    fs::write(root.join("logo.png"), b"\x89PNG").unwrap();
    dir
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

async fn save(app: Router, file: &str, content: &str) -> (StatusCode, SaveResponse) {
    let body = format!(
        "file={}&content={}",
        urlencoding::encode(file),
        urlencoding::encode(content)
    );
    save_raw(
        app,
        Request::builder()
            .method("POST")
            .uri("/save")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

async fn save_raw(app: Router, request: Request<Body>) -> (StatusCode, SaveResponse) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn form_request() -> axum::http::request::Builder {
    Request::builder()
        .method("POST")
        .uri("/save")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
}

#[tokio::test]
async fn index_lists_markdown_outside_hidden_dirs() {
    let dir = fixture();
    let (status, body) = get(app_for(dir.path()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(">README.md</a>"));
    assert!(body.contains(">docs/guides/setup.md</a>"));
    assert!(body.contains("/edit?file=docs%2Fguides%2Fsetup.md"));
    assert!(!body.contains("notes.md"));
    assert!(!body.contains("logo.png"));
}

#[tokio::test]
async fn view_renders_markdown() {
    let dir = fixture();
    let (status, body) = get(app_for(dir.path()), "/view?file=README.md").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>Readme</title>"));
    assert!(body.contains("<em>world</em>"));
    assert!(body.contains("/edit?file=README.md"));
}

#[tokio::test]
async fn view_is_stable_across_requests() {
    let dir = fixture();
    let app = app_for(dir.path());
    let (_, first) = get(app.clone(), "/view?file=docs/guides/setup.md").await;
    let (_, second) = get(app, "/view?file=docs/guides/setup.md").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn view_missing_file_is_404() {
    let dir = fixture();
    let (status, body) = get(app_for(dir.path()), "/view?file=missing.md").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("File not found: missing.md"));
}

#[tokio::test]
async fn view_rejects_traversal_and_non_markdown() {
    let dir = fixture();
    let app = app_for(dir.path());
    let (status, _) = get(app.clone(), "/view?file=..%2Fsecret.md").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = get(app, "/view?file=logo.png").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn editor_embeds_escaped_source() {
    let dir = fixture();
    fs::write(dir.path().join("tricky.md"), "</textarea> & `code`").unwrap();
    let (status, body) = get(app_for(dir.path()), "/edit?file=tricky.md").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>Edit: tricky.md</title>"));
    assert!(body.contains("&lt;/textarea&gt; &amp; `code`</textarea>"));
    assert!(body.contains("data-file=\"tricky.md\""));
}

#[tokio::test]
async fn save_writes_exact_content() {
    let dir = fixture();
    let content = "# Edited\r\n\nline with + and & and %20\n";
    let (status, result) = save(app_for(dir.path()), "docs/guides/setup.md", content).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result, SaveResponse::ok());
    assert_eq!(
        fs::read_to_string(dir.path().join("docs/guides/setup.md")).unwrap(),
        content
    );
}

#[tokio::test]
async fn save_can_create_new_file() {
    let dir = fixture();
    let (status, _) = save(app_for(dir.path()), "docs/new.md", "fresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fs::read_to_string(dir.path().join("docs/new.md")).unwrap(), "fresh");
}

#[tokio::test]
async fn save_outside_root_is_rejected() {
    let parent = tempdir().unwrap();
    let root = parent.path().join("root");
    fs::create_dir(&root).unwrap();
    fs::write(parent.path().join("victim.md"), "original").unwrap();

    let (status, result) = save(app_for(&root), "../victim.md", "overwritten").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!result.success);
    assert!(result.error.unwrap().contains("Access denied"));
    assert_eq!(fs::read_to_string(parent.path().join("victim.md")).unwrap(), "original");
}

#[tokio::test]
async fn save_rejects_non_markdown() {
    let dir = fixture();
    let (status, result) = save(app_for(dir.path()), "run.sh", "echo hi").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!result.success);
    assert!(!dir.path().join("run.sh").exists());
}

#[tokio::test]
async fn preview_renders_fragment() {
    let dir = fixture();
    let response = app_for(dir.path())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/preview")
                .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(Body::from("# Draft\n\n**bold**"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<h1 id=\"draft\">Draft</h1>"));
    assert!(html.contains("<strong>bold</strong>"));
    assert!(!html.contains("<html"));
}

#[tokio::test]
async fn legacy_paths_render_edit_and_serve_assets() {
    let dir = fixture();
    let app = app_for(dir.path());

    let (status, body) = get(app.clone(), "/README.md").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<em>world</em>"));

    let (status, body) = get(app.clone(), "/edit/docs/guides/setup.md").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Editing: docs/guides/setup.md"));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/logo.png").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let (status, _) = get(app, "/.git/HEAD").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn save_missing_field_answers_json() {
    let dir = fixture();
    let request = form_request().body(Body::from("file=a.md")).unwrap();
    let (status, result) = save_raw(app_for(dir.path()), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!result.success);
    assert!(result.error.unwrap().contains("content"));
    assert!(!dir.path().join("a.md").exists());
}

#[tokio::test]
async fn save_wrong_content_type_answers_json() {
    let dir = fixture();
    let request = Request::builder()
        .method("POST")
        .uri("/save")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("file=a.md&content=x"))
        .unwrap();
    let (status, result) = save_raw(app_for(dir.path()), request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(!result.success);
    assert!(!dir.path().join("a.md").exists());
}

#[tokio::test]
async fn save_oversized_body_answers_json() {
    let dir = fixture();
    let (status, result) = save(app_with_limit(dir.path(), 32), "README.md", &"x".repeat(256)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!result.success);
    assert!(result.error.is_some());
    assert_eq!(
        fs::read_to_string(dir.path().join("README.md")).unwrap(),
        "# Readme\n\nHello *world*\n"
    );
}

#[tokio::test]
async fn save_from_foreign_origin_is_rejected() {
    let dir = fixture();
    let request = form_request()
        .header(header::HOST, "localhost:8000")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::from("file=README.md&content=pwned"))
        .unwrap();
    let (status, result) = save_raw(app_for(dir.path()), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!result.success);
    assert_eq!(
        fs::read_to_string(dir.path().join("README.md")).unwrap(),
        "# Readme\n\nHello *world*\n"
    );
}

#[tokio::test]
async fn save_from_same_origin_is_accepted() {
    let dir = fixture();
    let request = form_request()
        .header(header::HOST, "localhost:8000")
        .header(header::ORIGIN, "http://localhost:8000")
        .body(Body::from("file=README.md&content=edited"))
        .unwrap();
    let (status, result) = save_raw(app_for(dir.path()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result, SaveResponse::ok());
    assert_eq!(fs::read_to_string(dir.path().join("README.md")).unwrap(), "edited");
}
