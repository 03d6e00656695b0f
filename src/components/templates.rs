use axum::http::StatusCode;

use crate::components::toolbar::{Page, ToolbarComponent};
use crate::types::{MarkdownResult, TemplateContext};
use crate::utils::{escape_attr, escape_html};

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{{TITLE}}</title>
    <style>{{STYLE}}</style>
</head>
{{CONTENT}}
{{SCRIPT}}
</html>
"#;

const LIST_STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; max-width: 800px; margin: 40px auto; padding: 0 20px; background: #fff; }
h1 { border-bottom: 1px solid #eaecef; padding-bottom: 10px; }
ul { list-style: none; padding: 0; }
li { margin: 10px 0; }
a { color: #0366d6; text-decoration: none; font-size: 16px; }
a:hover { text-decoration: underline; }
.file-icon { margin-right: 8px; }
.edit-link { margin-left: 10px; font-size: 14px; }
.empty { color: #586069; }
"#;

const DOCUMENT_STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; max-width: 900px; margin: 40px auto; padding: 0 20px; line-height: 1.6; color: #24292e; background: #fff; }
h1, h2, h3, h4, h5, h6 { margin-top: 24px; margin-bottom: 16px; font-weight: 600; line-height: 1.25; }
h1 { font-size: 2em; border-bottom: 1px solid #eaecef; padding-bottom: 0.3em; }
h2 { font-size: 1.5em; border-bottom: 1px solid #eaecef; padding-bottom: 0.3em; }
code { background-color: rgba(27,31,35,0.05); border-radius: 3px; padding: 0.2em 0.4em; font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace; font-size: 85%; }
pre { background-color: #f6f8fa; border-radius: 3px; padding: 16px; overflow: auto; }
pre code { background-color: transparent; padding: 0; }
pre:has(> code[class*="language-"]) { border-left: 3px solid #0366d6; }
code[class*="language-"] { color: #24292e; }
table { border-collapse: collapse; width: 100%; margin: 16px 0; }
table th, table td { padding: 6px 13px; border: 1px solid #dfe2e5; }
table th { font-weight: 600; background-color: #f6f8fa; }
table tr:nth-child(2n) { background-color: #f6f8fa; }
blockquote { margin: 0; padding: 0 1em; color: #6a737d; border-left: 0.25em solid #dfe2e5; }
ul, ol { padding-left: 2em; }
a { color: #0366d6; text-decoration: none; }
a:hover { text-decoration: underline; }
.toolbar { display: flex; gap: 12px; align-items: baseline; margin-bottom: 20px; font-size: 14px; }
.back-link { color: #586069; }
.filename { color: #586069; }
.meta { color: #6a737d; font-size: 12px; }
"#;

const EDITOR_STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; padding: 20px; background: #f6f8fa; }
.toolbar { max-width: 1200px; margin: 0 auto 20px; display: flex; justify-content: space-between; align-items: center; }
.back-link, .switch-link { color: #586069; text-decoration: none; }
.filename { font-weight: 600; color: #24292e; }
.editor-container { max-width: 1200px; margin: 0 auto; display: grid; grid-template-columns: 1fr 1fr; gap: 20px; height: calc(100vh - 120px); }
.panel { background: #fff; border: 1px solid #d1d5da; border-radius: 6px; overflow: hidden; display: flex; flex-direction: column; }
.panel-header { background: #f6f8fa; padding: 10px 15px; border-bottom: 1px solid #d1d5da; font-weight: 600; display: flex; justify-content: space-between; align-items: center; }
textarea { flex: 1; border: none; padding: 15px; font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace; font-size: 14px; resize: none; outline: none; }
.preview { flex: 1; padding: 15px; overflow-y: auto; line-height: 1.6; }
.btn { background: #2ea44f; color: white; border: none; padding: 8px 16px; border-radius: 6px; cursor: pointer; font-size: 14px; font-weight: 600; }
.btn:hover { background: #2c974b; }
.btn:disabled { background: #94d3a2; cursor: not-allowed; }
.message { margin-left: 10px; color: #28a745; font-size: 14px; }
.message.error { color: #d73a49; }
.preview h1, .preview h2, .preview h3 { margin-top: 24px; margin-bottom: 16px; font-weight: 600; }
.preview h1 { font-size: 2em; border-bottom: 1px solid #eaecef; padding-bottom: 0.3em; }
.preview h2 { font-size: 1.5em; border-bottom: 1px solid #eaecef; padding-bottom: 0.3em; }
.preview code { background-color: rgba(27,31,35,0.05); border-radius: 3px; padding: 0.2em 0.4em; font-family: "SFMono-Regular", Consolas, monospace; font-size: 85%; }
.preview pre { background-color: #f6f8fa; border-radius: 3px; padding: 16px; overflow: auto; }
.preview pre code { background-color: transparent; padding: 0; }
.preview pre:has(> code[class*="language-"]) { border-left: 3px solid #0366d6; }
.preview table { border-collapse: collapse; }
.preview th, .preview td { padding: 6px 13px; border: 1px solid #dfe2e5; }
.preview ul, .preview ol { padding-left: 2em; }
.preview a { color: #0366d6; }
"#;

const EDITOR_SCRIPT: &str = r#"<script>
const file = document.body.dataset.file;
const editor = document.getElementById('editor');
const preview = document.getElementById('preview');
const message = document.getElementById('message');
const saveButton = document.getElementById('save');
let previewTimer = null;

async function updatePreview() {
    try {
        const response = await fetch('/preview', {
            method: 'POST',
            headers: { 'Content-Type': 'text/plain; charset=utf-8' },
            body: editor.value
        });
        if (response.ok) {
            preview.innerHTML = await response.text();
        }
    } catch (err) {
        preview.textContent = 'Preview unavailable: ' + err.message;
    }
}

function schedulePreview() {
    clearTimeout(previewTimer);
    previewTimer = setTimeout(updatePreview, 200);
}

function showMessage(text, isError) {
    message.textContent = text;
    message.classList.toggle('error', isError);
}

async function saveFile() {
    saveButton.disabled = true;
    showMessage('Saving...', false);
    try {
        const response = await fetch('/save', {
            method: 'POST',
            body: new URLSearchParams({ file: file, content: editor.value })
        });
        const result = await response.json();
        if (response.ok && result.success) {
            showMessage('✓ Saved!', false);
            setTimeout(() => showMessage('', false), 2000);
        } else {
            showMessage('✗ ' + (result.error || 'Error saving'), true);
        }
    } catch (err) {
        showMessage('✗ Error: ' + err.message, true);
    } finally {
        saveButton.disabled = false;
    }
}

editor.addEventListener('input', schedulePreview);
saveButton.addEventListener('click', saveFile);
document.addEventListener('keydown', (e) => {
    if ((e.ctrlKey || e.metaKey) && e.key === 's') {
        e.preventDefault();
        saveFile();
    }
});
updatePreview();
</script>"#;

/// Substitute `{{KEY}}` placeholders in one pass. Inserted values are never
/// scanned again and unknown placeholders are kept as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Component for handling HTML template rendering
pub struct TemplateComponent {
    toolbar: ToolbarComponent,
}

impl TemplateComponent {
    /// Create a new template component
    pub fn new() -> Self {
        Self { toolbar: ToolbarComponent::new() }
    }

    /// Render the HTML shell around a page body
    pub fn render_shell(&self, context: &TemplateContext) -> String {
        let title = escape_html(&context.title);
        fill_template(
            BASE_TEMPLATE,
            &[
                ("TITLE", title.as_str()),
                ("STYLE", context.style),
                ("CONTENT", context.content.as_str()),
                ("SCRIPT", context.script.as_str()),
            ],
        )
    }

    /// Index page listing every Markdown file with view and edit links
    pub fn render_index(&self, files: &[String]) -> String {
        let mut content = String::from("<body>\n<h1>📝 Markdown Files</h1>\n");
        if files.is_empty() {
            content.push_str("<p class=\"empty\">No markdown files found.</p>\n");
        } else {
            content.push_str("<ul>\n");
            for file in files {
                content.push_str(&format!(
                    "<li><span class=\"file-icon\">📄</span><a href=\"{}\">{}</a><a class=\"edit-link\" href=\"{}\">[edit]</a></li>\n",
                    escape_attr(&ToolbarComponent::view_href(file)),
                    escape_html(file),
                    escape_attr(&ToolbarComponent::edit_href(file)),
                ));
            }
            content.push_str("</ul>\n");
        }
        content.push_str("</body>");

        self.render_shell(&TemplateContext {
            title: "Markdown Files".to_string(),
            style: LIST_STYLE,
            content,
            script: String::new(),
        })
    }

    /// Rendered document page
    pub fn render_view(&self, file: &str, result: &MarkdownResult, last_modified: Option<&str>) -> String {
        let meta = last_modified
            .map(|stamp| format!("<p class=\"meta\">Last modified: {}</p>\n", escape_html(stamp)))
            .unwrap_or_default();
        let content = format!(
            "<body>\n{}\n{}<article class=\"markdown-body\">\n{}</article>\n</body>",
            self.toolbar.generate_toolbar_html(file, Page::View),
            meta,
            result.html
        );

        self.render_shell(&TemplateContext {
            title: result.title.clone().unwrap_or_else(|| file.to_string()),
            style: DOCUMENT_STYLE,
            content,
            script: String::new(),
        })
    }

    /// Side-by-side editor with live preview for `file`
    pub fn render_editor(&self, file: &str, raw: &str) -> String {
        // The newline after <textarea> is eaten by the HTML parser, so a
        // leading newline in the file survives.
        let content = format!(
            r#"<body data-file="{}">
{}
<div class="editor-container">
    <div class="panel">
        <div class="panel-header">
            Editor
            <div>
                <button class="btn" id="save" type="button">Save</button>
                <span class="message" id="message"></span>
            </div>
        </div>
        <textarea id="editor" spellcheck="false">
{}</textarea>
    </div>
    <div class="panel">
        <div class="panel-header">Preview</div>
        <div class="preview" id="preview"></div>
    </div>
</div>
</body>"#,
            escape_attr(file),
            self.toolbar.generate_toolbar_html(file, Page::Edit),
            escape_html(raw)
        );

        self.render_shell(&TemplateContext {
            title: format!("Edit: {}", file),
            style: EDITOR_STYLE,
            content,
            script: EDITOR_SCRIPT.to_string(),
        })
    }

    /// Error page for `status`
    pub fn render_error(&self, status: StatusCode, message: &str) -> String {
        let reason = status.canonical_reason().unwrap_or("Error");
        let content = format!(
            "<body>\n<h1>{} {}</h1>\n<p>{}</p>\n<p><a href=\"/\">← Back to file list</a></p>\n</body>",
            status.as_u16(),
            escape_html(reason),
            escape_html(message)
        );

        self.render_shell(&TemplateContext {
            title: format!("{} {}", status.as_u16(), reason),
            style: LIST_STYLE,
            content,
            script: String::new(),
        })
    }
}

impl Default for TemplateComponent {
    fn default() -> Self {
        Self::new()
    }
}
