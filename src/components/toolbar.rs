use log::debug;

use crate::utils::{encode_query_value, escape_attr, escape_html};

/// Page a toolbar is rendered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    View,
    Edit,
}

/// Action links shown above a document: back to the list, the file name and
/// a switch between the rendered view and the editor
pub struct ToolbarComponent;

impl ToolbarComponent {
    pub fn new() -> Self {
        Self
    }

    /// Link to the rendered view of `file`
    pub fn view_href(file: &str) -> String {
        format!("/view?file={}", encode_query_value(file))
    }

    /// Link to the editor for `file`
    pub fn edit_href(file: &str) -> String {
        format!("/edit?file={}", encode_query_value(file))
    }

    /// Generate toolbar HTML for `file` on `page`
    pub fn generate_toolbar_html(&self, file: &str, page: Page) -> String {
        debug!("Generating toolbar for '{}' on {:?}", file, page);
        let (label, switch_href, switch_label) = match page {
            Page::View => (escape_html(file), Self::edit_href(file), "[edit]"),
            Page::Edit => (format!("Editing: {}", escape_html(file)), Self::view_href(file), "View rendered"),
        };
        format!(
            "<nav class=\"toolbar\"><a href=\"/\" class=\"back-link\">← Back to file list</a>\
             <span class=\"filename\">{}</span>\
             <a href=\"{}\" class=\"switch-link\">{}</a></nav>",
            label,
            escape_attr(&switch_href),
            switch_label
        )
    }
}

impl Default for ToolbarComponent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_toolbar_links_to_editor() {
        let html = ToolbarComponent::new().generate_toolbar_html("docs/a b.md", Page::View);
        assert!(html.contains("href=\"/edit?file=docs%2Fa%20b.md\""));
        assert!(html.contains("<span class=\"filename\">docs/a b.md</span>"));
    }

    #[test]
    fn test_edit_toolbar_escapes_name() {
        let html = ToolbarComponent::new().generate_toolbar_html("<x>.md", Page::Edit);
        assert!(html.contains("Editing: &lt;x&gt;.md"));
        assert!(html.contains("href=\"/view?file=%3Cx%3E.md\""));
    }
}
