use std::collections::HashMap;
use log::debug;
use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::types::MarkdownResult;
use crate::utils::escape_attr;

/// Service for handling markdown rendering
#[derive(Clone, Copy)]
pub struct MarkdownService {
    options: Options,
}

impl MarkdownService {
    /// Create a new markdown service with tables, footnotes, strikethrough
    /// and task lists enabled
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }

    /// Render markdown to HTML. Single newlines become `<br />`, headings get
    /// slug ids and the first level-one heading becomes the title.
    pub fn render(&self, content: &str) -> MarkdownResult {
        let mut events: Vec<Event> = Vec::new();
        let mut title: Option<String> = None;
        let mut id_counts: HashMap<String, usize> = HashMap::new();
        // (level, buffered events, plain text) of the heading being read
        let mut heading: Option<(HeadingLevel, Vec<Event>, String)> = None;

        for event in Parser::new_ext(content, self.options) {
            let event = match event {
                Event::SoftBreak => Event::HardBreak,
                other => other,
            };

            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((level, Vec::new(), String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    let Some((level, inner, text)) = heading.take() else {
                        continue;
                    };
                    let lvl = heading_level_to_u32(level);
                    let text = text.trim().to_string();
                    let id = unique_id(&mut id_counts, &text, lvl);
                    if title.is_none() && lvl == 1 && !text.is_empty() {
                        title = Some(text);
                    }
                    events.push(Event::Html(CowStr::from(format!(
                        "<h{} id=\"{}\">",
                        lvl,
                        escape_attr(&id)
                    ))));
                    events.extend(inner);
                    events.push(Event::Html(CowStr::from(format!("</h{}>\n", lvl))));
                }
                other => match heading.as_mut() {
                    Some((_, inner, text)) => {
                        match &other {
                            Event::Text(t) | Event::Code(t) => text.push_str(t),
                            Event::HardBreak => text.push(' '),
                            _ => {}
                        }
                        inner.push(other);
                    }
                    None => events.push(other),
                },
            }
        }

        let mut out = String::with_capacity(content.len() + content.len() / 2);
        html::push_html(&mut out, events.into_iter());
        debug!("Rendered {} bytes of markdown into {} bytes of HTML", content.len(), out.len());

        MarkdownResult { html: out, title }
    }
}

impl Default for MarkdownService {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert heading level to u32
fn heading_level_to_u32(level: HeadingLevel) -> u32 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Slug for a heading, suffixed with `-N` when already used on the page
fn unique_id(id_counts: &mut HashMap<String, usize>, text: &str, level: u32) -> String {
    let mut id = slugify(text);
    if id.is_empty() {
        id = format!("h{}", level);
    }
    let count = id_counts.entry(id.clone()).or_insert(0);
    if *count > 0 {
        id = format!("{}-{}", id, *count);
    }
    *count += 1;
    id
}

/// Create URL-friendly slug from text
fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_dash = false;
    for ch in text.chars() {
        let c = ch.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_dash = false;
        } else if (c.is_ascii_whitespace() || c == '-' || c == '_') && !last_dash && !out.is_empty() {
            out.push('-');
            last_dash = true;
        }
    }
    if out.ends_with('-') {
        out.pop();
    }
    out
}
