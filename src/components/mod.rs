pub mod templates;
pub mod toolbar;

pub use templates::{fill_template, TemplateComponent};
pub use toolbar::{Page, ToolbarComponent};
