mod filters;
pub mod helpers;
pub mod markdown;
pub mod template;

pub use helpers::{Helper, Helpers};
pub use markdown::{markdown_to_html, MarkdownOptions};
pub use template::{render, Template};
