use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};

/// Markdown dialect extensions enabled for `markdownToHtml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub footnotes: bool,
    pub tasklists: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            footnotes: false,
            tasklists: false,
            smart_punctuation: false,
        }
    }
}

impl MarkdownOptions {
    fn parser_options(self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options.set(Options::ENABLE_SMART_PUNCTUATION, self.smart_punctuation);
        options
    }
}

/// Convert markdown to HTML. An absent source stays absent.
pub fn markdown_to_html(source: Option<&str>, options: MarkdownOptions) -> Option<String> {
    let source = source?;
    let parser = Parser::new_ext(source, options.parser_options());
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    Some(out)
}
