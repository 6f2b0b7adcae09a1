use serde::{Deserialize, Serialize};

use crate::context::LoadOptions;
use crate::render::{Helper, Helpers, MarkdownOptions};

/// User-level settings loaded from `~/.config/stache/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UserConfig {
    pub context: ContextConfig,
    pub helpers: HelpersConfig,
    pub markdown: MarkdownOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Merge directory entries in file-name order. When false, the
    /// filesystem's own enumeration order is used.
    pub sort_entries: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { sort_entries: true }
    }
}

/// Which helpers templates can call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HelpersConfig {
    #[serde(rename = "markdownToHtml")]
    pub markdown_to_html: bool,
    pub each: bool,
    pub zip: bool,
}

impl Default for HelpersConfig {
    fn default() -> Self {
        Self {
            markdown_to_html: true,
            each: true,
            zip: true,
        }
    }
}

impl UserConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sort_entries: self.context.sort_entries,
            ..LoadOptions::default()
        }
    }

    pub fn helpers(&self) -> Helpers {
        let toggles = [
            (Helper::MarkdownToHtml, self.helpers.markdown_to_html),
            (Helper::Each, self.helpers.each),
            (Helper::Zip, self.helpers.zip),
        ];

        toggles
            .into_iter()
            .fold(Helpers::none(), |helpers, (helper, enabled)| {
                if enabled {
                    helpers.with(helper)
                } else {
                    helpers
                }
            })
            .with_markdown_options(self.markdown)
    }
}
