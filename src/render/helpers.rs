use std::collections::BTreeSet;
use std::fmt;

use tera::Tera;

use crate::render::filters::{each, zip_filter, zip_function, MarkdownToHtml};
use crate::render::markdown::MarkdownOptions;

/// A named helper that can be made available to templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Helper {
    MarkdownToHtml,
    Each,
    Zip,
}

impl Helper {
    pub const ALL: [Helper; 3] = [Helper::MarkdownToHtml, Helper::Each, Helper::Zip];

    /// The name templates use to call this helper.
    pub fn name(self) -> &'static str {
        match self {
            Helper::MarkdownToHtml => "markdownToHtml",
            Helper::Each => "each",
            Helper::Zip => "zip",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.name() == name)
    }
}

impl fmt::Display for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The helper namespace handed to a single render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Helpers {
    enabled: BTreeSet<Helper>,
    markdown: MarkdownOptions,
}

impl Default for Helpers {
    fn default() -> Self {
        Self {
            enabled: Helper::ALL.into_iter().collect(),
            markdown: MarkdownOptions::default(),
        }
    }
}

impl Helpers {
    /// A namespace with no helpers at all.
    pub fn none() -> Self {
        Self {
            enabled: BTreeSet::new(),
            markdown: MarkdownOptions::default(),
        }
    }

    pub fn with(mut self, helper: Helper) -> Self {
        self.enabled.insert(helper);
        self
    }

    pub fn without(mut self, helper: Helper) -> Self {
        self.enabled.remove(&helper);
        self
    }

    pub fn with_markdown_options(mut self, options: MarkdownOptions) -> Self {
        self.markdown = options;
        self
    }

    pub fn is_enabled(&self, helper: Helper) -> bool {
        self.enabled.contains(&helper)
    }

    pub fn enabled(&self) -> impl Iterator<Item = Helper> + '_ {
        self.enabled.iter().copied()
    }

    pub fn markdown_options(&self) -> MarkdownOptions {
        self.markdown
    }

    /// Register every enabled helper into a Tera instance.
    pub(crate) fn register(&self, tera: &mut Tera) {
        for helper in self.enabled() {
            match helper {
                Helper::MarkdownToHtml => {
                    let markdown = MarkdownToHtml {
                        options: self.markdown,
                    };
                    tera.register_filter(helper.name(), markdown);
                    tera.register_function(helper.name(), markdown);
                }
                Helper::Each => tera.register_filter(helper.name(), each),
                Helper::Zip => {
                    tera.register_filter(helper.name(), zip_filter);
                    tera.register_function(helper.name(), zip_function);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_all_helpers() {
        let helpers = Helpers::default();
        for helper in Helper::ALL {
            assert!(helpers.is_enabled(helper), "{helper} should be enabled");
        }
    }

    #[test]
    fn builder_toggles_helpers() {
        let helpers = Helpers::none().with(Helper::Zip);
        assert!(helpers.is_enabled(Helper::Zip));
        assert!(!helpers.is_enabled(Helper::Each));

        let helpers = Helpers::default().without(Helper::MarkdownToHtml);
        assert_eq!(
            helpers.enabled().collect::<Vec<_>>(),
            vec![Helper::Each, Helper::Zip]
        );
    }

    #[test]
    fn names_round_trip() {
        assert_eq!(Helper::from_name("markdownToHtml"), Some(Helper::MarkdownToHtml));
        assert_eq!(Helper::from_name("each"), Some(Helper::Each));
        assert_eq!(Helper::from_name("zip"), Some(Helper::Zip));
        assert_eq!(Helper::from_name("markdowntohtml"), None);
    }
}
