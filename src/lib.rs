pub mod config;
pub mod context;
pub mod error;
pub mod render;

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::UserConfig;
use crate::context::{load, LoadOptions};
use crate::error::{Result, StacheError};
use crate::render::{Helpers, Template};

/// Options for a single render invocation.
pub struct RenderOptions {
    /// Path to the template file.
    pub template: String,
    /// Context files or directories, merged in order.
    pub context: Vec<String>,
    /// Output file. If None, the result is printed to stdout.
    pub output: Option<String>,
}

/// How context is loaded and which helpers templates may call.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub load: LoadOptions,
    pub helpers: Helpers,
}

impl From<&UserConfig> for Settings {
    fn from(config: &UserConfig) -> Self {
        Self {
            load: config.load_options(),
            helpers: config.helpers(),
        }
    }
}

/// A fully rendered document that has not been written anywhere yet.
#[derive(Debug)]
pub struct RenderedDocument {
    pub content: String,
    pub output: Option<PathBuf>,
}

/// Load the context and render the template in memory.
///
/// Nothing is written; a failure here leaves no trace on disk.
pub fn plan_render(options: &RenderOptions, settings: &Settings) -> Result<RenderedDocument> {
    let context = load(&options.context, &settings.load)?;
    let template = Template::load(Path::new(&options.template))?;
    let content = template.render(&context, &settings.helpers)?;

    Ok(RenderedDocument {
        content,
        output: options.output.as_ref().map(PathBuf::from),
    })
}

/// Write a rendered document to its output file, or to stdout followed by a newline.
pub fn write_output(document: &RenderedDocument) -> Result<()> {
    match &document.output {
        Some(path) => std::fs::write(path, &document.content).map_err(|e| StacheError::Io {
            context: format!("writing {}", path.display()),
            source: e,
        }),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", document.content)
                .and_then(|_| stdout.flush())
                .map_err(|e| StacheError::Io {
                    context: "writing to stdout".into(),
                    source: e,
                })
        }
    }
}

/// Render a template against the merged context and write the result.
pub fn render_to_output(options: &RenderOptions, settings: &Settings) -> Result<RenderedDocument> {
    let document = plan_render(options, settings)?;
    write_output(&document)?;
    Ok(document)
}
