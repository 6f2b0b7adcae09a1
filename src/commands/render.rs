use std::path::Path;

use miette::Result;
use stache::config::load_user_config;
use stache::{render_to_output, RenderOptions, Settings};

use crate::cli::Cli;

pub fn run(cli: Cli) -> Result<()> {
    let user_config = load_user_config(cli.config.as_deref().map(Path::new))?;

    let mut settings = Settings::from(&user_config);
    settings.load.quiet = cli.quiet;
    if cli.unsorted {
        settings.load.sort_entries = false;
    }

    let options = RenderOptions {
        template: cli.template,
        context: cli.context,
        output: cli.output,
    };

    render_to_output(&options, &settings)?;

    Ok(())
}
