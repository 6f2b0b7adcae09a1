mod cli;
mod commands;

use clap::Parser;
use cli::Cli;

fn main() -> miette::Result<()> {
    commands::render::run(Cli::parse())
}
