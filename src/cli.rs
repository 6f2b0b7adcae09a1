use clap::Parser;

#[derive(Parser)]
#[command(
    name = "stache",
    about = "Render a template against context merged from JSON, YAML and plist files",
    version
)]
pub struct Cli {
    /// The template file
    #[arg(short, long, value_name = "PATH")]
    pub template: String,

    /// One or more context files or directories, merged in order (later files win)
    #[arg(short, long, value_name = "PATH", num_args = 1.., required = true)]
    pub context: Vec<String>,

    /// Write the output to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Do not warn about files skipped while reading context directories
    #[arg(short, long)]
    pub quiet: bool,

    /// Merge directory entries in filesystem order instead of sorting by name
    #[arg(long)]
    pub unsorted: bool,

    /// Read settings from this file instead of ~/.config/stache/config.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,
}
