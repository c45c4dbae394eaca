use clap::Parser;
use pagesmith::convert::ExternalConverter;
use pagesmith::output;
use pagesmith::site::{self, SiteOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pagesmith")]
#[command(about = "Minimal static site generator")]
#[command(long_about = "\
Minimal static site generator

Reads a flat source directory and regenerates the destination directory.

Source layout:

  src/
  ├── config.json          # Site values: strings, string maps, string lists
  ├── default.template     # Tera template used unless a page picks another
  ├── hello.page           # Markdown page → dst/hello.html
  └── style.css            # Anything else is copied verbatim

Page directives (whole line, keys are lowercase letters):

  ---set <key> <value>
  ---setblock <key>
  ...
  ---endblock
  ---settemplate <name>

Page bodies are converted with the `markdown` command, which must be on PATH.
The destination's existing contents are removed before every build.")]
#[command(version)]
struct Cli {
    /// Directory where to find the source files
    #[arg(long, default_value = "src")]
    src: PathBuf,

    /// Directory to write the output to
    #[arg(long, default_value = "dst")]
    dst: PathBuf,
}

impl From<Cli> for SiteOptions {
    fn from(cli: Cli) -> Self {
        Self {
            source: cli.src,
            destination: cli.dst,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = SiteOptions::from(Cli::parse());
    let report = site::build(&options, &ExternalConverter::default())?;
    output::print_summary(&report, &options.destination);
    Ok(())
}
