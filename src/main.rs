use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use gitsnap::OutputFormat;
use gitsnap::cli::{CliContext, render, utils::write_err};

/// Prints the branch, HEAD, nearest tag and dirty state of a git working copy
#[derive(Parser)]
#[clap(version, author, about)]
pub struct Cli {
    /// Any directory inside the working copy
    #[clap(default_value = ".")]
    pub dir: PathBuf,

    /// Path to a config file other than gitsnap.toml in the directory
    #[clap(short = 'c', long)]
    pub config_file: Option<PathBuf>,

    /// What to print, defaults to build properties
    #[clap(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Inserted in property names, `git.<prefix>.version` instead of `git.version`
    #[clap(short, long)]
    pub prefix: Option<String>,

    #[command(flatten)]
    pub verbose: Verbosity,
}

fn try_main(cli: &Cli) -> Result<()> {
    let context = CliContext::new(&cli.dir, cli.config_file.as_deref())?;
    let snapshot = gitsnap::extract(&context.dir)?;

    let out = render(
        &snapshot,
        context.format(cli.format),
        context.property_prefix(cli.prefix.as_deref()),
    )?;
    println!("{out}");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match try_main(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", write_err(&*e));
            ExitCode::FAILURE
        }
    }
}
