use crate::registry::Registry;
use clap::{ArgMatches, Command, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    version,
    name = "devflow",
    about = "Development workflow for a Python package: clean, init, lock, build, upload, bundle"
)]
pub struct Cli {
    /// Virtualenv directory (default: ./venv if present, else $VIRTUAL_ENV, else $WORKON_HOME/<project>, else ./venv)
    #[arg(long, value_name = "PATH")]
    pub venv: Option<PathBuf>,
}

/// Parsed command line: global options plus the chosen subcommand name.
#[derive(Debug)]
pub struct ParsedArgs {
    pub venv: Option<PathBuf>,
    pub command: String,
}

/// The clap command, with one subcommand per registry entry.
pub fn command(registry: &Registry, default_venv: &Path) -> Command {
    let subcommands: Vec<Command> = registry
        .describe()
        .map(|(name, description)| Command::new(name.to_string()).about(description.to_string()))
        .collect();
    Cli::command()
        .mut_arg("venv", |a| a.default_value(default_venv.as_os_str().to_owned()))
        .subcommands(subcommands)
        .subcommand_required(true)
        .arg_required_else_help(true)
}

pub fn try_parse_from<I, T>(registry: &Registry, default_venv: &Path, args: I) -> clap::error::Result<ParsedArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(registry, default_venv).try_get_matches_from(args)?;
    from_matches(&matches)
}

fn from_matches(matches: &ArgMatches) -> clap::error::Result<ParsedArgs> {
    let cli = Cli::from_arg_matches(matches)?;
    let command = matches
        .subcommand_name()
        .map(str::to_string)
        .ok_or_else(|| clap::Error::new(clap::error::ErrorKind::MissingSubcommand))?;
    Ok(ParsedArgs { venv: cli.venv, command })
}

/// Parses the process arguments, exiting with clap's usage status on error.
pub fn parse(registry: &Registry, default_venv: &Path) -> ParsedArgs {
    try_parse_from(registry, default_venv, std::env::args_os()).unwrap_or_else(|e| e.exit())
}
