//! # gnore
//!
//! **gnore** fetches the github/gitignore template collection and writes
//! templates into your projects.
//!
//! Features:
//! - `gnore update` clones the template repository, or pulls it if already cloned
//! - `gnore list` prints every available template name
//! - `gnore get <name> [dir]` writes `<dir>/.gitignore`, appending when it already exists
//! - `gnore home` prints the gnore home directory
//!
//! Set `GNORE_LOG` (e.g. `GNORE_LOG=gnore=debug`) for diagnostics on stderr.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use gnore::{Settings, cmd_get, cmd_list, cmd_update, gnore_home, paths};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line interface definition.
#[derive(Parser, Debug)]
#[command(
    name = "gnore",
    version,
    about = "gnore - fetch, list and merge .gitignore templates"
)]
struct Cli {
    /// Use this directory as the template mirror
    #[arg(long, global = true, value_name = "DIR")]
    mirror: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Cmd {
    /// List available templates
    List,
    /// Clone or pull the template repository
    Update,
    /// Write a template to <DEST>/.gitignore, appending if it exists
    Get {
        /// Template name, matched case-insensitively
        name: String,
        /// Destination directory
        #[arg(default_value = ".")]
        dest: PathBuf,
    },
    /// Print the gnore home directory
    Home,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("GNORE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_settings(mirror: Option<PathBuf>) -> Result<Settings> {
    let settings = Settings::load(&paths()?, mirror)?;
    tracing::debug!(?settings, "resolved settings");
    Ok(settings)
}

fn run(cli: Cli) -> Result<()> {
    let Some(cmd) = cli.cmd else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match cmd {
        Cmd::List => cmd_list(&load_settings(cli.mirror)?),
        Cmd::Update => cmd_update(&load_settings(cli.mirror)?),
        Cmd::Get { name, dest } => cmd_get(&load_settings(cli.mirror)?, &name, &dest),
        Cmd::Home => {
            println!("{}", gnore_home()?.display());
            Ok(())
        }
    }
}

/// Outcome of argument parsing.
#[derive(Debug)]
enum Invocation {
    Run(Cli),
    /// Unknown verb: show clap's message and usage, but succeed.
    Usage(clap::Error),
    /// Help, version, or a malformed command line; clap picks the status.
    Exit(clap::Error),
}

fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Invocation::Run(cli),
        Err(e) if e.kind() == ErrorKind::InvalidSubcommand => Invocation::Usage(e),
        Err(e) => Invocation::Exit(e),
    }
}

/// Parse `args`, run the command and map the result to a process status.
///
/// All errors surface here; this is the only place that picks an exit code.
fn execute<I, T>(args: I) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match parse_args(args) {
        Invocation::Run(cli) => match run(cli) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}", format!("error: {:#}", e).red().bold());
                1
            }
        },
        Invocation::Usage(e) => {
            e.print().ok();
            0
        }
        Invocation::Exit(e) => {
            e.print().ok();
            u8::try_from(e.exit_code()).unwrap_or(2)
        }
    }
}

/// CLI entry point.
fn main() -> ExitCode {
    init_tracing();
    ExitCode::from(execute(std::env::args_os()))
}
