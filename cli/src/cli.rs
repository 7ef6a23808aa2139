// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf, process::ExitCode};

use calsync_core::{APP_NAME, Synchronizer};
use calsync_gcal::GoogleCalendar;
use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::cmd_apply::CmdApply;
use crate::cmd_context::CmdContext;
use crate::config::{Config, parse_config};

/// Run the calsync command-line interface.
pub async fn run() -> ExitCode {
    init_logging();
    let result = match Cli::parse() {
        Ok(cli) => cli.run().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout only carries command output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    #[must_use]
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Reconcile decided calendar actions against a remote calendar.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $CALSYNC_CONFIG, then \
$XDG_CONFIG_HOME/calsync/config.toml on Linux and MacOS, \
%APPDATA%/calsync/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(CmdContext::command())
            .subcommand(CmdApply::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(&matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(&matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let command = match matches.subcommand() {
            Some((CmdContext::NAME, matches)) => Commands::Context(CmdContext::from(matches)?),
            Some((CmdApply::NAME, matches)) => Commands::Apply(CmdApply::from(matches)?),
            _ => return Err("Invalid command".into()),
        };

        let config = matches.get_one("config").cloned();
        Ok(Self { config, command })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Print the remapped calendar context
    Context(CmdContext),

    /// Apply a batch of actions
    Apply(CmdApply),
}

impl Commands {
    /// Run the command with the given configuration
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        tracing::debug!("Parsing configuration...");
        let config = parse_config(config).await?;
        let sync = connect(config)?;
        match self {
            Self::Context(a) => a.run(&sync).await,
            Self::Apply(a) => a.run(&sync).await,
        }
    }
}

fn connect(config: Config) -> Result<Synchronizer<GoogleCalendar>, Box<dyn Error>> {
    let backend = GoogleCalendar::new(config.google)?;
    Ok(Synchronizer::new(backend, config.sync)?)
}
