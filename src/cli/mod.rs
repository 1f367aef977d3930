use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::services::store::{DEFAULT_INPUT, DEFAULT_OUTPUT};
use crate::services::{normalize, normalize_accounts, Store};
use crate::tui::{self, Tab};
use crate::types::{Result, SubreportError, Subscription};

/// Environment variable holding the default log filter
pub const LOG_ENV: &str = "SUBREPORT_LOG";

/// Subscription report: normalize account transactions and chart them
#[derive(Parser, Debug)]
#[command(name = "subreport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Action to run: report (default), print_data, subs_report, timeline,
    /// active_subs, stats, load_data
    #[arg(value_name = "COMMAND")]
    command: Option<String>,

    /// Accounts export to read
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Subscriptions file to write
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Log filter such as "debug" (overrides SUBREPORT_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

/// Actions reachable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Normalize, show both charts, then persist
    Report,
    /// Normalize and print the records as JSON to stdout
    PrintData,
    /// Normalize and persist
    SubsReport,
    /// Normalize and show the timeline only
    Timeline,
    /// Normalize and show the monthly active chart only
    ActiveSubs,
    /// Normalize and print acceptance/rejection counts
    Stats,
    /// Load and validate the input
    LoadData,
}

/// Command name table. Aliases map to the same action.
pub const COMMANDS: &[(&str, Command)] = &[
    ("report", Command::Report),
    ("print_data", Command::PrintData),
    ("subs_report", Command::SubsReport),
    ("timeline", Command::Timeline),
    ("dogant", Command::Timeline),
    ("active_subs", Command::ActiveSubs),
    ("active_subs_plot", Command::ActiveSubs),
    ("stats", Command::Stats),
    ("load_data", Command::LoadData),
];

impl Command {
    /// Look up a command by name
    pub fn from_name(name: &str) -> Result<Self> {
        COMMANDS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, cmd)| cmd)
            .ok_or_else(|| SubreportError::UnknownCommand(name.to_string()))
    }

    pub fn execute(self, store: &Store) -> anyhow::Result<()> {
        match self {
            Command::Report => {
                let subs = load_subscriptions(store)?;
                tui::run(&subs, vec![Tab::Active, Tab::Timeline])?;
                store.save_subscriptions(&subs)?;
            }
            Command::PrintData => {
                let subs = load_subscriptions(store)?;
                println!("{}", store.to_json(&subs)?);
            }
            Command::SubsReport => {
                let subs = load_subscriptions(store)?;
                store.save_subscriptions(&subs)?;
            }
            Command::Timeline => {
                let subs = load_subscriptions(store)?;
                tui::run(&subs, vec![Tab::Timeline])?;
            }
            Command::ActiveSubs => {
                let subs = load_subscriptions(store)?;
                tui::run(&subs, vec![Tab::Active])?;
            }
            Command::Stats => {
                let accounts = store.load_accounts()?;
                let report = normalize_accounts(&accounts)?;
                let stats = report.stats();
                println!("accepted: {}", report.subscriptions.len());
                println!("rejected: {}", stats.total());
                println!("  bad end date: {}", stats.end_date_out_of_range);
                println!("  missing date: {}", stats.missing_date);
            }
            Command::LoadData => {
                let accounts = store.load_accounts()?;
                println!(
                    "{} accounts loaded from {}",
                    accounts.len(),
                    store.input_path().display()
                );
            }
        }
        Ok(())
    }
}

fn load_subscriptions(store: &Store) -> Result<Vec<Subscription>> {
    let accounts = store.load_accounts()?;
    normalize(&accounts)
}

/// Build the log filter: explicit level, then SUBREPORT_LOG, then "warn"
fn log_filter(level: Option<&str>) -> EnvFilter {
    level
        .and_then(|l| EnvFilter::try_new(l).ok())
        .or_else(|| EnvFilter::try_from_env(LOG_ENV).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Route diagnostics to stderr so stdout stays clean for JSON
fn init_logging(level: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init();
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        init_logging(self.log_level.as_deref());

        let command = match self.command.as_deref() {
            None => Command::Report,
            Some(name) => match Command::from_name(name) {
                Ok(cmd) => cmd,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Ok(());
                }
            },
        };

        let store = Store::new(self.input, self.output).with_pretty(self.pretty);
        tracing::debug!(?command, input = %store.input_path().display(), "running");
        command.execute(&store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["subreport"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.input, PathBuf::from("accounts.json"));
        assert_eq!(cli.output, PathBuf::from("subscriptions.json"));
        assert!(!cli.pretty);
    }

    #[test]
    fn test_cli_parse_command() {
        let cli = Cli::try_parse_from(["subreport", "print_data"]).unwrap();
        assert_eq!(cli.command.as_deref(), Some("print_data"));
    }

    #[test]
    fn test_cli_parse_paths_and_flags() {
        let cli = Cli::try_parse_from([
            "subreport",
            "subs_report",
            "--input",
            "dump/a.json",
            "--output",
            "out/s.json",
            "--pretty",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("dump/a.json"));
        assert_eq!(cli.output, PathBuf::from("out/s.json"));
        assert!(cli.pretty);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_rejects_second_positional() {
        assert!(Cli::try_parse_from(["subreport", "report", "extra"]).is_err());
    }

    #[test]
    fn test_every_table_entry_resolves() {
        for (name, cmd) in COMMANDS {
            assert_eq!(Command::from_name(name).unwrap(), *cmd);
        }
    }

    #[test]
    fn test_table_names_unique() {
        let names: HashSet<&str> = COMMANDS.iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), COMMANDS.len());
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Command::from_name("dogant").unwrap(), Command::Timeline);
        assert_eq!(
            Command::from_name("active_subs_plot").unwrap(),
            Command::ActiveSubs
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = Command::from_name("calc_subs").unwrap_err();
        assert!(matches!(err, SubreportError::UnknownCommand(ref n) if n == "calc_subs"));
        assert_eq!(err.to_string(), "Unknown command 'calc_subs'.");
    }

    #[test]
    fn test_unknown_command_does_no_work() {
        let temp = tempfile::TempDir::new().unwrap();
        let output = temp.path().join("subscriptions.json");
        let cli = Cli::try_parse_from([
            "subreport",
            "nope",
            "--input",
            temp.path().join("missing.json").to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();

        // Missing input would fail if any action ran
        assert!(cli.run().is_ok());
        assert!(!output.exists());
    }

    #[test]
    fn test_log_filter_explicit_level() {
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
    }
}
