//! AML console CLI
//!
//! A command-line front end for the AML compliance console. Each command
//! loads one view (or runs one action) against the backend and prints the
//! rendered panels.

mod commands;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use aml_console::{Console, ConsoleConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

/// amlctl: browse and operate the AML compliance back office.
#[derive(Parser, Debug)]
#[command(name = "amlctl", version, about)]
struct Cli {
    /// Backend base URL, e.g. `https://aml.example.com/api/v1`.
    #[arg(long, env = "AML_CONSOLE_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Anti-forgery token sent on mutating requests.
    #[arg(long, env = "AML_CONSOLE_XSRF_TOKEN", global = true)]
    xsrf_token: Option<String>,

    /// `Cookie` header of an authenticated session.
    #[arg(long, env = "AML_CONSOLE_SESSION_COOKIE", global = true)]
    session_cookie: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "AML_CONSOLE_TIMEOUT_SECS", global = true)]
    timeout: Option<u64>,

    /// TOML configuration file. Flags override its values.
    #[arg(long, env = "AML_CONSOLE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a view by name and print it.
    View(commands::view::ViewArgs),
    /// Browse cases and act on one.
    Cases(commands::cases::CasesArgs),
    /// Manage case queues.
    Queues(commands::queues::QueuesArgs),
    /// Transaction monitoring: live feed, analytics, SARs, reports.
    Monitoring(commands::monitoring::MonitoringArgs),
    /// Risk heatmap, trends and false positive rate.
    Analytics(commands::analytics::AnalyticsArgs),
    /// Regulatory reports (CTR, LCTR, IFTR).
    Reports(commands::reports::ReportsArgs),
    /// Limits, thresholds, velocity rules and country rules.
    Limits(commands::limits::LimitsArgs),
    /// Compliance calendar and deadlines.
    Calendar(commands::calendar::CalendarArgs),
}

impl Cli {
    fn console_config(&self) -> anyhow::Result<ConsoleConfig> {
        let mut config = match &self.config {
            Some(path) => ConsoleConfig::from_file(path)?,
            None => ConsoleConfig::from_env(),
        };
        if let Some(endpoint) = &self.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(token) = &self.xsrf_token {
            config = config.with_xsrf_token(token);
        }
        if let Some(cookie) = &self.session_cookie {
            config = config.with_session_cookie(cookie);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.console_config()?;
    tracing::debug!(endpoint = %config.endpoint, "connecting");
    let console = Console::from_config(config)?;
    let format = cli.format;

    match cli.command {
        Command::View(args) => commands::view::run(&console, &args, format).await,
        Command::Cases(args) => commands::cases::run(&console, &args, format).await,
        Command::Queues(args) => commands::queues::run(&console, &args, format).await,
        Command::Monitoring(args) => commands::monitoring::run(console, &args, format).await,
        Command::Analytics(args) => commands::analytics::run(&console, &args, format).await,
        Command::Reports(args) => commands::reports::run(&console, &args, format).await,
        Command::Limits(args) => commands::limits::run(&console, &args, format).await,
        Command::Calendar(args) => commands::calendar::run(&console, &args, format).await,
    }
}
