//! Command-line client for the campus portal.

mod client;
mod workflow;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use common::{EventStatus, HackathonDraft, HackathonForm, ProblemStatementDraft};
use console::style;
use tracing_subscriber::EnvFilter;

use crate::client::{ApiError, EventSummary, PortalClient};
use crate::workflow::WorkflowError;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Administer hackathons on the campus portal")]
#[command(version)]
struct Cli {
    /// Base URL of the portal server
    #[arg(long, env = "PORTAL_URL", default_value = "http://127.0.0.1:3000", global = true)]
    base_url: String,

    /// Bearer token from `portal login`
    #[arg(long, env = "PORTAL_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print a token for PORTAL_TOKEN
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// List events with their status
    Events {
        /// Only events in this phase (upcoming, ongoing, past)
        #[arg(long)]
        status: Option<EventStatus>,
        /// Case-insensitive substring of the event name
        #[arg(long)]
        search: Option<String>,
    },

    /// Hackathon management
    #[command(subcommand)]
    Hackathon(HackathonCommand),

    /// Global team size setting
    #[command(subcommand)]
    TeamSize(TeamSizeCommand),
}

#[derive(Subcommand)]
enum HackathonCommand {
    /// Create an event and its problem statements
    Create {
        #[arg(short, long)]
        name: String,

        /// Start time (RFC 3339)
        #[arg(long)]
        start: Option<DateTime<Utc>>,

        /// End time (RFC 3339)
        #[arg(long)]
        end: Option<DateTime<Utc>>,

        /// Problem statement as `title|description|team limit`; repeatable
        #[arg(short, long = "problem", value_parser = parse_problem)]
        problems: Vec<ProblemStatementDraft>,

        /// Create everything in one server-side transaction
        #[arg(long)]
        atomic: bool,
    },
}

#[derive(Subcommand)]
enum TeamSizeCommand {
    /// Show the current team size and its version
    Get,
    /// Change the global team size
    Set { team_size: i32 },
}

/// Parse `title|description|limit`. A missing or unparsable limit becomes 1.
fn parse_problem(s: &str) -> Result<ProblemStatementDraft, String> {
    let mut parts = s.splitn(3, '|');
    let title = parts.next().unwrap_or_default();
    let Some(description) = parts.next() else {
        return Err("expected `title|description[|team limit]`".into());
    };
    let team_limit = match parts.next().map(str::trim) {
        None | Some("") => 1,
        Some(n) => n
            .parse()
            .map_err(|e| format!("invalid team limit '{n}': {e}"))?,
    };
    Ok(ProblemStatementDraft::new(title, description, team_limit))
}

fn print_events(events: &[EventSummary]) {
    if events.is_empty() {
        println!("{}", style("No events.").dim());
        return;
    }
    for e in events {
        println!(
            "{:>5}  {:<32} {:<9} {} -> {}  teams: {}  problem statements: {}",
            e.id,
            e.name,
            style(e.status.as_str()).cyan(),
            e.start_date.format("%Y-%m-%d %H:%M"),
            e.end_date.format("%Y-%m-%d %H:%M"),
            e.team_count,
            e.problem_statement_count,
        );
    }
}

fn with_login_hint(err: ApiError) -> anyhow::Error {
    if err.is_unauthenticated() {
        anyhow::anyhow!("{err}\nRun `portal login` and export PORTAL_TOKEN.")
    } else {
        err.into()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let client = PortalClient::new(&cli.base_url, cli.token.clone())
        .context("Failed to build HTTP client")?;

    match cli.command {
        Commands::Login { username, password } => {
            let resp = client.login(&username, &password)?;
            eprintln!(
                "{} logged in as {} ({})",
                style("✓").green(),
                resp.username,
                resp.role
            );
            println!("{}", resp.token);
        }
        Commands::Events { status, search } => {
            let events = client
                .search_events(status, search.as_deref())
                .map_err(with_login_hint)?;
            print_events(&events);
        }
        Commands::Hackathon(HackathonCommand::Create {
            name,
            start,
            end,
            problems,
            atomic,
        }) => {
            let mut form = HackathonForm::with_draft(HackathonDraft {
                name,
                start_date: start,
                end_date: end,
                problem_statements: problems,
            });
            let result = if atomic {
                workflow::create_hackathon_atomic(&client, &mut form)
            } else {
                workflow::create_hackathon(&client, &mut form)
            };
            match result {
                Ok(events) => {
                    println!("{} hackathon created", style("✓").green());
                    print_events(&events);
                }
                Err(WorkflowError::Refresh(e)) => {
                    println!("{} hackathon created", style("✓").green());
                    eprintln!("{} {}", style("warning:").yellow(), e);
                }
                Err(e @ WorkflowError::PartialFailure { .. }) => {
                    bail!("{e}\nRemove or complete the event manually before retrying.");
                }
                Err(e) => bail!(e),
            }
        }
        Commands::TeamSize(TeamSizeCommand::Get) => {
            let setting = client.get_team_size().map_err(with_login_hint)?;
            println!("team size: {} (version {})", setting.team_size, setting.version);
        }
        Commands::TeamSize(TeamSizeCommand::Set { team_size }) => {
            let setting = client.set_team_size(team_size).map_err(with_login_hint)?;
            println!(
                "{} team size set to {} (version {})",
                style("✓").green(),
                setting.team_size,
                setting.version
            );
        }
    }

    Ok(())
}
