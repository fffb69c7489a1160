use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use followup_core::{Suggestion, parse_local_to_utc};
use followup_engine::{
    FixedClock, FollowUpEngine, MaterializeReport, MemoryStore, SuggestRun,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

mod config;
mod snapshot;
mod state;

use config::{Config, load_config};

#[derive(Parser, Debug)]
#[command(
    name = "followup",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FOLLOWUP_BUILD_SHA"), ")"),
    about = "Follow-up suggestion engine for clients and invoices"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Options shared by commands that read a snapshot.
#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Snapshot JSON with clients, invoices, reminders, notifications
    #[arg(long)]
    snapshot: PathBuf,

    /// User to evaluate (default: config defaults.user_id)
    #[arg(long)]
    user: Option<String>,

    /// Pin "now" as local wall-clock time, e.g. "2026-03-10 09:00"
    #[arg(long)]
    now: Option<String>,

    /// IANA zone for --now (default: config defaults.timezone)
    #[arg(long)]
    tz: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print ranked suggestions without writing anything
    Suggest {
        #[command(flatten)]
        run: RunArgs,

        /// Emit suggestions as JSON (feedable to `followup create`)
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Daily run: summary notification + auto-create urgent reminders
    Daily {
        #[command(flatten)]
        run: RunArgs,

        /// Run for every user present in the snapshot
        #[arg(long, default_value_t = false, conflicts_with = "user")]
        all_users: bool,

        /// Save created reminders/notifications back into the snapshot
        #[arg(long, default_value_t = false)]
        write: bool,
    },

    /// Materialize suggestions from a JSON file
    Create {
        #[command(flatten)]
        run: RunArgs,

        /// JSON array of suggestions
        #[arg(long)]
        suggestions: PathBuf,

        #[arg(long, default_value_t = false)]
        write: bool,
    },

    /// Manage ~/.followup/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Suggest { run, json } => {
            let cfg = load_config()?;
            let (engine, user) = open_engine(&run, &cfg)?;
            let result = engine.suggest(&user).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&result.suggestions)?);
            } else {
                print_run(&result);
            }
        }

        Command::Daily {
            run,
            all_users,
            write,
        } => {
            let cfg = load_config()?;
            let (engine, user) = open_engine(&run, &cfg)?;

            let users = if all_users {
                snapshot::user_ids(&engine.store().snapshot().await)
            } else {
                vec![user]
            };

            for (user_id, result) in engine.run_daily_for_users(&users).await {
                match result {
                    Ok(report) => {
                        print_run(&report.run);
                        if report.summary_notified {
                            println!("Summary notification sent.");
                        }
                        match &report.materialized {
                            Some(m) => print_materialized(m),
                            None => println!("No reminders auto-created."),
                        }
                        for e in &report.errors {
                            println!("! {e}");
                        }
                    }
                    Err(e) => eprintln!("{user_id}: {e}"),
                }
                println!();
            }

            if write {
                persist(&engine, &run.snapshot).await?;
            }
        }

        Command::Create {
            run,
            suggestions,
            write,
        } => {
            let cfg = load_config()?;
            let batch: Vec<Suggestion> = snapshot::load_suggestions(&suggestions)?;
            let (engine, user) = open_engine(&run, &cfg)?;

            let report = engine.create_from_suggestions(&user, &batch).await?;
            print_materialized(&report);

            if write {
                persist(&engine, &run.snapshot).await?;
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

fn resolve_now(run: &RunArgs, cfg: &Config) -> Result<DateTime<Utc>> {
    match &run.now {
        Some(local) => {
            let tz = run.tz.as_deref().unwrap_or(&cfg.defaults.timezone);
            parse_local_to_utc(local, tz).with_context(|| format!("--now {local}"))
        }
        None => Ok(Utc::now()),
    }
}

/// Load the snapshot and build an engine pinned to one `now` for the whole invocation.
fn open_engine(
    run: &RunArgs,
    cfg: &Config,
) -> Result<(FollowUpEngine<MemoryStore, FixedClock>, String)> {
    if !run.snapshot.exists() {
        bail!("snapshot not found: {}", run.snapshot.display());
    }
    let snap = snapshot::load_snapshot(&run.snapshot)?;
    let now = resolve_now(run, cfg)?;
    let user = run
        .user
        .clone()
        .unwrap_or_else(|| cfg.defaults.user_id.clone());

    info!(
        snapshot = %run.snapshot.display(),
        user_id = %user,
        now = %now.to_rfc3339(),
        "Loaded snapshot"
    );

    let store = MemoryStore::new(snap).with_clock(Arc::new(FixedClock(now)));
    let engine = FollowUpEngine::with_clock(store, FixedClock(now))
        .with_policy(cfg.policy)
        .with_daily_options(cfg.daily);
    Ok((engine, user))
}

async fn persist(engine: &FollowUpEngine<MemoryStore, FixedClock>, path: &Path) -> Result<()> {
    snapshot::save_snapshot(path, &engine.store().snapshot().await)?;
    println!("Saved {}", path.display());
    Ok(())
}

fn print_run(run: &SuggestRun) {
    println!(
        "# Suggestions for {} at {}\n",
        run.user_id,
        run.now.format("%Y-%m-%d %H:%M UTC")
    );
    for e in &run.errors {
        println!("! {e}");
    }
    if run.suggestions.is_empty() {
        println!("(nothing to follow up)");
    }
    for s in &run.suggestions {
        println!(
            "- [{}] {} | {} | due {}",
            s.priority.as_str(),
            s.reminder_type.as_str(),
            s.title,
            s.due_date.format("%Y-%m-%d")
        );
    }
    println!(
        "\nsuppressed={} truncated={} invalid={}",
        run.suppressed, run.truncated, run.invalid
    );
}

fn print_materialized(report: &MaterializeReport) {
    println!("{}", report.summary());
    for r in &report.created {
        println!("+ {} [{}] {}", r.id, r.priority.as_str(), r.title);
    }
    for s in &report.suppressed {
        println!("= {} (already covered by a recent reminder)", s.title);
    }
    for f in &report.failures {
        println!("! {f}");
    }
}
