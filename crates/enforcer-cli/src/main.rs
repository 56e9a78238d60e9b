//! Enforcer CLI
//!
//! Offline evaluation of idle-workload enforcement policies: validate a
//! policy, evaluate one workload, or plan a run over many.

mod input;
mod output;

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use enforcer_core::{plan, CostSample, Engine, TracingReporter};
use output::OutputFormat;

/// Idle-workload enforcement CLI
#[derive(Parser)]
#[command(name = "enforcer")]
#[command(author, version, about = "Evaluate idle-workload enforcement policies", long_about = None)]
pub struct Cli {
    /// Output format (can also be set via ENFORCER_FORMAT env var)
    #[arg(long, short, global = true, env = "ENFORCER_FORMAT", default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate a policy file
    Validate {
        /// Policy file (YAML, or JSON with a .json extension)
        #[arg(env = "ENFORCER_POLICY")]
        policy: PathBuf,
    },

    /// Evaluate one workload against a policy
    Evaluate {
        /// Policy file
        #[arg(long, short, env = "ENFORCER_POLICY")]
        policy: PathBuf,

        /// Workload snapshot file
        #[arg(long, short)]
        workload: PathBuf,

        /// Current hourly cost of the workload
        #[arg(long)]
        hourly_cost: f64,

        /// Evaluation instant in RFC 3339 (defaults to now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },

    /// Evaluate a list of workloads and apply maxActionsPerRun
    Plan {
        /// Policy file
        #[arg(long, short, env = "ENFORCER_POLICY")]
        policy: PathBuf,

        /// List of { workload, hourlyCost } entries
        #[arg(long)]
        workloads: PathBuf,

        /// Evaluation instant in RFC 3339 (defaults to now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { policy } => validate(&policy, cli.format),
        Commands::Evaluate {
            policy,
            workload,
            hourly_cost,
            now,
        } => evaluate(&policy, &workload, hourly_cost, now, cli.format),
        Commands::Plan {
            policy,
            workloads,
            now,
        } => plan_run(&policy, &workloads, now, cli.format),
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn engine() -> Engine {
    Engine::with_reporter(std::sync::Arc::new(TracingReporter))
}

fn validate(path: &Path, format: OutputFormat) -> Result<()> {
    let policy = input::load_policy(path)?;
    info!(policy = %policy.name(), "policy is valid");

    match format {
        OutputFormat::Json => println!("{}", output::to_json(&policy)?),
        OutputFormat::Text => print!("{}", output::policy_summary(&policy)),
    }
    Ok(())
}

fn evaluate(
    policy_path: &Path,
    workload_path: &Path,
    hourly_cost: f64,
    now: Option<DateTime<Utc>>,
    format: OutputFormat,
) -> Result<()> {
    let policy = input::load_policy(policy_path)?;
    let workload = input::load_workload(workload_path)?;
    let now = now.unwrap_or_else(Utc::now);

    let result = engine().evaluate_at(&policy, &workload, &CostSample::hourly(hourly_cost), now);

    match format {
        OutputFormat::Json => println!("{}", output::to_json(&result)?),
        OutputFormat::Text => print!("{}", output::result_text(&result)),
    }
    Ok(())
}

fn plan_run(
    policy_path: &Path,
    workloads_path: &Path,
    now: Option<DateTime<Utc>>,
    format: OutputFormat,
) -> Result<()> {
    let policy = input::load_policy(policy_path)?;
    let candidates = input::load_candidates(workloads_path)?;
    let now = now.unwrap_or_else(Utc::now);

    let plan = plan(&engine(), &policy, &candidates, now);

    match format {
        OutputFormat::Json => println!("{}", output::to_json(&plan)?),
        OutputFormat::Text => print!("{}", output::plan_text(&plan)),
    }
    Ok(())
}
