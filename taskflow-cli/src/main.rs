use anyhow::{Context, Result, bail};
use chrono::DateTime;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use taskflow_core::time::{now_in_zone, parse_reference_time, parse_zone};
use taskflow_core::{
    DailyScheduler, SchedulableTask, ScheduleOutput, SchedulerConfig, TaskParser,
    pending_by_due_date,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::{Config, init_config, load_config};

#[derive(Parser, Debug)]
#[command(
    name = "taskflow",
    version,
    about = "Turn free-text tasks into structured records and a daily plan"
)]
struct Cli {
    /// Config file (default: $TASKFLOW_HOME/config.toml, else ~/.taskflow/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse raw task texts and print the structured tasks as JSON
    Parse {
        /// Task texts. Ignored when --file is given.
        texts: Vec<String>,

        /// JSON array of raw entries ("-" reads stdin)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Reference time instead of the configured clock
        #[arg(long)]
        now: Option<String>,
    },

    /// Build a per-day schedule from a JSON array of stored tasks
    Schedule {
        /// JSON array of tasks ("-" reads stdin)
        #[arg(long)]
        tasks: PathBuf,

        /// Override scheduler.max_hours_per_day
        #[arg(long)]
        max_hours: Option<f64>,

        /// Reference time instead of the configured clock
        #[arg(long)]
        now: Option<String>,
    },

    /// Write the default config file if it does not exist
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;
    init_tracing(&cfg);

    match cli.command {
        Command::Parse { texts, file, now } => {
            let now = resolve_now(now.as_deref(), &cfg)?;
            let raw = match file {
                Some(path) => read_json_array(&path)?,
                None => texts.into_iter().map(Value::String).collect(),
            };
            if raw.is_empty() {
                bail!("no tasks given (pass TEXT arguments or --file <path>)");
            }

            let parser = TaskParser::new().context("compile task patterns")?;
            let tasks = parser.process_tasks(&raw, now.naive_local());
            info!(received = raw.len(), parsed = tasks.len(), "parsed tasks");
            print_json(&tasks)?;
        }

        Command::Schedule {
            tasks,
            max_hours,
            now,
        } => {
            let now = resolve_now(now.as_deref(), &cfg)?;
            let mut scheduler_cfg = cfg.scheduler;
            if let Some(h) = max_hours {
                scheduler_cfg.max_hours_per_day = h;
            }

            let records: Vec<SchedulableTask> =
                serde_json::from_value(Value::Array(read_json_array(&tasks)?))
                    .with_context(|| format!("decode tasks from {}", tasks.display()))?;

            print_json(&build_schedule(records, scheduler_cfg, now)?)?;
        }

        Command::InitConfig => {
            let (path, created) = init_config(cli.config.as_deref())?;
            if created {
                println!("Wrote {}", path.display());
            } else {
                println!("Config already exists: {}", path.display());
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_now(explicit: Option<&str>, cfg: &Config) -> Result<DateTime<Tz>> {
    let zone = parse_zone(&cfg.clock.timezone).context("clock.timezone")?;
    match explicit {
        Some(raw) => parse_reference_time(raw, zone).with_context(|| {
            format!("unrecognized --now value '{raw}' (use YYYY-MM-DD[THH:MM[:SS]] or RFC 3339)")
        }),
        None => Ok(now_in_zone(zone)),
    }
}

fn build_schedule(
    records: Vec<SchedulableTask>,
    scheduler_cfg: SchedulerConfig,
    now: DateTime<Tz>,
) -> Result<ScheduleOutput> {
    scheduler_cfg.validate().context("scheduler settings")?;
    let pending = pending_by_due_date(records).context("select pending tasks")?;
    let scheduler = DailyScheduler::new(scheduler_cfg);
    debug!(config = ?scheduler.config(), pending = pending.len(), "scheduling");

    // Store due dates resolve to UTC.
    scheduler
        .schedule(&pending, now.naive_utc())
        .context("build schedule")
}

fn read_json_array(path: &Path) -> Result<Vec<Value>> {
    let s = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };

    let value: Value = serde_json::from_str(&s)
        .with_context(|| format!("parse JSON from {}", path.display()))?;
    match value {
        Value::Array(items) => Ok(items),
        other => bail!(
            "expected a JSON array in {}, got {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
