use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;
use idlecheck_core::{
    collect, EventSink, IdleSchedule, Neo4jConnector, Preset, RunConfig, RunError,
    ScheduleRunner, Tone,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod prompt;
mod run_log;

use prompt::TerminalPrompt;
use run_log::RunLog;

const ABORTED: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "idlecheck")]
#[command(about = "Finds how long an idle Neo4j connection stays usable (troubleshooting only)")]
struct Cli {
    /// Connection URI as shown in the Aura console; prompted for when omitted.
    #[arg(long)]
    uri: Option<String>,

    /// Username; prompted for when omitted.
    #[arg(long)]
    user: Option<String>,

    #[arg(long, default_value = "neo4j")]
    database: String,

    /// Comma-separated idle durations in seconds, strictly ascending.
    #[arg(long)]
    schedule: Option<IdleSchedule>,

    #[arg(long, default_value_t = 10)]
    margin_secs: u64,

    #[arg(long, default_value = ".")]
    log_dir: PathBuf,

    #[arg(long, value_enum, default_value = "human")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = RunConfig {
        schedule: cli.schedule.clone().unwrap_or_default(),
        margin_secs: cli.margin_secs,
        database: cli.database.clone(),
        ..RunConfig::default()
    };

    let mut log = RunLog::open(&cli.log_dir)?;
    announce(&mut log, &config);

    if cli.uri.is_none() {
        print_uri_hint();
    }
    let preset = Preset {
        uri: cli.uri.clone(),
        user: cli.user.clone(),
    };
    let params = collect(&mut TerminalPrompt::new(), preset, &mut log)?;

    log.blank();
    log.log(
        Tone::Highlight,
        &format!("Attempting to connect to {}", params.uri),
        true,
    );
    log.blank();

    let runner = ScheduleRunner::new(Neo4jConnector::new(), config);
    match runner.run(&params, &mut log).await {
        Ok(summary) => {
            if let OutputFormat::Json = cli.format {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let RunError::Aborted {
                idle_secs,
                best_idle_secs,
                ..
            } = &err;
            error!(idle_secs, best_idle_secs, error = %err, "run aborted");
            if let OutputFormat::Json = cli.format {
                let out = serde_json::json!({
                    "aborted_at_idle_secs": idle_secs,
                    "best_idle_secs": best_idle_secs,
                    "error": err.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Ok(ExitCode::from(ABORTED))
        }
    }
}

fn announce(log: &mut RunLog, config: &RunConfig) {
    log.blank();
    log.log(
        Tone::Highlight,
        "Troubleshooting only: connects with neo4j+ssc (encrypted, certificate not verified) and a single-connection pool.",
        true,
    );
    log.success(&format!(
        "This run will check if connections idle after the following lifetime values are still usable(seconds):\n                 {}",
        config.schedule
    ));
    log.log(
        Tone::Neutral,
        &format!("Logging to {}", log.current_path().display()),
        true,
    );
}

fn print_uri_hint() {
    println!(
        "\nIf you see a {},for the instance in the Aura Console, please enter that as Public Traffic has likely been disabled for your instance.",
        "'Private URI'".yellow()
    );
    println!(
        "\n{}\nneo4j+s://a1b2c3d4.databases.neo4j.io\nneo4j+s://a1b2c3d4.production-orch-0001.neo4j.io\n",
        "Examples for expected connection URI:".yellow()
    );
}
