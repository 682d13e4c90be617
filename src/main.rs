use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use photo_channel_export::{run_operation, AppConfig, Notification, Operation, Outcome, PathConfig};
use std::env;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

const SOURCE_ENV: &str = "PHOTOS_PATH";
const CUT_ENV: &str = "CUT_PATH";

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let log_level = matches
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| "info".to_string());
    initialize_logging(&log_level)?;

    load_environment_variables();

    let config = create_app_config(&matches, log_level)?;

    let outcome = run_application(config.clone()).await?;
    report_outcome(&outcome, config.json_output)?;

    match outcome.notification {
        Notification::Success(_) => Ok(()),
        Notification::Warning(_) => std::process::exit(2),
        Notification::Error(_) => std::process::exit(1),
    }
}

fn build_cli() -> Command {
    Command::new("Photo Channel Export")
        .version("0.1")
        .about("Splits numbered item folders into Allegro and Vinted exports and packs them")
        .subcommand_required(true)
        .arg(
            Arg::new("source")
                .long("source")
                .value_name("DIR")
                .global(true)
                .help(format!("Folder with the item photos (default: ${})", SOURCE_ENV)),
        )
        .arg(
            Arg::new("cut")
                .long("cut")
                .value_name("DIR")
                .global(true)
                .help(format!("Folder with the cut-out photos (default: ${})", CUT_ENV)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .global(true)
                .help("Set the log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .help("Print the outcome as JSON")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("reorganize")
                .about("Copy Z (<N>) folders into Allegro and Vinted, then remove them"),
        )
        .subcommand(Command::new("pack").about("Pack Allegro and Vinted into Zdjęcia.zip"))
}

/// Build the configuration from CLI arguments, falling back to the environment for paths
fn create_app_config(matches: &ArgMatches, log_level: String) -> Result<AppConfig> {
    let operation = match matches.subcommand_name() {
        Some("reorganize") => Operation::Reorganize,
        Some("pack") => Operation::Pack,
        other => anyhow::bail!("Unknown command: {:?}", other),
    };

    let source = path_argument(matches, "source", SOURCE_ENV);
    let cut = path_argument(matches, "cut", CUT_ENV);

    Ok(AppConfig {
        operation,
        paths: PathConfig::from_optional(source.as_deref(), cut.as_deref()),
        log_level,
        json_output: matches.get_flag("json"),
    })
}

fn path_argument(matches: &ArgMatches, name: &str, env_var: &str) -> Option<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .or_else(|| env::var(env_var).ok())
}

/// Initialize structured logging with tracing
fn initialize_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

/// Load a `.env` file if there is one; path variables stay optional
fn load_environment_variables() {
    if dotenvy::dotenv().is_err() {
        info!("No .env file found, using system environment variables");
    }

    for var in [SOURCE_ENV, CUT_ENV] {
        match env::var(var) {
            Ok(value) if !value.is_empty() => info!("Environment variable {} is set", var),
            _ => tracing::debug!("Environment variable {} is not set", var),
        }
    }
}

/// Run the selected operation on the blocking pool and wait for it
async fn run_application(config: AppConfig) -> Result<Outcome> {
    info!("Starting {:?}", config.operation);
    info!("Configuration: {:#?}", config);

    let AppConfig {
        operation, paths, ..
    } = config;

    tokio::task::spawn_blocking(move || run_operation(operation, &paths))
        .await
        .context("Operation task failed")
}

fn report_outcome(outcome: &Outcome, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match &outcome.notification {
        Notification::Success(message) => info!("{}", message),
        Notification::Warning(message) => warn!("{}", message),
        Notification::Error(message) => error!("{}", message),
    }
    Ok(())
}
