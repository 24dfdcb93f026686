//! Message Validator CLI
//!
//! Validates one JSON message, a file with one message per line, or the
//! rows of a Parquet file against the schema of a known topic.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use message_schemas::source::FileSource;
use message_schemas::{render_report, Tally, Topic, Validator, ValidatorConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "message-validator")]
#[command(about = "Validate messages against a topic schema")]
struct Cli {
    /// Name of input file
    #[arg(short, long)]
    input: PathBuf,

    /// Input file contains multiple messages, one per line
    #[arg(short, long)]
    multiple: bool,

    /// Disable color output
    #[arg(short, long)]
    no_colors: bool,

    /// Make it verbose
    #[arg(short, long)]
    verbose: bool,

    /// Message format to validate against
    #[arg(short, long, value_enum)]
    topic: Topic,

    /// Configuration file read on top of the default locations
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(tally) => std::process::exit(tally.exit_code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(config: &ValidatorConfig, verbose: bool) {
    let filter = if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(&config.logging.filter)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<Tally> {
    let config_path = cli
        .config
        .as_deref()
        .map(|p| p.to_str().context("configuration path is not valid UTF-8"))
        .transpose()?;
    let config = ValidatorConfig::load_from(config_path).context("failed to load configuration")?;
    init_logging(&config, cli.verbose);

    let schema = cli.topic.schema().with_uuid_version(config.validation.uuid_version);
    let validator = Validator::with_evaluator(schema, config.evaluator());
    info!(topic = cli.topic.name(), input = %cli.input.display(), "Validating");

    let tally = if cli.topic.is_parquet() {
        validate_parquet(&validator, &cli)?
    } else if cli.multiple {
        validator.validate_multiple_messages(&FileSource::new(&cli.input))
    } else {
        validator.validate_single_message(&FileSource::new(&cli.input))
    };

    let colors = config.report.colors && !cli.no_colors;
    render_report(&tally, colors, &mut io::stdout().lock()).context("failed to write report")?;
    Ok(tally)
}

#[cfg(feature = "parquet")]
fn validate_parquet(validator: &Validator, cli: &Cli) -> anyhow::Result<Tally> {
    use message_schemas::source::ParquetFile;

    Ok(validator.validate_rows(&ParquetFile::new(&cli.input)))
}

#[cfg(not(feature = "parquet"))]
fn validate_parquet(_validator: &Validator, cli: &Cli) -> anyhow::Result<Tally> {
    anyhow::bail!(
        "topic {} is read from Parquet files, rebuild with the `parquet` feature enabled",
        cli.topic.name()
    )
}
