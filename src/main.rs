//! Historian Compression CLI
//!
//! Command-line interface for compressing historian CSV exports:
//! - Compress a tag's readings with deadband or swinging door
//! - Compare both algorithms on the same data
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use historian_compression::config::{generate_default_config, Config, LoggingConfig};
use historian_compression::io::{write_csv, write_json, CsvPointReader, ImportResult};
use historian_compression::{Algorithm, CompressionConfig, Point, Session};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "historian-compress")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deadband and swinging door compression of historian data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a CSV file of readings
    Compress {
        #[command(flatten)]
        input: InputArgs,

        /// Algorithm (deadband, swinging_door)
        #[arg(short, long)]
        algorithm: Option<Algorithm>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Compare both algorithms on a CSV file
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct InputArgs {
    /// Path to CSV file
    pub path: PathBuf,

    /// Maximum allowed deviation
    #[arg(short, long)]
    pub deviation: Option<f64>,

    /// Maximum gap between archived points, in input time units
    #[arg(short = 'i', long)]
    pub max_interval: Option<f64>,

    /// Timestamp column (0-indexed)
    #[arg(long)]
    pub time_column: Option<usize>,

    /// Value column (0-indexed)
    #[arg(long)]
    pub value_column: Option<usize>,

    /// Timestamp format (strftime format)
    #[arg(long)]
    pub time_format: Option<String>,

    /// The file has no header row
    #[arg(long)]
    pub no_header: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(Config::default_path);
    let mut config = Config::load_or_env(config_path.as_deref())?;

    init_logging(&config.logging);

    match &config_path {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }

    match cli.command {
        Commands::Compress {
            input,
            algorithm,
            output,
            format,
        } => {
            if let Some(algorithm) = algorithm {
                config.compression.algorithm = algorithm;
            }
            input.apply(&mut config);

            let imported = import(&input.path, &config)?;
            let algorithm = config.compression.algorithm;
            let (archived, session) =
                run_session(algorithm, config.compression.engine_config(), &imported.points)?;

            tracing::info!("{}: {}", algorithm, session.stats());

            let writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path).with_context(|| format!("creating {:?}", path))?,
                )),
                None => Box::new(std::io::stdout().lock()),
            };

            match format {
                OutputFormat::Csv => write_csv(&archived, imported.time_kind, writer)?,
                OutputFormat::Json => write_json(&archived, writer)?,
            }

            if let Some(path) = output {
                tracing::info!("Wrote {} archived points to {:?}", archived.len(), path);
            }
        }

        Commands::Stats { input } => {
            input.apply(&mut config);
            let imported = import(&input.path, &config)?;
            let engine = config.compression.engine_config();

            println!(
                "deviation = {}, max_interval = {}",
                engine.deviation,
                engine
                    .max_interval
                    .map(|i| i.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!();
            println!(
                "{:<15} {:>10} {:>10} {:>8} {:>8}",
                "Algorithm", "Input", "Archived", "Forced", "Ratio"
            );
            println!("{}", "-".repeat(55));

            for algorithm in Algorithm::all() {
                let (_, session) = run_session(*algorithm, engine, &imported.points)?;
                let stats = session.stats();
                println!(
                    "{:<15} {:>10} {:>10} {:>8} {:>7.1}x",
                    algorithm.to_string(),
                    stats.input_points,
                    stats.archived_points,
                    stats.forced_points,
                    stats.ratio()
                );
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }
    }

    Ok(())
}

impl InputArgs {
    /// Command-line flags take precedence over file and environment settings
    fn apply(&self, config: &mut Config) {
        if let Some(deviation) = self.deviation {
            config.compression.deviation = deviation;
        }
        if let Some(interval) = self.max_interval {
            config.compression.max_interval = Some(interval);
        }
        if let Some(column) = self.time_column {
            config.input.time_column = column;
        }
        if let Some(column) = self.value_column {
            config.input.value_column = column;
        }
        if let Some(format) = &self.time_format {
            config.input.time_format = format.clone();
        }
        if self.no_header {
            config.input.has_header = false;
        }
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("historian_compression={}", logging.level))
    });

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so archived points can be piped from stdout
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn import(path: &Path, config: &Config) -> anyhow::Result<ImportResult> {
    if !path.exists() {
        bail!("File not found: {:?}", path);
    }

    let result = CsvPointReader::from_config(&config.input)
        .read(path)
        .with_context(|| format!("reading {:?}", path))?;

    tracing::info!(
        "Read {} points from {:?} ({} rows failed)",
        result.points.len(),
        path,
        result.rows_failed
    );
    for error in result.errors.iter().take(10) {
        tracing::warn!("{}", error);
    }

    Ok(result)
}

fn run_session(
    algorithm: Algorithm,
    config: CompressionConfig,
    points: &[Point],
) -> anyhow::Result<(Vec<Point>, Session)> {
    let mut iter = Session::new(algorithm, config)?.compress_iter(points.iter().copied());
    let archived = iter
        .by_ref()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("compressing with {}", algorithm))?;
    Ok((archived, iter.into_session()))
}
