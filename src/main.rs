use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use enrollment_mart::{load_step, run_pipeline, transform_step, InputSource};
use mart_core::config::Config;
use mart_loader::ClickHouseInserter;

#[derive(Parser)]
#[command(name = "mart-etl", about = "Course-enrollment log ETL: normalize, then load into ClickHouse")]
struct Cli {
    /// TOML config file (defaults to ./mart.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level to stderr (RUST_LOG still takes precedence).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse the raw log and write the star-schema CSV tables.
    Transform(TransformArgs),
    /// Bulk-load previously written tables into ClickHouse.
    Load(LoadArgs),
    /// Transform, then load. Load is skipped if transform fails.
    Run(TransformArgs),
}

#[derive(Args)]
struct TransformArgs {
    /// Raw log file, or `-` for stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory the tables are written to.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
struct LoadArgs {
    /// Directory holding the tables to load.
    #[arg(long)]
    input_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    let mut out = std::io::stdout();
    match cli.command {
        Command::Transform(args) => {
            let (input, output_dir) = args.resolve(&config);
            transform_step(&mut out, &input, &output_dir)?;
        }
        Command::Load(args) => {
            let input_dir = args.input_dir.unwrap_or(config.paths.processed_dir);
            let inserter = ClickHouseInserter::new(&config.clickhouse);
            load_step(&mut out, inserter, &input_dir).await?;
        }
        Command::Run(args) => {
            let (input, output_dir) = args.resolve(&config);
            let inserter = ClickHouseInserter::new(&config.clickhouse);
            run_pipeline(&mut out, &input, &output_dir, inserter).await?;
        }
    }
    Ok(())
}

impl TransformArgs {
    fn resolve(self, config: &Config) -> (InputSource, PathBuf) {
        let input = self.input.unwrap_or_else(|| config.paths.raw_log.clone());
        let output_dir = self
            .output_dir
            .unwrap_or_else(|| config.paths.processed_dir.clone());
        (InputSource::from(input), output_dir)
    }
}
