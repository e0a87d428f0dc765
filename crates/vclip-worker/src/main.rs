//! Reframing worker binary.
//!
//! Runs one or more job manifests through the stream pool and writes the
//! per-frame decisions as JSON Lines.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vclip_models::SmoothingStrength;
use vclip_worker::{init_metrics, run_batch, ReframeJob, StreamPool, WorkerConfig};

/// Speaker-aware 9:16 reframing worker.
#[derive(Parser)]
#[command(name = "vclip-reframe-worker", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process job manifests concurrently.
    ///
    /// At most REFRAME_MAX_CONCURRENT_STREAMS jobs are in flight; the rest
    /// wait for earlier jobs to finish.
    Run {
        /// Manifest files (JSON).
        #[arg(required = true)]
        manifests: Vec<PathBuf>,

        /// Output directory for jobs without an explicit output path.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Smoothing preset for jobs that do not name one.
        #[arg(long)]
        smoothing: Option<SmoothingStrength>,

        /// Override the worker slot count.
        #[arg(long)]
        max_workers: Option<usize>,

        /// Print Prometheus metrics after the run.
        #[arg(long)]
        metrics: bool,
    },
    /// Print the manifest JSON Schema.
    Schema,
}

fn init_tracing() {
    // Colored output for dev, JSON for production. Logs go to stderr so
    // stdout stays clean for schema and metrics output.
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&ReframeJob::schema())?);
            Ok(())
        }
        Command::Run {
            manifests,
            output_dir,
            smoothing,
            max_workers,
            metrics,
        } => {
            init_tracing();

            let mut config = WorkerConfig::from_env();
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(strength) = smoothing {
                config.default_smoothing = strength;
            }
            if let Some(n) = max_workers {
                let max_concurrent_streams = config.max_concurrent_streams;
                config = config.with_limits(n, max_concurrent_streams);
            }
            info!("Worker config: {:?}", config);

            let prometheus = if metrics { Some(init_metrics()?) } else { None };

            let pool = StreamPool::new(config);
            let report = run_batch(&pool, &manifests).await;

            if let Some(handle) = prometheus {
                println!("{}", handle.render());
            }

            if report.failed > 0 {
                anyhow::bail!("{} of {} jobs failed", report.failed, manifests.len());
            }
            info!("All jobs completed");
            Ok(())
        }
    }
}
