//! newsdesk - Main Entry Point
//!
//! Loads a pipeline configuration, runs the producer → dispatcher →
//! co-editor → screen manager pipeline to completion and prints the screen
//! output on stdout. Logs go to stderr.

use clap::Parser;
use newsdesk::config::PipelineConfig;
use newsdesk::pipeline::{PipelineBuilder, StdoutSink};
use newsdesk::ResultExt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Run the bounded-buffer news pipeline.
#[derive(Parser, Debug)]
#[command(name = "newsdesk", version, about)]
struct Cli {
    /// Pipeline configuration: a text descriptor, or TOML when the extension is .toml
    config: PathBuf,

    /// Base seed for producer category choice (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Co-editor delay per article, in milliseconds
    #[arg(long, value_name = "MS")]
    edit_delay_ms: Option<u64>,

    /// Log filter, e.g. "info" or "newsdesk=debug" (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

/// Logs go to stderr through a non-blocking writer so stdout stays clean.
fn init_logging(filter: Option<&str>) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    guard
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = PipelineConfig::load(&cli.config)?;

    let mut builder = PipelineBuilder::new(config);
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    if let Some(ms) = cli.edit_delay_ms {
        builder = builder.edit_delay(Duration::from_millis(ms));
    }

    let pipeline = builder.build().context("Failed to allocate pipeline buffers")?;
    let report = pipeline.run(StdoutSink).context("Pipeline failed")?;
    if report.dispatch.dropped > 0 || report.screen.write_errors > 0 || !report.is_conserved() {
        tracing::warn!(
            "Run finished with losses: produced {}, dropped {}, displayed {}, write errors {}",
            report.produced_total(),
            report.dispatch.dropped,
            report.displayed(),
            report.screen.write_errors
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_level.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
