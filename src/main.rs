mod cli;

use viddur::config::{self, RunConfig};
use viddur::report::{LineSink, Renderer, StdoutSink};
use viddur::scanner::{enumerate, Scanner};
use viddur::ViddurError;
use viddur_av::{DurationProber, FfprobeDuration, FFPROBE};

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use std::process::ExitCode;
use std::sync::Arc;

/// Default log filter when RUST_LOG is not set. Logs go to stderr so stdout
/// only ever carries the report.
const DEFAULT_LOG_FILTER: &str = "viddur=warn,viddur_av=warn";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("viddur: {e:#}");
            let code = e
                .downcast_ref::<ViddurError>()
                .map_or(viddur::error::EXIT_FAILURE, ViddurError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let file_config = config::load_config_or_default(cli.config.as_deref())
        .map_err(|e| ViddurError::config(format!("{e:#}")))?;
    let config = Arc::new(cli.into_run_config(file_config)?);
    tracing::debug!("Run config: {:?}", config);

    let prober = FfprobeDuration::discover(config.ffprobe_path.as_deref())
        .map_err(|_| ViddurError::DependencyMissing {
            tool: FFPROBE.to_string(),
        })?
        .with_timeout(config.probe_timeout);

    let candidates = enumerate(&config.paths, config.recursive)?;
    tracing::debug!("{} candidate files", candidates.len());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let sink: Arc<dyn LineSink> = Arc::new(StdoutSink);
    let renderer = Renderer::from_config(&config);
    let scanner = Arc::new(Scanner::new(
        Arc::clone(&config),
        Arc::new(prober) as Arc<dyn DurationProber>,
        Arc::clone(&sink),
    ));

    let summary = runtime.block_on(async {
        tokio::select! {
            summary = scanner.run(candidates) => Ok(summary),
            _ = interrupted() => Err(ViddurError::Interrupted),
        }
    })?;

    if summary.files == 0 {
        tracing::warn!("No files found in {:?}", display_roots(&config));
    }

    sink.emit(&renderer.total_line(summary.total, config.is_quiet()));

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(viddur::error::EXIT_FAILURE)
    })
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}

fn display_roots(config: &RunConfig) -> Vec<String> {
    if config.paths.is_empty() {
        return vec![".".to_string()];
    }
    config
        .paths
        .iter()
        .map(|p| p.display().to_string())
        .collect()
}
