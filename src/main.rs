use anyhow::{Context, Result};
use ci_runner::cli::output::{format_summary, render_event};
use ci_runner::cli::Cli;
use ci_runner::{ConfigLocator, PipelineRunner, RunConfig, RunReport, ShellExecutor, StepRegistry};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; stdout is reserved for the step transcript
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let config = load_config(&cli)?.with_no_mods(cli.no_mods_requested());
    debug!("Resolved config: {:?}", config);

    let mut runner = PipelineRunner::new(ShellExecutor::default());
    runner.add_event_handler(|event| {
        if let Some(bytes) = render_event(event) {
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(&bytes);
            let _ = stdout.flush();
        }
    });

    let report = runner.run(&StepRegistry::standard(), &config).await;

    eprintln!("{}", format_summary(&report));

    // Exit code always reflects the run, even if the report is lost
    if let Some(path) = &cli.report {
        if let Err(e) = write_report(&report, path) {
            error!("{:#}", e);
        }
    }

    std::process::exit(report.exit_code());
}

fn load_config(cli: &Cli) -> Result<RunConfig> {
    match &cli.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Ok(ConfigLocator::default().load(&cwd)?)
        }
    }
}

fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
