use anyhow::Context;
use clap::Parser;
use iis_log_analyzer::LogProcessor;
use iis_log_analyzer::cli::Args;
use std::process;
use tracing::debug;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    setup_logging(&args);

    match run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.to_config().context("Invalid command line options")?;

    let processor = LogProcessor::new(args.input.clone(), config)
        .with_context(|| format!("Cannot analyse {}", args.input.display()))?;

    let stats = processor
        .process()
        .with_context(|| format!("Error processing {}", args.input.display()))?;

    if stats.files_processed == 0 && stats.files_failed > 0 {
        anyhow::bail!("None of the {} log files could be analysed", stats.files_failed);
    }

    Ok(())
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("iis_log_analyzer={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}
