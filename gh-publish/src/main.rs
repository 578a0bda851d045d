use clap::Parser;
use gh_publish::cli::{run, Cli};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // Logs go to stderr so they never interleave with progress lines on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    tokio::select! {
        result = run(cli) => match result {
            Ok(()) => {
                tracing::info!("CLI completed successfully");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "CLI exited with error");
                eprintln!("\n❌ {e:#}");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted by user");
            println!("\n⛔ Cancelled by user");
            ExitCode::FAILURE
        }
    }
}
