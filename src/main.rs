use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dirserve::config::Config;
use dirserve::server::listener;

/// Serve a directory over HTTP/1.1, one connection at a time.
#[derive(Debug, Parser)]
#[command(name = "server", version)]
struct Cli {
    /// Directory to serve
    directory: PathBuf,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Optional YAML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version are not failures.
            let failed = e.use_stderr();
            let _ = e.print();
            return if failed { ExitCode::from(1) } else { ExitCode::SUCCESS };
        }
    };

    if !cli.directory.is_dir() {
        eprintln!("Error: Directory '{}' does not exist.", cli.directory.display());
        return ExitCode::from(1);
    }

    let cfg = match Config::load(cli.config.as_deref(), cli.directory, cli.port) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(1);
        }
    };

    tokio::select! {
        res = listener::run(&cfg) => {
            if let Err(e) = res {
                tracing::error!("Server stopped: {:#}", e);
                return ExitCode::from(1);
            }
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    ExitCode::SUCCESS
}
