use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dirserve::client::{self, ClientError, DOWNLOAD_DIR};

/// Fetch one path from the server and print or save the result.
#[derive(Debug, Parser)]
#[command(name = "client", version)]
struct Cli {
    host: String,
    port: u16,
    /// Path or file name to request
    path: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let failed = e.use_stderr();
            let _ = e.print();
            return if failed { ExitCode::from(1) } else { ExitCode::SUCCESS };
        }
    };

    let request_path = client::normalize_path(&cli.path);

    let raw = match client::fetch(&cli.host, cli.port, &request_path).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!("Request failed: {}", e);
            return ExitCode::from(1);
        }
    };

    let response = match client::parse_response(&raw) {
        Ok(response) => response,
        Err(ClientError::MalformedResponse) => {
            println!("Malformed HTTP response: no header/body separator");
            return ExitCode::from(2);
        }
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(1);
        }
    };

    println!("{}", response.status_line);

    let content_type = response.content_type();
    if !response.is_ok() || content_type.starts_with("text/html") {
        println!("{}", String::from_utf8_lossy(&response.body));
        return ExitCode::SUCCESS;
    }

    match client::save_file(Path::new(DOWNLOAD_DIR), &request_path, &response.body) {
        Ok(out) if content_type.starts_with("image/png")
            || content_type.starts_with("application/pdf") =>
        {
            println!("Saved to {}", out.display());
        }
        Ok(out) => println!("Saved (type: {}) to {}", content_type, out.display()),
        Err(e) => {
            tracing::error!("Could not save {}: {}", request_path, e);
            return ExitCode::from(1);
        }
    }

    ExitCode::SUCCESS
}
