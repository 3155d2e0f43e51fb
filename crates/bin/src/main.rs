use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use plotacl::{Backend, Registry, backend::database::FileStore, commands};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

mod cli;

use cli::Cli;

const PROMPT: &str = "plotacl> ";
const DEFAULT_LOG_FILTER: &str = "plotacl=warn";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so that command output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let store = Arc::new(FileStore::open(&args.data_file).await?);
    tracing::info!("Using configuration store at {}", store.path().display());

    let mut backend = Backend::new(store);
    if let Some(prefix) = args.key_prefix() {
        backend = backend.with_namespace(prefix);
        println!("Using configuration '{prefix}'");
    }
    if let Some(timeout) = args.timeout() {
        backend = backend.with_timeout(timeout);
    }
    let registry = Registry::new(backend);

    if !args.command.is_empty() {
        let line = Zeroizing::new(args.command.join(" "));
        commands::dispatch(&registry, &line, &mut std::io::stdout()).await?;
        return Ok(());
    }

    repl(&registry).await
}

/// Read commands from stdin until end of input, `exit` or `close`.
///
/// Every command reads and writes the data file through the store, so other
/// sessions see its changes immediately.
async fn repl(registry: &Registry) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    loop {
        write!(stdout, "{PROMPT}")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = Zeroizing::new(line);

        let mut tokens = line.split_whitespace();
        if let Some(name @ ("exit" | "close")) = tokens.next() {
            if tokens.next().is_none() {
                return Ok(());
            }
            writeln!(stdout, "{}", quit_usage(name))?;
            continue;
        }

        commands::dispatch(registry, &line, &mut stdout).await?;
    }

    writeln!(stdout)?;
    Ok(())
}

/// `RUST_LOG` directives when set and valid, otherwise the default level.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn quit_usage(name: &str) -> String {
    format!("Usage: {name}")
}
