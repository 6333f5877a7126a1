use clap::Parser;
use log_watcher::config::Args;
use log_watcher::{ChangeResult, LogWatcher, emit};
use std::process::ExitCode;
use std::time::Duration;
use tokio_stream::StreamExt;

/// How long each follow-mode round waits before re-checking the log.
const FOLLOW_IDLE: Duration = Duration::from_secs(1);

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let args = Args::parse();

    // The watcher lives inside `run`, so it is released before we exit.
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), String> {
    let path = args
        .log_path()
        .map_err(|e| format!("Failed to open system log: {}", e))?;

    let mut watcher =
        LogWatcher::open(&path).map_err(|e| format!("Failed to open system log: {}", e))?;

    watcher
        .seek_to_end()
        .map_err(|e| format!("Failed to seek to end of log: {}", e))?;

    emit::emit(args.emit, &path, &args.message).map_err(|e| e.to_string())?;

    tokio::time::sleep(args.settle()).await;

    let first = match args.timeout() {
        Some(timeout) => watcher.wait(timeout).await,
        None => watcher.poll(),
    };
    let change = first.map_err(|e| format!("Failed to process log events: {}", e))?;
    println!("{}", change);

    if !args.follow {
        return Ok(());
    }

    if change == ChangeResult::Invalidated {
        watcher
            .seek_to_end()
            .map_err(|e| format!("Failed to seek to end of log: {}", e))?;
    }

    tracing::info!(path = %path.display(), "following log changes");
    let mut changes = watcher.changes(FOLLOW_IDLE);
    while let Some(change) = changes.next().await {
        let change = change.map_err(|e| format!("Failed to process log events: {}", e))?;
        println!("{}", change);
    }

    Ok(())
}
