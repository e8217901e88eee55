//! SAFAR CLI - fleet dashboard for trip broadcasting
//!
//! Manage drivers and trips, and send trip requests to drivers over
//! WhatsApp one at a time.

use anyhow::Result;
use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod dispatch;
mod output;

use commands::{Cli, Commands};

const DEFAULT_FILTER: &str = "safar=info,safar_web=debug,safar_core=info";

/// Directory and file name for the log appender. A bare file name lands in
/// the working directory; the directory is created if missing.
fn log_target(path: &Path) -> std::io::Result<(PathBuf, OsString)> {
    let name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("log path has no file name: {}", path.display()),
        )
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    Ok((dir.to_path_buf(), name.to_os_string()))
}

/// Initialize tracing, optionally also writing to `log_file`.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(log_file: Option<&Path>, verbose: bool) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            "safar=debug,safar_web=debug,safar_core=debug,safar_db=debug".into()
        } else {
            DEFAULT_FILTER.into()
        }
    });

    let file_target = match log_file.map(log_target) {
        Some(Ok(target)) => Some(target),
        Some(Err(e)) => {
            eprintln!("warning: file logging disabled: {}", e);
            None
        }
        None => None,
    };

    match file_target {
        Some((dir, name)) => {
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            // Log to both stdout and file when --log is used
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_dir = cli.project_dir()?;

    let log_file = match &cli.command {
        Commands::Serve(args) if args.log => Some(
            args.log_file
                .clone()
                .unwrap_or_else(|| safar_core::config::state_dir(&project_dir).join("serve.log")),
        ),
        _ => None,
    };

    let _guard = init_tracing(log_file.as_deref(), cli.verbose);

    cli.execute(&project_dir).await
}
