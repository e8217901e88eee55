//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use safar_core::SafarConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::open_db;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to .safar/serve.log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, project_dir: &Path) -> Result<()> {
    let pool = Arc::new(open_db(project_dir)?);

    let mut config = SafarConfig::load(project_dir)?;
    if let Some(port) = args.port {
        config.web.port = port;
    }
    if let Some(host) = args.host {
        config.web.host = host;
    }
    let addr = config.web_addr();

    println!();
    println!("  {} {}", "SAFAR".cyan().bold(), "Web Dashboard".bold());
    println!();
    println!("  {}  http://{}", "Dashboard".green(), addr);
    println!("  {}       http://{}/api", "API".green(), addr);
    println!("  {}  ws://{}/ws", "WebSocket".green(), addr);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    safar_web::run_server(pool, config).await?;

    Ok(())
}
