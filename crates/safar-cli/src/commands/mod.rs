//! CLI command definitions and handlers.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use safar_core::owner::model::Owner;
use safar_core::SafarConfig;
use safar_db::DbPool;
use std::path::{Path, PathBuf};

pub mod driver;
pub mod init;
pub mod profile;
pub mod serve;
pub mod stats;
pub mod trip;

/// SAFAR - Fleet dashboard and trip broadcasting
#[derive(Parser)]
#[command(name = "safar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the owner account and local database
    Init(init::InitArgs),

    /// Show or edit the owner profile
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// Manage drivers
    #[command(subcommand)]
    Driver(driver::DriverCommands),

    /// Manage trips and broadcast them to drivers
    #[command(subcommand)]
    Trip(trip::TripCommands),

    /// Dashboard statistics
    Stats,

    /// Start the web dashboard
    Serve(serve::ServeArgs),
}

impl Cli {
    pub fn project_dir(&self) -> Result<PathBuf> {
        match &self.project {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    pub async fn execute(self, project_dir: &Path) -> Result<()> {
        match self.command {
            Commands::Init(args) => init::execute(args, project_dir).await,
            Commands::Profile(cmd) => profile::execute(cmd, project_dir).await,
            Commands::Driver(cmd) => driver::execute(cmd, project_dir).await,
            Commands::Trip(cmd) => trip::execute(cmd, project_dir).await,
            Commands::Stats => stats::execute(project_dir).await,
            Commands::Serve(args) => serve::execute(args, project_dir).await,
        }
    }
}

/// Open the project database, refusing to create one outside `safar init`.
pub fn open_db(project_dir: &Path) -> Result<DbPool> {
    let db_path = safar_core::config::db_path(project_dir);
    if !db_path.exists() {
        bail!("No SAFAR project here. Run 'safar init' first.");
    }
    Ok(safar_db::init_pool(&db_path)?)
}

/// Database, owner and config for commands that act on an account.
pub fn open_account(project_dir: &Path) -> Result<(DbPool, Owner, SafarConfig)> {
    let pool = open_db(project_dir)?;
    let owner = safar_core::owner::require_default_owner(&pool)?;
    let config = SafarConfig::load(project_dir)?;
    Ok((pool, owner, config))
}

/// Find an item by full id or unique id prefix (as shown in tables).
pub fn resolve<'a, T>(
    items: &'a [T],
    needle: &str,
    id_of: impl Fn(&T) -> &str,
    kind: &str,
) -> Result<&'a T> {
    if let Some(exact) = items.iter().find(|item| id_of(*item) == needle) {
        return Ok(exact);
    }

    let mut matches = items.iter().filter(|item| id_of(*item).starts_with(needle));
    match (matches.next(), matches.next()) {
        (Some(item), None) if !needle.is_empty() => Ok(item),
        (Some(_), Some(_)) => bail!("Ambiguous {} id '{}', use more characters", kind, needle),
        _ => bail!("{} not found: {}", capitalize(kind), needle),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &String) -> &str {
        s.as_str()
    }

    #[test]
    fn test_resolve_by_prefix() {
        let ids = vec!["abc123".to_string(), "abd456".to_string()];
        assert_eq!(resolve(&ids, "abc", id, "driver").unwrap(), "abc123");
        assert_eq!(resolve(&ids, "abd456", id, "driver").unwrap(), "abd456");

        let err = resolve(&ids, "ab", id, "driver").unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));

        let err = resolve(&ids, "zz", id, "driver").unwrap_err();
        assert_eq!(err.to_string(), "Driver not found: zz");
        assert!(resolve(&ids, "", id, "driver").is_err());
    }

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from([
            "safar", "--project", "/tmp/fleet", "trip", "new", "--from", "Airport", "--to",
            "Downtown",
        ])
        .unwrap();
        assert_eq!(cli.project, Some(PathBuf::from("/tmp/fleet")));
        assert!(matches!(cli.command, Commands::Trip(trip::TripCommands::New(_))));

        let cli = Cli::try_parse_from(["safar", "serve", "--port", "8080", "--log"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.log);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_open_db_requires_init() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_db(dir.path()).is_err());
    }
}
