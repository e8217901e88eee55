//! Account initialization command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::Input;
use safar_core::SafarConfig;
use std::path::Path;

#[derive(Args)]
pub struct InitArgs {
    /// Owner full name
    #[arg(long)]
    pub name: Option<String>,

    /// Owner phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Owner email
    #[arg(long)]
    pub email: Option<String>,
}

fn ask(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

pub async fn execute(args: InitArgs, project_dir: &Path) -> Result<()> {
    let state_dir = safar_core::config::state_dir(project_dir);
    let pool = safar_db::init_pool(&safar_core::config::db_path(project_dir))?;

    if let Some(owner) = safar_core::owner::get_default_owner(&pool)? {
        println!(
            "{} Already initialized for {} ({})",
            "✓".green().bold(),
            owner.full_name.cyan(),
            owner.email.dimmed()
        );
        return Ok(());
    }

    let name = ask(args.name, "Full name")?;
    let phone = ask(args.phone, "Phone number")?;
    let email = ask(args.email, "Email")?;

    let owner = safar_core::owner::create_owner(&pool, &name, &phone, &email)?;

    if !safar_core::config::config_path(project_dir).exists() {
        SafarConfig::default().save(project_dir)?;
    }

    println!();
    println!("{} Welcome, {}", "✓".green().bold(), owner.full_name.cyan());
    println!("  Data: {}", state_dir.display());
    println!();
    println!("{}", "Next steps:".bold());
    println!("  safar driver add <name> <phone>       # Add your drivers");
    println!("  safar trip new --from A --to B        # Schedule a trip");
    println!("  safar trip broadcast <trip>           # Send it to drivers");
    println!("  safar serve                           # Start web dashboard");

    Ok(())
}
