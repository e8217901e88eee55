//! Owner profile commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Input;
use safar_core::notifier::WebNotifier;
use std::path::Path;

use super::open_account;
use crate::output;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the owner profile
    Show,

    /// Edit name and phone
    Edit(EditProfileArgs),
}

#[derive(Args)]
pub struct EditProfileArgs {
    /// New full name (prompted when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// New phone number (prompted when omitted)
    #[arg(long)]
    pub phone: Option<String>,
}

pub async fn execute(cmd: ProfileCommands, project_dir: &Path) -> Result<()> {
    let (pool, owner, _config) = open_account(project_dir)?;

    match cmd {
        ProfileCommands::Show => output::print_owner(&owner),

        ProfileCommands::Edit(args) => {
            let prompt = args.name.is_none() && args.phone.is_none();
            let name = match args.name {
                Some(n) => n,
                None if prompt => Input::new()
                    .with_prompt("Full name")
                    .default(owner.full_name.clone())
                    .interact_text()
                    .context("Failed to read name")?,
                None => owner.full_name.clone(),
            };
            let phone = match args.phone {
                Some(p) => p,
                None if prompt => Input::new()
                    .with_prompt("Phone number")
                    .default(owner.phone.clone())
                    .interact_text()
                    .context("Failed to read phone")?,
                None => owner.phone.clone(),
            };

            let updated = safar_core::owner::update_profile(&pool, &owner.id, &name, &phone)?;
            WebNotifier::new().profile_updated().await;

            println!("{} Profile updated", "✓".green().bold());
            output::print_owner(&updated);
        }
    }

    Ok(())
}
