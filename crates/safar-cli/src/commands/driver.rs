//! Driver management commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;
use safar_core::broadcast::Dispatcher;
use safar_core::driver::model::{Driver, DriverInput};
use safar_core::notifier::WebNotifier;
use std::path::Path;

use super::{open_account, resolve};
use crate::dispatch::TerminalDispatcher;
use crate::output;

#[derive(Subcommand)]
pub enum DriverCommands {
    /// Add a driver
    Add(AddDriverArgs),

    /// List drivers
    List(ListDriversArgs),

    /// Edit a driver
    Edit(EditDriverArgs),

    /// Remove a driver
    Remove(RemoveDriverArgs),

    /// Call a driver
    Call(CallDriverArgs),
}

#[derive(Args)]
pub struct AddDriverArgs {
    /// Driver name
    pub name: String,

    /// Phone number
    pub phone: String,

    /// WhatsApp number, if different from the phone
    #[arg(short, long)]
    pub whatsapp: Option<String>,
}

#[derive(Args)]
pub struct ListDriversArgs {
    /// Filter by name or phone
    #[arg(short, long)]
    pub query: Option<String>,
}

#[derive(Args)]
pub struct EditDriverArgs {
    /// Driver ID (or prefix)
    pub driver_id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(short, long)]
    pub whatsapp: Option<String>,
}

#[derive(Args)]
pub struct RemoveDriverArgs {
    /// Driver ID (or prefix)
    pub driver_id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct CallDriverArgs {
    /// Driver ID (or prefix)
    pub driver_id: String,

    /// Only print the link
    #[arg(long)]
    pub no_open: bool,
}

fn driver_id(d: &Driver) -> &str {
    &d.id
}

pub async fn execute(cmd: DriverCommands, project_dir: &Path) -> Result<()> {
    let (pool, owner, _config) = open_account(project_dir)?;
    let notifier = WebNotifier::new();

    match cmd {
        DriverCommands::Add(args) => {
            let input = DriverInput {
                name: args.name,
                phone: args.phone,
                whatsapp: args.whatsapp,
            };
            let driver = safar_core::driver::add_driver(&pool, &owner.id, &input)?;
            notifier.drivers_changed().await;

            println!(
                "{} Added driver: {} ({})",
                "✓".green().bold(),
                driver.name.cyan(),
                driver.id.dimmed()
            );
        }

        DriverCommands::List(args) => {
            let drivers = safar_core::driver::list_drivers(&pool, &owner.id)?;
            let query = args.query.unwrap_or_default();
            let shown = safar_core::driver::filter_drivers(&drivers, &query);
            output::print_drivers_table(&shown);
        }

        DriverCommands::Edit(args) => {
            let drivers = safar_core::driver::list_drivers(&pool, &owner.id)?;
            let driver = resolve(&drivers, &args.driver_id, driver_id, "driver")?;

            let input = DriverInput {
                name: args.name.unwrap_or_else(|| driver.name.clone()),
                phone: args.phone.unwrap_or_else(|| driver.phone.clone()),
                whatsapp: args.whatsapp.or_else(|| Some(driver.whatsapp.clone())),
            };
            let updated = safar_core::driver::update_driver(&pool, &driver.id, &input)?;
            notifier.drivers_changed().await;

            println!("{} Updated driver: {}", "✓".green().bold(), updated.name.cyan());
        }

        DriverCommands::Remove(args) => {
            let drivers = safar_core::driver::list_drivers(&pool, &owner.id)?;
            let driver = resolve(&drivers, &args.driver_id, driver_id, "driver")?;

            if !args.yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove {}?", driver.name))
                    .default(false)
                    .interact()
                    .context("Failed to read confirmation")?;
                if !confirmed {
                    println!("{}", "Cancelled.".dimmed());
                    return Ok(());
                }
            }

            safar_core::driver::delete_driver(&pool, &driver.id)?;
            notifier.drivers_changed().await;
            notifier.trips_changed().await;

            println!("{} Removed driver: {}", "✓".green().bold(), driver.name.cyan());
        }

        DriverCommands::Call(args) => {
            let drivers = safar_core::driver::list_drivers(&pool, &owner.id)?;
            let driver = resolve(&drivers, &args.driver_id, driver_id, "driver")?;

            println!("{} Calling {} ({})", "☎".green(), driver.name.cyan(), driver.phone);
            TerminalDispatcher::new(!args.no_open).open_external(&driver.call_link());
        }
    }

    Ok(())
}
