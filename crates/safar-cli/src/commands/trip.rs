//! Trip commands and the broadcast wizard.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, MultiSelect, Select};
use safar_core::broadcast::{
    BroadcastError, BroadcastSession, Directory, Step, StepAction, TripDescription,
};
use safar_core::driver::model::Driver;
use safar_core::driver::DriverDirectory;
use safar_core::notifier::WebNotifier;
use safar_core::owner::model::Owner;
use safar_core::trip::model::{NewTrip, Trip};
use safar_core::SafarConfig;
use safar_db::DbPool;
use std::path::Path;

use super::{open_account, resolve};
use crate::dispatch::TerminalDispatcher;
use crate::output;

#[derive(Subcommand)]
pub enum TripCommands {
    /// Schedule a new trip
    New(NewTripArgs),

    /// List all trips
    List,

    /// Show the most recent trips
    Recent(RecentTripsArgs),

    /// Delete a trip
    Delete(DeleteTripArgs),

    /// Assign a driver to a trip
    Assign(AssignTripArgs),

    /// Send a trip request to drivers, one at a time
    Broadcast(BroadcastArgs),
}

#[derive(Args)]
pub struct NewTripArgs {
    /// Pickup location
    #[arg(long)]
    pub from: String,

    /// Destination
    #[arg(long)]
    pub to: String,

    /// Date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Time (HH:MM, defaults to now)
    #[arg(long)]
    pub time: Option<String>,

    /// Assign a driver (ID or prefix)
    #[arg(long)]
    pub driver: Option<String>,
}

#[derive(Args)]
pub struct RecentTripsArgs {
    /// Number of trips (defaults to trips.recent_limit)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct DeleteTripArgs {
    /// Trip ID (or prefix)
    pub trip_id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct AssignTripArgs {
    /// Trip ID (or prefix)
    pub trip_id: String,

    /// Driver ID (or prefix); omit to unassign
    pub driver_id: Option<String>,
}

#[derive(Args)]
pub struct BroadcastArgs {
    /// Trip ID (or prefix); omit to send a generic message
    pub trip_id: Option<String>,

    /// Only print links instead of opening them
    #[arg(long)]
    pub no_open: bool,
}

fn trip_id(t: &Trip) -> &str {
    &t.id
}

fn driver_id(d: &Driver) -> &str {
    &d.id
}

fn find_trip(pool: &DbPool, owner: &Owner, needle: &str) -> Result<Trip> {
    let trips = safar_core::trip::list_trips(pool, &owner.id)?;
    Ok(resolve(&trips, needle, trip_id, "trip")?.clone())
}

fn find_driver_id(pool: &DbPool, owner: &Owner, needle: &str) -> Result<String> {
    let drivers = safar_core::driver::list_drivers(pool, &owner.id)?;
    Ok(resolve(&drivers, needle, driver_id, "driver")?.id.clone())
}

pub async fn execute(cmd: TripCommands, project_dir: &Path) -> Result<()> {
    let (pool, owner, config) = open_account(project_dir)?;
    let notifier = WebNotifier::new();

    match cmd {
        TripCommands::New(args) => {
            let driver_id = match args.driver.as_deref() {
                Some(needle) => Some(find_driver_id(&pool, &owner, needle)?),
                None => None,
            };
            let input = NewTrip {
                from_location: args.from,
                to_location: args.to,
                trip_date: args.date.unwrap_or_else(safar_core::trip::today),
                trip_time: args.time.unwrap_or_else(safar_core::trip::current_time),
                driver_id,
            };
            let trip = safar_core::trip::create_trip(&pool, &owner.id, &input)?;
            notifier.trips_changed().await;

            println!(
                "{} Created trip: {} → {} on {} at {} ({})",
                "✓".green().bold(),
                trip.from_location.cyan(),
                trip.to_location.cyan(),
                trip.trip_date,
                trip.trip_time,
                trip.id.dimmed()
            );
            println!("  Broadcast it with: safar trip broadcast {}", output::short_id(&trip.id));
        }

        TripCommands::List => {
            let trips = safar_core::trip::list_trips(&pool, &owner.id)?;
            output::print_trips_table(&trips);
        }

        TripCommands::Recent(args) => {
            let limit = args.limit.unwrap_or(config.trips.recent_limit);
            let trips = safar_core::trip::recent_trips(&pool, &owner.id, limit)?;
            output::print_trips_table(&trips);
        }

        TripCommands::Delete(args) => {
            let trip = find_trip(&pool, &owner, &args.trip_id)?;

            if !args.yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Delete trip {} → {} on {}?",
                        trip.from_location, trip.to_location, trip.trip_date
                    ))
                    .default(false)
                    .interact()
                    .context("Failed to read confirmation")?;
                if !confirmed {
                    println!("{}", "Cancelled.".dimmed());
                    return Ok(());
                }
            }

            safar_core::trip::delete_trip(&pool, &trip.id)?;
            notifier.trips_changed().await;
            println!("{} Deleted trip {}", "✓".green().bold(), trip.id.dimmed());
        }

        TripCommands::Assign(args) => {
            let trip = find_trip(&pool, &owner, &args.trip_id)?;
            let driver_id = match args.driver_id.as_deref() {
                Some(needle) => Some(find_driver_id(&pool, &owner, needle)?),
                None => None,
            };

            let trip = safar_core::trip::assign_driver(&pool, &trip.id, driver_id.as_deref())?;
            notifier.trips_changed().await;

            match &trip.driver_name {
                Some(name) => println!("{} Assigned {} to trip", "✓".green().bold(), name.cyan()),
                None => println!("{} Trip unassigned", "✓".green().bold()),
            }
        }

        TripCommands::Broadcast(args) => {
            let trip = match args.trip_id.as_deref() {
                Some(needle) => Some(find_trip(&pool, &owner, needle)?.description()),
                None => None,
            };
            run_broadcast(&pool, &owner, &config, trip, !args.no_open)?;
        }
    }

    Ok(())
}

fn load_directory(pool: &DbPool, owner: &Owner) -> Result<Directory> {
    Ok(Directory::load(&DriverDirectory::new(pool, &owner.id))?)
}

fn print_step(step: &Step, directory: &Directory) {
    let name = directory
        .find(&step.recipient_id)
        .map(|r| r.name.as_str())
        .unwrap_or("removed driver");
    match step.action {
        StepAction::Sent => println!("  {} Sent to {}", "✓".green(), name.cyan()),
        StepAction::Skipped => println!("  {} Skipped {}", "·".dimmed(), name),
        StepAction::StaleSkipped => {
            println!("  {} Skipped a driver who was removed", "·".dimmed())
        }
    }
}

/// Interactive broadcast: pick drivers, then walk through them.
fn run_broadcast(
    pool: &DbPool,
    owner: &Owner,
    config: &SafarConfig,
    trip: Option<TripDescription>,
    open: bool,
) -> Result<()> {
    let mut directory = load_directory(pool, owner)?;
    if directory.is_empty() {
        println!("{}", "No drivers yet. Add one with 'safar driver add'.".yellow());
        return Ok(());
    }

    let mut session = BroadcastSession::new(trip, &config.broadcast);
    session.observe_directory(&directory);

    match session.trip() {
        Some(t) => println!(
            "{} {} → {}, {} {}",
            "Trip:".bold(),
            t.origin.cyan(),
            t.destination.cyan(),
            t.date,
            t.time
        ),
        None => println!("{}", "No trip attached, sending a generic message.".dimmed()),
    }

    let items: Vec<String> = directory
        .iter()
        .map(|r| format!("{} ({})", r.name, r.phone))
        .collect();
    let defaults: Vec<bool> = directory
        .iter()
        .map(|r| session.selection().is_selected(&r.id))
        .collect();
    let picked = MultiSelect::new()
        .with_prompt("Drivers to message (space toggles, a toggles all)")
        .items(&items)
        .defaults(&defaults)
        .interact()
        .context("Failed to read driver selection")?;

    let ids = directory.ids();
    session
        .selection_mut()
        .select_all(picked.into_iter().map(|i| ids[i].clone()));

    let mut dispatcher = TerminalDispatcher::new(open);
    match session.start(&directory, &mut dispatcher) {
        Ok(Some(step)) => print_step(&step, &directory),
        Ok(None) => {}
        Err(BroadcastError::EmptySelection) => {
            println!("{}", BroadcastError::EmptySelection.to_string().yellow());
            return Ok(());
        }
    }

    while let Some(progress) = session.sequencer().progress() {
        directory = load_directory(pool, owner)?;
        let label = match directory.find(&progress.recipient_id) {
            Some(r) => format!("{} ({})", r.name, r.messaging_number()),
            None => "(removed driver)".to_string(),
        };
        output::print_progress(&progress, &label);

        let choice = Select::new()
            .items(&["Send & next", "Skip", "Cancel"])
            .default(0)
            .interact()
            .context("Failed to read action")?;

        let step = match choice {
            0 => session.send_current(&directory, &mut dispatcher),
            1 => session.skip_current(),
            _ => {
                session.cancel();
                println!("{}", "Broadcast cancelled.".yellow());
                break;
            }
        };
        if let Some(step) = step {
            print_step(&step, &directory);
        }
    }

    let tally = session.sequencer().tally();
    println!();
    println!(
        "{} Done: {} sent, {} skipped",
        "✓".green().bold(),
        tally.sent.to_string().green(),
        tally.skipped
    );
    Ok(())
}
