//! Terminal output formatting.

use colored::Colorize;
use safar_core::broadcast::Progress;
use safar_core::dashboard::DashboardStats;
use safar_core::driver::model::Driver;
use safar_core::owner::model::{Owner, SubscriptionStatus};
use safar_core::trip::model::Trip;
use unicode_width::UnicodeWidthStr;

/// Print the owner profile.
pub fn print_owner(owner: &Owner) {
    println!("{} {}", owner.full_name.cyan().bold(), format!("({})", short_id(&owner.id)).dimmed());
    println!();
    println!("{}: {}", "Phone".bold(), owner.phone);
    println!("{}: {}", "Email".bold(), owner.email);
    println!("{}: {}", "Role".bold(), owner.role);

    let status = match owner.subscription_status {
        SubscriptionStatus::Active => owner.subscription_status.as_str().green(),
        SubscriptionStatus::Inactive => owner.subscription_status.as_str().dimmed(),
    };
    println!("{}: {} ({})", "Plan".bold(), owner.subscription_plan, status);
}

/// Print drivers as a table.
pub fn print_drivers_table(drivers: &[&Driver]) {
    if drivers.is_empty() {
        println!("{}", "No drivers found.".dimmed());
        return;
    }

    let name_width = column_width(24);
    println!(
        "{:<10} {} {:<18} {:<18}",
        "ID",
        pad_right("Name", name_width),
        "Phone",
        "WhatsApp"
    );
    println!("{}", "─".repeat(10 + name_width + 40));

    for driver in drivers {
        let whatsapp = if driver.whatsapp == driver.phone {
            "same".dimmed()
        } else {
            driver.whatsapp.normal()
        };
        println!(
            "{:<10} {} {:<18} {:<18}",
            short_id(&driver.id),
            pad_right(&truncate_visual(&driver.name, name_width), name_width),
            driver.phone,
            whatsapp
        );
    }

    println!();
    println!("{} driver(s)", drivers.len());
}

/// Print trips as a table.
pub fn print_trips_table(trips: &[Trip]) {
    if trips.is_empty() {
        println!("{}", "No trips found.".dimmed());
        return;
    }

    let route_width = column_width(36);
    println!(
        "{:<10} {} {:<11} {:<6} {}",
        "ID",
        pad_right("Route", route_width),
        "Date",
        "Time",
        "Driver"
    );
    println!("{}", "─".repeat(10 + route_width + 36));

    for trip in trips {
        let route = format!("{} → {}", trip.from_location, trip.to_location);
        let driver = match &trip.driver_name {
            Some(name) => name.cyan(),
            None => "unassigned".dimmed(),
        };
        println!(
            "{:<10} {} {:<11} {:<6} {}",
            short_id(&trip.id),
            pad_right(&truncate_visual(&route, route_width), route_width),
            trip.trip_date,
            trip.trip_time,
            driver
        );
    }

    println!();
    println!("{} trip(s)", trips.len());
}

/// Print the dashboard header.
pub fn print_stats(owner: &Owner, stats: &DashboardStats) {
    println!("{} {}", "SAFAR".cyan().bold(), owner.full_name.bold());
    println!();
    println!("  {:<16} {}", "Drivers", stats.total_drivers.to_string().bold());
    println!("  {:<16} {}", "Trips", stats.total_trips.to_string().bold());
    println!("  {:<16} {}", "Upcoming", stats.upcoming_trips.to_string().yellow());
    println!("  {:<16} {}", "Today", stats.trips_today.to_string().green());
}

/// "Driver N of M" line of the broadcast wizard.
pub fn print_progress(progress: &Progress, label: &str) {
    println!();
    println!(
        "{} {}",
        format!("[{}/{}]", progress.position, progress.total).blue().bold(),
        label
    );
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Width of the flexible column: `preferred`, shrunk on narrow terminals.
fn column_width(preferred: usize) -> usize {
    let spare = term_width().saturating_sub(50);
    preferred.min(spare).max(12)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}
