//! Dashboard statistics command.

use anyhow::Result;
use std::path::Path;

use super::open_account;
use crate::output;

pub async fn execute(project_dir: &Path) -> Result<()> {
    let (pool, owner, config) = open_account(project_dir)?;
    let today = chrono::Local::now().date_naive();

    let stats = safar_core::dashboard::get_stats(&pool, &owner.id, today)?;
    output::print_stats(&owner, &stats);

    let recent = safar_core::trip::recent_trips(&pool, &owner.id, config.trips.recent_limit)?;
    if !recent.is_empty() {
        println!();
        output::print_trips_table(&recent);
    }
    Ok(())
}
