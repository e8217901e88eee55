//! SAFAR Database Layer
//!
//! Embedded SQLite persistence for owners, drivers and trips, plus the
//! realtime update channel shared by the CLI and the web server.

pub mod migrations;
pub mod pool;
pub mod queries;
pub mod realtime;

pub use pool::{DbError, DbPool, DbResult};
pub use realtime::{create_realtime_channel, RealtimeSender, WebSocketMessage};

use std::path::Path;

/// Open the database at `path`, creating it (and its parent directory) if
/// needed, and bring the schema up to date.
pub fn init_pool(path: &Path) -> DbResult<DbPool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    tracing::debug!(path = %path.display(), "Opening database");
    let pool = DbPool::open(path)?;
    migrations::run_migrations(&pool)?;
    Ok(pool)
}

/// In-memory database with the schema applied. Used by tests across the workspace.
pub fn init_memory_pool() -> DbResult<DbPool> {
    let pool = DbPool::in_memory()?;
    migrations::run_migrations(&pool)?;
    Ok(pool)
}
