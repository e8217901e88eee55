//! Owner (account profile) queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Owner row from database.
#[derive(Debug, Clone)]
pub struct OwnerRow {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub role: String,
    pub subscription_plan: String,
    pub subscription_status: String,
    pub created_at: String,
    pub updated_at: String,
}

const OWNER_COLUMNS: &str = "id, full_name, phone, email, role, subscription_plan,
                             subscription_status, created_at, updated_at";

fn map_owner(row: &rusqlite::Row<'_>) -> rusqlite::Result<OwnerRow> {
    Ok(OwnerRow {
        id: row.get(0)?,
        full_name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        role: row.get(4)?,
        subscription_plan: row.get(5)?,
        subscription_status: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Create a new owner.
pub fn create_owner(
    pool: &DbPool,
    id: &str,
    full_name: &str,
    phone: &str,
    email: &str,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO owners (id, full_name, phone, email) VALUES (?1, ?2, ?3, ?4)",
            params![id, full_name, phone, email],
        )?;
        Ok(())
    })
}

/// Get an owner by ID.
pub fn get_owner(pool: &DbPool, id: &str) -> DbResult<OwnerRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {} FROM owners WHERE id = ?1", OWNER_COLUMNS),
            params![id],
            map_owner,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Owner: {}", id)),
            e => DbError::Connection(e),
        })
    })
}

/// Get the first registered owner (single-account usage).
pub fn get_default_owner(pool: &DbPool) -> DbResult<Option<OwnerRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM owners ORDER BY created_at ASC, rowid ASC LIMIT 1",
            OWNER_COLUMNS
        ))?;

        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            Ok(Some(map_owner(row)?))
        } else {
            Ok(None)
        }
    })
}

/// Update the editable profile fields.
pub fn update_profile(pool: &DbPool, id: &str, full_name: &str, phone: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE owners SET full_name = ?1, phone = ?2, updated_at = datetime('now') WHERE id = ?3",
            params![full_name, phone, id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Owner: {}", id)));
        }
        Ok(())
    })
}
