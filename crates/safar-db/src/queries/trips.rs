//! Trip queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Trip row from database, joined with the assigned driver's name.
#[derive(Debug, Clone)]
pub struct TripRow {
    pub id: String,
    pub owner_id: String,
    pub from_location: String,
    pub to_location: String,
    pub trip_date: String,
    pub trip_time: String,
    pub driver_id: Option<String>,
    pub driver_name: Option<String>,
    pub created_at: String,
}

const TRIP_SELECT: &str = "SELECT t.id, t.owner_id, t.from_location, t.to_location, t.trip_date,
                                  t.trip_time, t.driver_id, d.name, t.created_at
                           FROM trips t LEFT JOIN drivers d ON d.id = t.driver_id";

fn map_trip(row: &rusqlite::Row<'_>) -> rusqlite::Result<TripRow> {
    Ok(TripRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        from_location: row.get(2)?,
        to_location: row.get(3)?,
        trip_date: row.get(4)?,
        trip_time: row.get(5)?,
        driver_id: row.get(6)?,
        driver_name: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Create a new trip.
#[allow(clippy::too_many_arguments)]
pub fn create_trip(
    pool: &DbPool,
    id: &str,
    owner_id: &str,
    from_location: &str,
    to_location: &str,
    trip_date: &str,
    trip_time: &str,
    driver_id: Option<&str>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO trips (id, owner_id, from_location, to_location, trip_date, trip_time, driver_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![id, owner_id, from_location, to_location, trip_date, trip_time, driver_id],
        )?;
        Ok(())
    })
}

/// Get a trip by ID.
pub fn get_trip(pool: &DbPool, id: &str) -> DbResult<TripRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("{} WHERE t.id = ?1", TRIP_SELECT),
            params![id],
            map_trip,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Trip: {}", id)),
            e => DbError::Connection(e),
        })
    })
}

/// List an owner's trips, latest date and time first.
pub fn list_trips(pool: &DbPool, owner_id: &str) -> DbResult<Vec<TripRow>> {
    list_trips_limited(pool, owner_id, -1)
}

/// The first `limit` trips of [`list_trips`].
pub fn list_recent_trips(pool: &DbPool, owner_id: &str, limit: usize) -> DbResult<Vec<TripRow>> {
    list_trips_limited(pool, owner_id, i64::try_from(limit).unwrap_or(i64::MAX))
}

fn list_trips_limited(pool: &DbPool, owner_id: &str, limit: i64) -> DbResult<Vec<TripRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE t.owner_id = ?1
             ORDER BY t.trip_date DESC, t.trip_time DESC, t.rowid DESC
             LIMIT ?2",
            TRIP_SELECT
        ))?;

        let rows = stmt.query_map(params![owner_id, limit], map_trip)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Delete a trip.
pub fn delete_trip(pool: &DbPool, id: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM trips WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Trip: {}", id)));
        }
        Ok(())
    })
}

/// Assign (or clear) the driver of a trip.
pub fn assign_driver(pool: &DbPool, trip_id: &str, driver_id: Option<&str>) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE trips SET driver_id = ?1 WHERE id = ?2",
            params![driver_id, trip_id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Trip: {}", trip_id)));
        }
        Ok(())
    })
}

/// Count an owner's trips.
pub fn count_trips(pool: &DbPool, owner_id: &str) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT COUNT(*) FROM trips WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        )
        .map_err(DbError::from)
    })
}

/// Count trips scheduled on `date` (`YYYY-MM-DD`).
pub fn count_trips_on(pool: &DbPool, owner_id: &str, date: &str) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT COUNT(*) FROM trips WHERE owner_id = ?1 AND trip_date = ?2",
            params![owner_id, date],
            |row| row.get(0),
        )
        .map_err(DbError::from)
    })
}

/// Count trips scheduled on or after `date` (`YYYY-MM-DD`).
pub fn count_trips_from(pool: &DbPool, owner_id: &str, date: &str) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT COUNT(*) FROM trips WHERE owner_id = ?1 AND trip_date >= ?2",
            params![owner_id, date],
            |row| row.get(0),
        )
        .map_err(DbError::from)
    })
}
