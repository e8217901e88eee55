//! Driver queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Driver row from database.
#[derive(Debug, Clone)]
pub struct DriverRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub created_at: String,
}

fn map_driver(row: &rusqlite::Row<'_>) -> rusqlite::Result<DriverRow> {
    Ok(DriverRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        whatsapp: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Create a new driver.
pub fn create_driver(
    pool: &DbPool,
    id: &str,
    owner_id: &str,
    name: &str,
    phone: &str,
    whatsapp: Option<&str>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO drivers (id, owner_id, name, phone, whatsapp) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, owner_id, name, phone, whatsapp],
        )?;
        Ok(())
    })
}

/// Get a driver by ID.
pub fn get_driver(pool: &DbPool, id: &str) -> DbResult<DriverRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT id, owner_id, name, phone, whatsapp, created_at FROM drivers WHERE id = ?1",
            params![id],
            map_driver,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Driver: {}", id)),
            e => DbError::Connection(e),
        })
    })
}

/// List an owner's drivers, newest first.
pub fn list_drivers(pool: &DbPool, owner_id: &str) -> DbResult<Vec<DriverRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, owner_id, name, phone, whatsapp, created_at
             FROM drivers WHERE owner_id = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map(params![owner_id], map_driver)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Update a driver's contact details.
pub fn update_driver(
    pool: &DbPool,
    id: &str,
    name: &str,
    phone: &str,
    whatsapp: Option<&str>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE drivers SET name = ?1, phone = ?2, whatsapp = ?3 WHERE id = ?4",
            params![name, phone, whatsapp, id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Driver: {}", id)));
        }
        Ok(())
    })
}

/// Delete a driver. Trips assigned to it keep existing, unassigned.
pub fn delete_driver(pool: &DbPool, id: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM drivers WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Driver: {}", id)));
        }
        Ok(())
    })
}

/// Count an owner's drivers.
pub fn count_drivers(pool: &DbPool, owner_id: &str) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT COUNT(*) FROM drivers WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        )
        .map_err(DbError::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_memory_pool;
    use crate::queries::owners;

    fn setup() -> DbPool {
        let pool = init_memory_pool().unwrap();
        owners::create_owner(&pool, "o1", "Owner", "100", "owner@example.com").unwrap();
        pool
    }

    #[test]
    fn test_list_newest_first() {
        let pool = setup();
        create_driver(&pool, "d1", "o1", "Ravi", "111", None).unwrap();
        create_driver(&pool, "d2", "o1", "Imran", "222", Some("333")).unwrap();

        let drivers = list_drivers(&pool, "o1").unwrap();
        let ids: Vec<&str> = drivers.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d2", "d1"]);
        assert_eq!(drivers[0].whatsapp.as_deref(), Some("333"));
        assert_eq!(count_drivers(&pool, "o1").unwrap(), 2);
    }

    #[test]
    fn test_empty_phone_rejected_by_schema() {
        let pool = setup();
        assert!(create_driver(&pool, "d1", "o1", "Ravi", "", None).is_err());
    }

    #[test]
    fn test_update_and_delete() {
        let pool = setup();
        create_driver(&pool, "d1", "o1", "Ravi", "111", None).unwrap();

        update_driver(&pool, "d1", "Ravi K", "444", Some("555")).unwrap();
        let row = get_driver(&pool, "d1").unwrap();
        assert_eq!(row.name, "Ravi K");
        assert_eq!(row.phone, "444");

        delete_driver(&pool, "d1").unwrap();
        assert!(matches!(get_driver(&pool, "d1"), Err(DbError::NotFound(_))));
        assert!(matches!(delete_driver(&pool, "d1"), Err(DbError::NotFound(_))));
    }
}
