//! Driver directory management.

pub mod model;

use crate::broadcast::{search_matches, DirectoryProvider, Recipient};
use crate::error::{SafarError, SafarResult};
use crate::owner::required;
use model::{Driver, DriverInput};
use safar_db::queries::drivers as queries;
use safar_db::{DbError, DbPool};
use uuid::Uuid;

/// Trim and default the form fields. A blank WhatsApp number becomes the phone.
fn normalize(input: &DriverInput) -> SafarResult<(String, String, String)> {
    let name = required(&input.name, "Name")?.to_string();
    let phone = required(&input.phone, "Phone")?.to_string();
    let whatsapp = input
        .whatsapp
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .unwrap_or(phone.as_str())
        .to_string();
    Ok((name, phone, whatsapp))
}

fn not_found(id: &str) -> impl FnOnce(DbError) -> SafarError + '_ {
    move |e| match e {
        DbError::NotFound(_) => SafarError::DriverNotFound(id.to_string()),
        e => e.into(),
    }
}

/// Add a driver to an owner's fleet.
pub fn add_driver(pool: &DbPool, owner_id: &str, input: &DriverInput) -> SafarResult<Driver> {
    let (name, phone, whatsapp) = normalize(input)?;
    let id = Uuid::new_v4().to_string();

    queries::create_driver(pool, &id, owner_id, &name, &phone, Some(&whatsapp))?;
    tracing::info!(driver_id = %id, "Driver added");

    get_driver(pool, &id)
}

/// Get a driver by ID.
pub fn get_driver(pool: &DbPool, id: &str) -> SafarResult<Driver> {
    let row = queries::get_driver(pool, id).map_err(not_found(id))?;
    Ok(Driver::from_row(row))
}

/// List an owner's drivers, newest first.
pub fn list_drivers(pool: &DbPool, owner_id: &str) -> SafarResult<Vec<Driver>> {
    let rows = queries::list_drivers(pool, owner_id)?;
    Ok(rows.into_iter().map(Driver::from_row).collect())
}

/// Replace a driver's contact details.
pub fn update_driver(pool: &DbPool, id: &str, input: &DriverInput) -> SafarResult<Driver> {
    let (name, phone, whatsapp) = normalize(input)?;
    queries::update_driver(pool, id, &name, &phone, Some(&whatsapp)).map_err(not_found(id))?;
    tracing::info!(driver_id = %id, "Driver updated");
    get_driver(pool, id)
}

/// Remove a driver. Their trips become unassigned.
pub fn delete_driver(pool: &DbPool, id: &str) -> SafarResult<()> {
    queries::delete_driver(pool, id).map_err(not_found(id))?;
    tracing::info!(driver_id = %id, "Driver removed");
    Ok(())
}

/// Drivers whose name (case-insensitive) or phone contains `query`.
pub fn filter_drivers<'a>(drivers: &'a [Driver], query: &str) -> Vec<&'a Driver> {
    drivers
        .iter()
        .filter(|d| search_matches(&d.name, &d.phone, query))
        .collect()
}

/// Live driver list of one owner, read from the database on demand.
pub struct DriverDirectory<'a> {
    pool: &'a DbPool,
    owner_id: &'a str,
}

impl<'a> DriverDirectory<'a> {
    pub fn new(pool: &'a DbPool, owner_id: &'a str) -> Self {
        Self { pool, owner_id }
    }
}

impl DirectoryProvider for DriverDirectory<'_> {
    fn list_recipients(&self) -> SafarResult<Vec<Recipient>> {
        let drivers = list_drivers(self.pool, self.owner_id)?;
        Ok(drivers.iter().map(Driver::to_recipient).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::Directory;
    use crate::owner;
    use safar_db::init_memory_pool;

    fn setup() -> (DbPool, String) {
        let pool = init_memory_pool().unwrap();
        let owner = owner::create_owner(&pool, "Owner", "1", "owner@example.com").unwrap();
        (pool, owner.id)
    }

    fn input(name: &str, phone: &str, whatsapp: Option<&str>) -> DriverInput {
        DriverInput {
            name: name.to_string(),
            phone: phone.to_string(),
            whatsapp: whatsapp.map(str::to_string),
        }
    }

    #[test]
    fn test_whatsapp_defaults_to_phone() {
        let (pool, owner_id) = setup();
        let d = add_driver(&pool, &owner_id, &input("Ravi", "111", None)).unwrap();
        assert_eq!(d.whatsapp, "111");

        let d = add_driver(&pool, &owner_id, &input("Imran", "222", Some("  "))).unwrap();
        assert_eq!(d.whatsapp, "222");

        let d = add_driver(&pool, &owner_id, &input("Joseph", "333", Some("444"))).unwrap();
        assert_eq!(d.whatsapp, "444");
    }

    #[test]
    fn test_name_and_phone_required() {
        let (pool, owner_id) = setup();
        assert!(matches!(
            add_driver(&pool, &owner_id, &input("", "111", None)),
            Err(SafarError::ValidationError(_))
        ));
        assert!(matches!(
            add_driver(&pool, &owner_id, &input("Ravi", " ", None)),
            Err(SafarError::ValidationError(_))
        ));
    }

    #[test]
    fn test_update_and_delete() {
        let (pool, owner_id) = setup();
        let d = add_driver(&pool, &owner_id, &input("Ravi", "111", None)).unwrap();

        let updated = update_driver(&pool, &d.id, &input("Ravi K", "555", None)).unwrap();
        assert_eq!(updated.name, "Ravi K");
        assert_eq!(updated.whatsapp, "555");

        delete_driver(&pool, &d.id).unwrap();
        assert!(matches!(get_driver(&pool, &d.id), Err(SafarError::DriverNotFound(_))));
        assert!(matches!(
            update_driver(&pool, &d.id, &input("X", "1", None)),
            Err(SafarError::DriverNotFound(_))
        ));
    }

    #[test]
    fn test_filter_drivers() {
        let (pool, owner_id) = setup();
        add_driver(&pool, &owner_id, &input("Ravi Kumar", "+91 111", None)).unwrap();
        add_driver(&pool, &owner_id, &input("Imran", "+91 222", None)).unwrap();
        let drivers = list_drivers(&pool, &owner_id).unwrap();

        let names = |q: &str| -> Vec<String> {
            filter_drivers(&drivers, q).iter().map(|d| d.name.clone()).collect()
        };
        assert_eq!(names("KUMAR"), vec!["Ravi Kumar"]);
        assert_eq!(names("222"), vec!["Imran"]);
        assert_eq!(names("").len(), 2);
    }

    #[test]
    fn test_driver_search_agrees_with_broadcast_picker() {
        let (pool, owner_id) = setup();
        add_driver(&pool, &owner_id, &input("Ravi Kumar", "+91 111", Some("777"))).unwrap();
        add_driver(&pool, &owner_id, &input("Imran", "+91 222", None)).unwrap();
        add_driver(&pool, &owner_id, &input("Kumaran", "333", None)).unwrap();
        let drivers = list_drivers(&pool, &owner_id).unwrap();
        let dir = Directory::load(&DriverDirectory::new(&pool, &owner_id)).unwrap();

        for q in ["", "  ", "kumar", " KUMAR ", "+91", "222", "777", "nobody"] {
            let from_list: Vec<String> =
                filter_drivers(&drivers, q).iter().map(|d| d.id.clone()).collect();
            assert_eq!(from_list, dir.filtered_ids(q), "query {:?}", q);
        }
    }

    #[test]
    fn test_driver_directory_follows_database() {
        let (pool, owner_id) = setup();
        let d1 = add_driver(&pool, &owner_id, &input("Ravi", "111", None)).unwrap();
        let d2 = add_driver(&pool, &owner_id, &input("Imran", "222", Some("999"))).unwrap();

        let provider = DriverDirectory::new(&pool, &owner_id);
        let dir = Directory::load(&provider).unwrap();
        assert_eq!(dir.ids(), vec![d2.id.clone(), d1.id.clone()]);
        assert_eq!(dir.find(&d2.id).unwrap().messaging_number(), "999");

        delete_driver(&pool, &d1.id).unwrap();
        let dir = Directory::load(&provider).unwrap();
        assert!(dir.find(&d1.id).is_none());
    }
}
