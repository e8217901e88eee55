//! Trip scheduling.

pub mod model;

use chrono::{Local, NaiveDate, NaiveTime};
use model::{NewTrip, Trip};
use safar_db::queries::trips as queries;
use safar_db::{DbError, DbPool};
use uuid::Uuid;

use crate::error::{SafarError, SafarResult};
use crate::owner::required;

/// Date format stored in `trip_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format stored in `trip_time`.
pub const TIME_FORMAT: &str = "%H:%M";

/// Default number of trips in the "recent" list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Today's date in the local timezone, as stored in `trip_date`.
pub fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Current local wall-clock time, as stored in `trip_time`.
pub fn current_time() -> String {
    Local::now().time().format(TIME_FORMAT).to_string()
}

fn not_found(id: &str) -> impl FnOnce(DbError) -> SafarError + '_ {
    move |e| match e {
        DbError::NotFound(_) => SafarError::TripNotFound(id.to_string()),
        e => e.into(),
    }
}

fn validate(input: &NewTrip) -> SafarResult<NewTrip> {
    let from_location = required(&input.from_location, "From location")?.to_string();
    let to_location = required(&input.to_location, "To destination")?.to_string();

    let date = input.trip_date.trim();
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| {
        SafarError::validation(format!("Invalid trip date '{}', expected YYYY-MM-DD", date))
    })?;

    let time = input.trip_time.trim();
    NaiveTime::parse_from_str(time, TIME_FORMAT).map_err(|_| {
        SafarError::validation(format!("Invalid trip time '{}', expected HH:MM", time))
    })?;

    let driver_id = input
        .driver_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    Ok(NewTrip {
        from_location,
        to_location,
        trip_date: date.to_string(),
        trip_time: time.to_string(),
        driver_id,
    })
}

/// Create a trip for an owner.
pub fn create_trip(pool: &DbPool, owner_id: &str, input: &NewTrip) -> SafarResult<Trip> {
    let trip = validate(input)?;

    if let Some(driver_id) = &trip.driver_id {
        crate::driver::get_driver(pool, driver_id)?;
    }

    let id = Uuid::new_v4().to_string();
    queries::create_trip(
        pool,
        &id,
        owner_id,
        &trip.from_location,
        &trip.to_location,
        &trip.trip_date,
        &trip.trip_time,
        trip.driver_id.as_deref(),
    )?;
    tracing::info!(trip_id = %id, date = %trip.trip_date, "Trip created");

    get_trip(pool, &id)
}

/// Get a trip by ID.
pub fn get_trip(pool: &DbPool, id: &str) -> SafarResult<Trip> {
    let row = queries::get_trip(pool, id).map_err(not_found(id))?;
    Ok(Trip::from_row(row))
}

/// All trips, latest date and time first.
pub fn list_trips(pool: &DbPool, owner_id: &str) -> SafarResult<Vec<Trip>> {
    let rows = queries::list_trips(pool, owner_id)?;
    Ok(rows.into_iter().map(Trip::from_row).collect())
}

/// The first `limit` trips of [`list_trips`].
pub fn recent_trips(pool: &DbPool, owner_id: &str, limit: usize) -> SafarResult<Vec<Trip>> {
    let rows = queries::list_recent_trips(pool, owner_id, limit)?;
    Ok(rows.into_iter().map(Trip::from_row).collect())
}

/// Delete a trip.
pub fn delete_trip(pool: &DbPool, id: &str) -> SafarResult<()> {
    queries::delete_trip(pool, id).map_err(not_found(id))?;
    tracing::info!(trip_id = %id, "Trip deleted");
    Ok(())
}

/// Assign a driver to a trip, or clear the assignment with `None`.
pub fn assign_driver(pool: &DbPool, trip_id: &str, driver_id: Option<&str>) -> SafarResult<Trip> {
    if let Some(driver_id) = driver_id {
        crate::driver::get_driver(pool, driver_id)?;
    }
    queries::assign_driver(pool, trip_id, driver_id).map_err(not_found(trip_id))?;
    tracing::info!(trip_id = %trip_id, driver_id = ?driver_id, "Trip driver assigned");
    get_trip(pool, trip_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{self, model::DriverInput};
    use crate::owner;
    use safar_db::init_memory_pool;

    fn setup() -> (DbPool, String) {
        let pool = init_memory_pool().unwrap();
        let owner = owner::create_owner(&pool, "Owner", "1", "owner@example.com").unwrap();
        (pool, owner.id)
    }

    fn new_trip(date: &str, time: &str) -> NewTrip {
        NewTrip {
            from_location: "Airport".to_string(),
            to_location: "Downtown".to_string(),
            trip_date: date.to_string(),
            trip_time: time.to_string(),
            driver_id: None,
        }
    }

    #[test]
    fn test_create_and_describe() {
        let (pool, owner_id) = setup();
        let trip = create_trip(&pool, &owner_id, &new_trip("2024-05-01", "14:30")).unwrap();

        let desc = trip.description();
        assert_eq!(desc.origin, "Airport");
        assert_eq!(desc.destination, "Downtown");
        assert_eq!(desc.date, "2024-05-01");
        assert_eq!(desc.time, "14:30");
        assert!(trip.driver_id.is_none());
    }

    #[test]
    fn test_validation() {
        let (pool, owner_id) = setup();

        let mut missing_from = new_trip("2024-05-01", "14:30");
        missing_from.from_location = "  ".to_string();
        assert!(matches!(
            create_trip(&pool, &owner_id, &missing_from),
            Err(SafarError::ValidationError(_))
        ));

        assert!(create_trip(&pool, &owner_id, &new_trip("01/05/2024", "14:30")).is_err());
        assert!(create_trip(&pool, &owner_id, &new_trip("2024-05-01", "2pm")).is_err());

        let mut unknown_driver = new_trip("2024-05-01", "14:30");
        unknown_driver.driver_id = Some("ghost".to_string());
        assert!(matches!(
            create_trip(&pool, &owner_id, &unknown_driver),
            Err(SafarError::DriverNotFound(_))
        ));
    }

    #[test]
    fn test_recent_trips_ordering() {
        let (pool, owner_id) = setup();
        for day in 1..=7 {
            create_trip(&pool, &owner_id, &new_trip(&format!("2024-05-0{}", day), "09:00")).unwrap();
        }

        let recent = recent_trips(&pool, &owner_id, DEFAULT_RECENT_LIMIT).unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].trip_date, "2024-05-07");
        assert_eq!(list_trips(&pool, &owner_id).unwrap().len(), 7);
    }

    #[test]
    fn test_assign_driver_and_delete() {
        let (pool, owner_id) = setup();
        let d = driver::add_driver(
            &pool,
            &owner_id,
            &DriverInput {
                name: "Ravi".to_string(),
                phone: "111".to_string(),
                whatsapp: None,
            },
        )
        .unwrap();
        let trip = create_trip(&pool, &owner_id, &new_trip("2024-05-01", "14:30")).unwrap();

        let assigned = assign_driver(&pool, &trip.id, Some(&d.id)).unwrap();
        assert_eq!(assigned.driver_name.as_deref(), Some("Ravi"));

        let cleared = assign_driver(&pool, &trip.id, None).unwrap();
        assert!(cleared.driver_id.is_none());

        delete_trip(&pool, &trip.id).unwrap();
        assert!(matches!(get_trip(&pool, &trip.id), Err(SafarError::TripNotFound(_))));
    }

    #[test]
    fn test_today_format() {
        assert!(NaiveDate::parse_from_str(&today(), DATE_FORMAT).is_ok());
        assert!(NaiveTime::parse_from_str(&current_time(), TIME_FORMAT).is_ok());
    }
}
