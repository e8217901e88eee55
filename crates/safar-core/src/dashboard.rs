//! Dashboard statistics.

use chrono::NaiveDate;
use safar_db::queries::{drivers, trips};
use safar_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::error::SafarResult;
use crate::trip::DATE_FORMAT;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_drivers: i64,
    pub total_trips: i64,
    /// Trips dated today or later.
    pub upcoming_trips: i64,
    pub trips_today: i64,
}

/// Counts for the dashboard header, relative to `today`.
pub fn get_stats(pool: &DbPool, owner_id: &str, today: NaiveDate) -> SafarResult<DashboardStats> {
    let today = today.format(DATE_FORMAT).to_string();
    Ok(DashboardStats {
        total_drivers: drivers::count_drivers(pool, owner_id)?,
        total_trips: trips::count_trips(pool, owner_id)?,
        upcoming_trips: trips::count_trips_from(pool, owner_id, &today)?,
        trips_today: trips::count_trips_on(pool, owner_id, &today)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{self, model::DriverInput};
    use crate::owner;
    use crate::trip::{self, model::NewTrip};
    use safar_db::init_memory_pool;

    #[test]
    fn test_stats() {
        let pool = init_memory_pool().unwrap();
        let owner = owner::create_owner(&pool, "Owner", "1", "o@example.com").unwrap();

        driver::add_driver(
            &pool,
            &owner.id,
            &DriverInput {
                name: "Ravi".to_string(),
                phone: "111".to_string(),
                whatsapp: None,
            },
        )
        .unwrap();

        for date in ["2024-04-30", "2024-05-01", "2024-05-01", "2024-05-03"] {
            trip::create_trip(
                &pool,
                &owner.id,
                &NewTrip {
                    from_location: "A".to_string(),
                    to_location: "B".to_string(),
                    trip_date: date.to_string(),
                    trip_time: "10:00".to_string(),
                    driver_id: None,
                },
            )
            .unwrap();
        }

        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let stats = get_stats(&pool, &owner.id, today).unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_drivers: 1,
                total_trips: 4,
                upcoming_trips: 3,
                trips_today: 2,
            }
        );
    }

    #[test]
    fn test_empty_account() {
        let pool = init_memory_pool().unwrap();
        let owner = owner::create_owner(&pool, "Owner", "1", "o@example.com").unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(get_stats(&pool, &owner.id, today).unwrap(), DashboardStats::default());
    }
}
