//! Trip domain models.

use safar_db::queries::trips::TripRow;
use serde::{Deserialize, Serialize};

use crate::broadcast::TripDescription;

/// A scheduled trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub owner_id: String,
    pub from_location: String,
    pub to_location: String,
    /// `YYYY-MM-DD`
    pub trip_date: String,
    /// `HH:MM`
    pub trip_time: String,
    pub driver_id: Option<String>,
    pub driver_name: Option<String>,
    pub created_at: String,
}

impl Trip {
    /// Create a Trip from a database row.
    pub fn from_row(row: TripRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            from_location: row.from_location,
            to_location: row.to_location,
            trip_date: row.trip_date,
            trip_time: row.trip_time,
            driver_id: row.driver_id,
            driver_name: row.driver_name,
            created_at: row.created_at,
        }
    }

    /// What the broadcast message says about this trip.
    pub fn description(&self) -> TripDescription {
        TripDescription::new(
            self.from_location.clone(),
            self.to_location.clone(),
            self.trip_date.clone(),
            self.trip_time.clone(),
        )
    }
}

/// Input for creating a trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTrip {
    pub from_location: String,
    pub to_location: String,
    pub trip_date: String,
    pub trip_time: String,
    #[serde(default)]
    pub driver_id: Option<String>,
}

impl NewTrip {
    pub fn description(&self) -> TripDescription {
        TripDescription::new(
            self.from_location.clone(),
            self.to_location.clone(),
            self.trip_date.clone(),
            self.trip_time.clone(),
        )
    }
}
