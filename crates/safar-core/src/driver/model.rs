//! Driver domain models.

use safar_db::queries::drivers::DriverRow;
use serde::{Deserialize, Serialize};

use crate::broadcast::{call_link, Recipient};

/// A driver in the owner's fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub phone: String,
    /// Always set; falls back to `phone` when no separate number was given.
    pub whatsapp: String,
    pub created_at: String,
}

impl Driver {
    /// Create a Driver from a database row.
    pub fn from_row(row: DriverRow) -> Self {
        let whatsapp = row
            .whatsapp
            .filter(|w| !w.trim().is_empty())
            .unwrap_or_else(|| row.phone.clone());

        Self {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            phone: row.phone,
            whatsapp,
            created_at: row.created_at,
        }
    }

    pub fn to_recipient(&self) -> Recipient {
        Recipient {
            id: self.id.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            whatsapp: Some(self.whatsapp.clone()),
        }
    }

    pub fn call_link(&self) -> String {
        call_link(&self.phone)
    }

    /// First letter of the name, for avatars.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

/// Driver form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverInput {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub whatsapp: Option<String>,
}
