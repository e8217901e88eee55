//! Owner domain models.

use safar_db::queries::owners::OwnerRow;
use serde::{Deserialize, Serialize};

/// A fleet owner account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub role: String,
    pub subscription_plan: String,
    pub subscription_status: SubscriptionStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Owner {
    /// Create from database row.
    pub fn from_row(row: OwnerRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            phone: row.phone,
            email: row.email,
            role: row.role,
            subscription_plan: row.subscription_plan,
            subscription_status: SubscriptionStatus::from_str(&row.subscription_status),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
}

impl SubscriptionStatus {
    /// Parse from string. Anything but "active" is inactive.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "active" => Self::Active,
            _ => Self::Inactive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}
