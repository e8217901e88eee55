//! Owner accounts and profile.
//!
//! Sign-in is handled outside SAFAR; an owner here is just the profile the
//! drivers and trips hang off.

pub mod model;

use crate::error::{SafarError, SafarResult};
use model::Owner;
use safar_db::queries::owners as queries;
use safar_db::{DbError, DbPool};
use uuid::Uuid;

/// Register a new owner.
pub fn create_owner(pool: &DbPool, full_name: &str, phone: &str, email: &str) -> SafarResult<Owner> {
    let full_name = required(full_name, "Full name")?;
    let phone = required(phone, "Phone number")?;
    let email = required(email, "Email")?;
    if !email.contains('@') {
        return Err(SafarError::validation(format!("Invalid email address: {}", email)));
    }

    let id = Uuid::new_v4().to_string();
    queries::create_owner(pool, &id, full_name, phone, email)?;

    tracing::info!(owner_id = %id, "Owner created");
    get_owner(pool, &id)
}

/// Get an owner by ID.
pub fn get_owner(pool: &DbPool, id: &str) -> SafarResult<Owner> {
    let row = queries::get_owner(pool, id).map_err(|e| match e {
        DbError::NotFound(_) => SafarError::OwnerNotFound(id.to_string()),
        e => e.into(),
    })?;
    Ok(Owner::from_row(row))
}

/// Get the account this installation belongs to.
pub fn get_default_owner(pool: &DbPool) -> SafarResult<Option<Owner>> {
    let row = queries::get_default_owner(pool)?;
    Ok(row.map(Owner::from_row))
}

/// Like [`get_default_owner`] but an error when nobody has signed up yet.
pub fn require_default_owner(pool: &DbPool) -> SafarResult<Owner> {
    get_default_owner(pool)?
        .ok_or_else(|| SafarError::not_initialized("No owner account. Run 'safar init' first."))
}

/// Update the owner's name and phone.
pub fn update_profile(pool: &DbPool, id: &str, full_name: &str, phone: &str) -> SafarResult<Owner> {
    let full_name = required(full_name, "Full name")?;
    let phone = required(phone, "Phone number")?;

    queries::update_profile(pool, id, full_name, phone).map_err(|e| match e {
        DbError::NotFound(_) => SafarError::OwnerNotFound(id.to_string()),
        e => e.into(),
    })?;
    get_owner(pool, id)
}

pub(crate) fn required<'a>(value: &'a str, field: &str) -> SafarResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SafarError::validation(format!("{} is required", field)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::SubscriptionStatus;
    use safar_db::init_memory_pool;

    #[test]
    fn test_create_owner_defaults() {
        let pool = init_memory_pool().unwrap();
        let owner = create_owner(&pool, " Asha Rao ", "+91 98450", "asha@example.com").unwrap();

        assert_eq!(owner.full_name, "Asha Rao");
        assert_eq!(owner.role, "owner");
        assert_eq!(owner.subscription_status, SubscriptionStatus::Inactive);
    }

    #[test]
    fn test_create_owner_validation() {
        let pool = init_memory_pool().unwrap();
        assert!(matches!(
            create_owner(&pool, "", "1", "a@b.c"),
            Err(SafarError::ValidationError(_))
        ));
        assert!(matches!(
            create_owner(&pool, "Asha", "1", "not-an-email"),
            Err(SafarError::ValidationError(_))
        ));
    }

    #[test]
    fn test_require_default_owner() {
        let pool = init_memory_pool().unwrap();
        assert!(matches!(
            require_default_owner(&pool),
            Err(SafarError::NotInitialized(_))
        ));

        let owner = create_owner(&pool, "Asha", "1", "asha@example.com").unwrap();
        assert_eq!(require_default_owner(&pool).unwrap().id, owner.id);
    }

    #[test]
    fn test_update_profile() {
        let pool = init_memory_pool().unwrap();
        let owner = create_owner(&pool, "Asha", "1", "asha@example.com").unwrap();

        let updated = update_profile(&pool, &owner.id, "Asha R", "2").unwrap();
        assert_eq!(updated.full_name, "Asha R");
        assert_eq!(updated.phone, "2");

        assert!(matches!(
            update_profile(&pool, "ghost", "A", "1"),
            Err(SafarError::OwnerNotFound(_))
        ));
        assert!(update_profile(&pool, &owner.id, "", "1").is_err());
    }
}
