//! Contactable recipients.

use serde::{Deserialize, Serialize};

use crate::error::{SafarError, SafarResult};

/// A driver as seen by the broadcast flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: String,
    pub name: String,
    /// Voice number, also the messaging fallback. Never empty.
    pub phone: String,
    pub whatsapp: Option<String>,
}

impl Recipient {
    /// Build a recipient, rejecting a blank phone number.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
        whatsapp: Option<String>,
    ) -> SafarResult<Self> {
        let phone = phone.into();
        if phone.trim().is_empty() {
            return Err(SafarError::validation("Recipient phone number is required"));
        }
        Ok(Self {
            id: id.into(),
            name: name.into(),
            phone,
            whatsapp,
        })
    }

    /// Number used for WhatsApp: the alternate number when set, else the phone.
    pub fn messaging_number(&self) -> &str {
        match self.whatsapp.as_deref() {
            Some(w) if !w.trim().is_empty() => w,
            _ => &self.phone,
        }
    }

    /// Search match used by the driver picker.
    pub fn matches(&self, query: &str) -> bool {
        search_matches(&self.name, &self.phone, query)
    }
}

/// Case-insensitive substring on the name, plain substring on the phone.
/// A blank query matches everyone.
pub fn search_matches(name: &str, phone: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || name.to_lowercase().contains(&query.to_lowercase()) || phone.contains(query)
}

/// Source of recipients (the stored driver list).
pub trait DirectoryProvider {
    fn list_recipients(&self) -> SafarResult<Vec<Recipient>>;
}

/// Ordered snapshot of recipients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    recipients: Vec<Recipient>,
}

impl Directory {
    pub fn new(recipients: Vec<Recipient>) -> Self {
        Self { recipients }
    }

    /// Take a fresh snapshot from a provider.
    pub fn load(provider: &dyn DirectoryProvider) -> SafarResult<Self> {
        Ok(Self::new(provider.list_recipients()?))
    }

    pub fn find(&self, id: &str) -> Option<&Recipient> {
        self.recipients.iter().find(|r| r.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.recipients.iter().position(|r| r.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.recipients.iter().map(|r| r.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.recipients.iter()
    }

    /// Recipients matching a search query, in directory order.
    pub fn filter(&self, query: &str) -> Vec<&Recipient> {
        self.recipients.iter().filter(|r| r.matches(query)).collect()
    }

    /// Ids of [`Directory::filter`].
    pub fn filtered_ids(&self, query: &str) -> Vec<String> {
        self.filter(query).into_iter().map(|r| r.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}

impl FromIterator<Recipient> for Directory {
    fn from_iter<T: IntoIterator<Item = Recipient>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
