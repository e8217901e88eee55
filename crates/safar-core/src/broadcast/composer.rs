//! Trip request messages and deep links.

use serde::{Deserialize, Serialize};

/// Default deep-link base (WhatsApp click-to-chat).
pub const DEFAULT_LINK_BASE: &str = "https://wa.me";

/// Sent when no trip is attached to the broadcast.
pub const GENERIC_MESSAGE: &str = "Hello, I have a new trip.";

/// What the message says about the trip. All fields are display strings and
/// may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDescription {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub time: String,
}

impl TripDescription {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            date: date.into(),
            time: time.into(),
        }
    }
}

/// Message text plus the link that delivers it to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedMessage {
    pub text: String,
    pub target: String,
}

/// Render the message body.
pub fn message_text(trip: Option<&TripDescription>) -> String {
    match trip {
        None => GENERIC_MESSAGE.to_string(),
        Some(trip) => format!(
            "*New Trip Request* 🚗\n\n\
             📍 From: {}\n\
             🏁 To: {}\n\
             📅 Date: {}\n\
             ⏰ Time: {}\n\n\
             Are you available for this trip?",
            trip.origin, trip.destination, trip.date, trip.time
        ),
    }
}

/// `tel:` link for a one-off call.
pub fn call_link(phone: &str) -> String {
    let number: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    format!("tel:{}", number)
}

/// Builds deep links against a configurable base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composer {
    link_base: String,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_BASE)
    }
}

impl Composer {
    pub fn new(link_base: impl Into<String>) -> Self {
        let link_base = link_base.into();
        Self {
            link_base: link_base.trim_end_matches('/').to_string(),
        }
    }

    /// Compose the message for `number`. Pure: nothing is opened or sent.
    pub fn compose(&self, number: &str, trip: Option<&TripDescription>) -> ComposedMessage {
        let text = message_text(trip);
        // Click-to-chat paths take the bare international number.
        let digits: String = number.chars().filter(char::is_ascii_digit).collect();
        let target = format!(
            "{}/{}?text={}",
            self.link_base,
            digits,
            urlencoding::encode(&text)
        );
        ComposedMessage { text, target }
    }
}

/// [`Composer::compose`] with the default link base.
pub fn compose(number: &str, trip: Option<&TripDescription>) -> ComposedMessage {
    Composer::default().compose(number, trip)
}
