//! Trip broadcast.
//!
//! The owner picks drivers from the directory, then walks through them one at
//! a time, opening a WhatsApp deep link per driver. Everything here is
//! synchronous and owned by a single host (a web server instance or a CLI run).
//!
//! - [`directory`]: recipients and the snapshot the other parts read from
//! - [`selection`]: which recipients are included in the next broadcast
//! - [`composer`]: message text and deep links
//! - [`sequencer`]: the send / skip / cancel state machine
//! - [`session`]: one wizard lifetime tying the above together

pub mod composer;
pub mod directory;
pub mod selection;
pub mod sequencer;
pub mod session;

pub use composer::{call_link, ComposedMessage, Composer, TripDescription};
pub use directory::{search_matches, Directory, DirectoryProvider, Recipient};
pub use selection::{SelectAllLabel, SelectionSet};
pub use sequencer::{BroadcastSequencer, Progress, StartMode, Step, StepAction, Tally};
pub use session::{BroadcastSession, SessionSnapshot};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broadcast pre-condition failures. Shown to the owner as a warning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    #[error("Please select at least one driver.")]
    EmptySelection,
}

/// Opens a deep link somewhere outside the core.
///
/// Fire-and-forget: nothing is returned and failures are invisible to the
/// sequencer.
pub trait Dispatcher {
    fn open_external(&mut self, uri: &str);
}

/// Dispatcher that records links for a remote client to open.
#[derive(Debug, Default, Clone)]
pub struct LinkCollector {
    links: Vec<String>,
}

impl LinkCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn into_links(self) -> Vec<String> {
        self.links
    }
}

impl Dispatcher for LinkCollector {
    fn open_external(&mut self, uri: &str) {
        self.links.push(uri.to_string());
    }
}

/// Broadcast settings (`[broadcast]` in `config.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastOptions {
    /// Whether `start` already messages the first driver.
    pub start_mode: StartMode,
    /// Base of the per-recipient deep link.
    pub link_base: String,
}

impl Default for BroadcastOptions {
    fn default() -> Self {
        Self {
            start_mode: StartMode::default(),
            link_base: composer::DEFAULT_LINK_BASE.to_string(),
        }
    }
}
