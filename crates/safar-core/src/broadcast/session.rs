//! One broadcast wizard lifetime.
//!
//! A session is created when the owner opens the driver picker for a trip and
//! dropped (or [`reset`](BroadcastSession::reset)) when it is closed. The
//! "select everyone" seed happens at most once per session.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::composer::{Composer, TripDescription};
use super::directory::{Directory, Recipient};
use super::selection::{SelectAllLabel, SelectionSet};
use super::sequencer::{BroadcastSequencer, Progress, Step, Tally};
use super::{BroadcastError, BroadcastOptions, Dispatcher};

#[derive(Debug, Clone)]
pub struct BroadcastSession {
    selection: SelectionSet,
    sequencer: BroadcastSequencer,
    seeded: bool,
}

/// Serializable picture of a session for hosts to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub trip: Option<TripDescription>,
    /// Selected ids in broadcast order.
    pub selected: Vec<String>,
    pub select_all_label: SelectAllLabel,
    pub progress: Option<Progress>,
    /// The recipient awaiting action; `None` when idle or when it was removed.
    pub current: Option<Recipient>,
    pub tally: Tally,
}

impl BroadcastSession {
    pub fn new(trip: Option<TripDescription>, options: &BroadcastOptions) -> Self {
        let composer = Composer::new(options.link_base.clone());
        Self {
            selection: SelectionSet::new(),
            sequencer: BroadcastSequencer::new(trip, composer, options.start_mode),
            seeded: false,
        }
    }

    pub fn trip(&self) -> Option<&TripDescription> {
        self.sequencer.trip()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    pub fn sequencer(&self) -> &BroadcastSequencer {
        &self.sequencer
    }

    /// Feed the latest directory snapshot. Selects everyone the first time
    /// the directory is non-empty; later calls never reseed. Returns whether
    /// this call seeded.
    pub fn observe_directory(&mut self, directory: &Directory) -> bool {
        if self.seeded || directory.is_empty() {
            return false;
        }
        self.selection.select_all(directory.ids());
        self.seeded = true;
        debug!(recipients = directory.len(), "Selection seeded with all drivers");
        true
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn start(
        &mut self,
        directory: &Directory,
        dispatcher: &mut dyn Dispatcher,
    ) -> Result<Option<Step>, BroadcastError> {
        self.sequencer.start(&self.selection, directory, dispatcher)
    }

    pub fn send_current(
        &mut self,
        directory: &Directory,
        dispatcher: &mut dyn Dispatcher,
    ) -> Option<Step> {
        self.sequencer.send_current(directory, dispatcher)
    }

    pub fn skip_current(&mut self) -> Option<Step> {
        self.sequencer.skip_current()
    }

    pub fn cancel(&mut self) {
        self.sequencer.cancel();
    }

    /// Close the wizard: cancel any sequence, clear the selection and re-arm
    /// the seed for the next open.
    pub fn reset(&mut self) {
        self.sequencer.cancel();
        self.selection.deselect_all();
        self.seeded = false;
    }

    /// Render state. `visible_ids` are the ids the picker currently shows
    /// (after search filtering); they drive the select-all label.
    pub fn snapshot(&self, directory: &Directory, visible_ids: &[String]) -> SessionSnapshot {
        let progress = self.sequencer.progress();
        let current = progress
            .as_ref()
            .and_then(|p| directory.find(&p.recipient_id))
            .cloned();

        SessionSnapshot {
            trip: self.trip().cloned(),
            selected: self.selection.snapshot(directory),
            select_all_label: self.selection.select_all_label(visible_ids),
            progress,
            current,
            tally: self.sequencer.tally(),
        }
    }
}
