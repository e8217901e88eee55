//! Broadcast sequencer.
//!
//! Walks a frozen queue of recipient ids one position at a time:
//!
//! ```text
//!            start (non-empty)
//!   Idle ───────────────────────▶ Sequencing { queue, cursor = 0 }
//!    ▲                               │ send_current / skip_current: cursor += 1
//!    │   cursor == len, or cancel    │
//!    └───────────────────────────────┘
//! ```
//!
//! `send_current` is the only transition that dispatches. A queued id that no
//! longer resolves in the directory is skipped without dispatching.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::composer::{Composer, TripDescription};
use super::directory::Directory;
use super::selection::SelectionSet;
use super::{BroadcastError, Dispatcher};

/// What `start` does with the first recipient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMode {
    /// Enter the sequence and wait for an explicit send.
    #[default]
    Armed,
    /// Message the first recipient right away, then wait on the second.
    DispatchFirst,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum State {
    #[default]
    Idle,
    Sequencing { queue: Vec<String>, cursor: usize },
}

/// Outcome for the recipient a step was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    /// The deep link was dispatched.
    Sent,
    /// The owner skipped this recipient.
    Skipped,
    /// The recipient was removed from the directory; nothing was dispatched.
    StaleSkipped,
}

/// One applied send or skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub recipient_id: String,
    pub action: StepAction,
    /// The sequencer returned to idle after this step.
    pub finished: bool,
}

/// Running counts for the current (or last) sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub sent: usize,
    pub skipped: usize,
}

/// Where the sequence stands, for "N of M" displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// 1-based position of the recipient awaiting action.
    pub position: usize,
    pub total: usize,
    pub recipient_id: String,
}

/// The send / skip / cancel state machine.
#[derive(Debug, Clone)]
pub struct BroadcastSequencer {
    state: State,
    mode: StartMode,
    composer: Composer,
    trip: Option<TripDescription>,
    tally: Tally,
}

impl BroadcastSequencer {
    pub fn new(trip: Option<TripDescription>, composer: Composer, mode: StartMode) -> Self {
        Self {
            state: State::Idle,
            mode,
            composer,
            trip,
            tally: Tally::default(),
        }
    }

    pub fn trip(&self) -> Option<&TripDescription> {
        self.trip.as_ref()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Sequencing { .. })
    }

    /// Id awaiting action, if sequencing.
    pub fn current_id(&self) -> Option<&str> {
        match &self.state {
            State::Sequencing { queue, cursor } => queue.get(*cursor).map(String::as_str),
            State::Idle => None,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        match &self.state {
            State::Sequencing { cursor, .. } => Some(*cursor),
            State::Idle => None,
        }
    }

    /// The frozen queue, empty when idle.
    pub fn queue(&self) -> &[String] {
        match &self.state {
            State::Sequencing { queue, .. } => queue,
            State::Idle => &[],
        }
    }

    pub fn progress(&self) -> Option<Progress> {
        match &self.state {
            State::Sequencing { queue, cursor } => Some(Progress {
                position: cursor + 1,
                total: queue.len(),
                recipient_id: queue[*cursor].clone(),
            }),
            State::Idle => None,
        }
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Freeze `selection` into a queue and start sequencing.
    ///
    /// An empty selection is rejected and leaves the state untouched. In
    /// [`StartMode::DispatchFirst`] the first recipient is sent immediately
    /// and the returned step describes it.
    pub fn start(
        &mut self,
        selection: &SelectionSet,
        directory: &Directory,
        dispatcher: &mut dyn Dispatcher,
    ) -> Result<Option<Step>, BroadcastError> {
        if selection.is_empty() {
            debug!("Broadcast start rejected: empty selection");
            return Err(BroadcastError::EmptySelection);
        }

        let queue = selection.snapshot(directory);
        info!(recipients = queue.len(), mode = ?self.mode, "Broadcast started");

        self.tally = Tally::default();
        self.state = State::Sequencing { queue, cursor: 0 };

        match self.mode {
            StartMode::Armed => Ok(None),
            StartMode::DispatchFirst => Ok(self.send_current(directory, dispatcher)),
        }
    }

    /// Dispatch to the current recipient (or skip it if it no longer exists)
    /// and advance. Returns `None` when idle.
    pub fn send_current(
        &mut self,
        directory: &Directory,
        dispatcher: &mut dyn Dispatcher,
    ) -> Option<Step> {
        let recipient_id = self.current_id()?.to_string();

        let action = match directory.find(&recipient_id) {
            Some(recipient) => {
                let message = self
                    .composer
                    .compose(recipient.messaging_number(), self.trip.as_ref());
                debug!(recipient = %recipient_id, target = %message.target, "Dispatching trip request");
                dispatcher.open_external(&message.target);
                self.tally.sent += 1;
                StepAction::Sent
            }
            None => {
                debug!(recipient = %recipient_id, "Recipient no longer in directory, skipping");
                self.tally.skipped += 1;
                StepAction::StaleSkipped
            }
        };

        let finished = self.advance();
        Some(Step {
            recipient_id,
            action,
            finished,
        })
    }

    /// Advance without dispatching. Returns `None` when idle.
    pub fn skip_current(&mut self) -> Option<Step> {
        let recipient_id = self.current_id()?.to_string();
        debug!(recipient = %recipient_id, "Recipient skipped");
        self.tally.skipped += 1;

        let finished = self.advance();
        Some(Step {
            recipient_id,
            action: StepAction::Skipped,
            finished,
        })
    }

    /// Abort the sequence. Always ends idle.
    pub fn cancel(&mut self) {
        if self.is_active() {
            info!(
                sent = self.tally.sent,
                skipped = self.tally.skipped,
                "Broadcast cancelled"
            );
        }
        self.state = State::Idle;
    }

    fn advance(&mut self) -> bool {
        let finished = match &mut self.state {
            State::Sequencing { queue, cursor } => {
                *cursor += 1;
                *cursor >= queue.len()
            }
            State::Idle => true,
        };

        if finished {
            info!(
                sent = self.tally.sent,
                skipped = self.tally.skipped,
                "Broadcast finished"
            );
            self.state = State::Idle;
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::directory::Recipient;
    use crate::broadcast::LinkCollector;

    fn directory(ids: &[&str]) -> Directory {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                Recipient::new(*id, format!("Driver {}", id), format!("10{}", i), None).unwrap()
            })
            .collect()
    }

    fn select(ids: &[&str]) -> SelectionSet {
        let mut sel = SelectionSet::new();
        sel.select_all(ids.iter().copied());
        sel
    }

    fn sequencer(mode: StartMode) -> BroadcastSequencer {
        let trip = TripDescription::new("Airport", "Downtown", "2024-05-01", "14:30");
        BroadcastSequencer::new(Some(trip), Composer::default(), mode)
    }

    #[test]
    fn test_start_builds_queue_of_selection_size() {
        let dir = directory(&["d1", "d2", "d3"]);
        let mut seq = sequencer(StartMode::Armed);
        let mut links = LinkCollector::new();

        let step = seq.start(&select(&["d1", "d2", "d3"]), &dir, &mut links).unwrap();
        assert!(step.is_none());
        assert!(seq.is_active());
        assert_eq!(seq.queue().len(), 3);
        assert_eq!(seq.cursor(), Some(0));
        assert!(links.links().is_empty());
    }

    #[test]
    fn test_start_with_empty_selection_is_rejected() {
        let dir = directory(&["d1"]);
        let mut seq = sequencer(StartMode::Armed);
        let mut links = LinkCollector::new();

        let err = seq.start(&SelectionSet::new(), &dir, &mut links).unwrap_err();
        assert_eq!(err, BroadcastError::EmptySelection);
        assert!(!seq.is_active());
        assert!(links.links().is_empty());
    }

    #[test]
    fn test_each_step_advances_by_one_and_dispatches_at_most_once() {
        let dir = directory(&["d1", "d2", "d3", "d4"]);
        let mut seq = sequencer(StartMode::Armed);
        let mut links = LinkCollector::new();
        seq.start(&select(&["d1", "d2", "d3", "d4"]), &dir, &mut links).unwrap();

        let step = seq.send_current(&dir, &mut links).unwrap();
        assert_eq!(step.action, StepAction::Sent);
        assert_eq!(seq.cursor(), Some(1));
        assert_eq!(links.links().len(), 1);

        let step = seq.skip_current().unwrap();
        assert_eq!(step.action, StepAction::Skipped);
        assert_eq!(seq.cursor(), Some(2));
        assert_eq!(links.links().len(), 1);

        seq.send_current(&dir, &mut links).unwrap();
        assert_eq!(seq.cursor(), Some(3));
        assert_eq!(links.links().len(), 2);
    }

    #[test]
    fn test_alternating_steps_end_idle_after_queue_length() {
        let dir = directory(&["d1", "d2", "d3", "d4", "d5"]);
        let mut seq = sequencer(StartMode::Armed);
        let mut links = LinkCollector::new();
        seq.start(&select(&["d1", "d2", "d3", "d4", "d5"]), &dir, &mut links)
            .unwrap();

        for i in 0..5 {
            assert!(seq.is_active());
            let step = if i % 2 == 0 {
                seq.send_current(&dir, &mut links)
            } else {
                seq.skip_current()
            };
            let step = step.unwrap();
            assert_eq!(step.finished, i == 4);
        }

        assert!(!seq.is_active());
        assert_eq!(seq.tally(), Tally { sent: 3, skipped: 2 });
        assert!(seq.send_current(&dir, &mut links).is_none());
        assert!(seq.skip_current().is_none());
    }

    #[test]
    fn test_cancel_from_any_position() {
        let dir = directory(&["d1", "d2", "d3"]);
        for advance in 0..3 {
            let mut seq = sequencer(StartMode::Armed);
            let mut links = LinkCollector::new();
            seq.start(&select(&["d1", "d2", "d3"]), &dir, &mut links).unwrap();
            for _ in 0..advance {
                seq.skip_current();
            }
            seq.cancel();
            assert!(!seq.is_active());
            assert!(seq.progress().is_none());
            assert!(seq.queue().is_empty());
        }

        let mut idle = sequencer(StartMode::Armed);
        idle.cancel();
        assert!(!idle.is_active());
    }

    #[test]
    fn test_removed_recipient_is_skipped_silently() {
        let mut dir = directory(&["D1", "D2", "D3"]);
        let mut seq = sequencer(StartMode::Armed);
        let mut links = LinkCollector::new();
        seq.start(&select(&["D1", "D2", "D3"]), &dir, &mut links).unwrap();

        dir = directory(&["D1", "D3"]);

        let first = seq.send_current(&dir, &mut links).unwrap();
        assert_eq!((first.recipient_id.as_str(), first.action), ("D1", StepAction::Sent));
        assert_eq!(seq.cursor(), Some(1));

        let second = seq.send_current(&dir, &mut links).unwrap();
        assert_eq!(second.action, StepAction::StaleSkipped);
        assert_eq!(seq.cursor(), Some(2));

        let third = seq.send_current(&dir, &mut links).unwrap();
        assert_eq!(third.recipient_id, "D3");
        assert!(third.finished);

        assert!(!seq.is_active());
        assert_eq!(links.links().len(), 2);
    }

    #[test]
    fn test_dispatch_uses_whatsapp_number_and_trip_text() {
        let dir = Directory::new(vec![Recipient::new(
            "d1",
            "Ravi",
            "111",
            Some("+91 222".to_string()),
        )
        .unwrap()]);
        let mut seq = sequencer(StartMode::Armed);
        let mut links = LinkCollector::new();
        seq.start(&select(&["d1"]), &dir, &mut links).unwrap();
        seq.send_current(&dir, &mut links);

        let link = &links.links()[0];
        assert!(link.starts_with("https://wa.me/91222?text="));
        assert!(link.contains("Airport"));
    }

    #[test]
    fn test_progress_reports_position_of_total() {
        let dir = directory(&["d1", "d2"]);
        let mut seq = sequencer(StartMode::Armed);
        let mut links = LinkCollector::new();
        seq.start(&select(&["d2", "d1"]), &dir, &mut links).unwrap();

        let progress = seq.progress().unwrap();
        assert_eq!((progress.position, progress.total), (1, 2));
        assert_eq!(progress.recipient_id, "d1");

        seq.skip_current();
        assert_eq!(seq.progress().unwrap().position, 2);
    }

    #[test]
    fn test_dispatch_first_sends_on_start() {
        let dir = directory(&["d1", "d2"]);
        let mut seq = sequencer(StartMode::DispatchFirst);
        let mut links = LinkCollector::new();

        let step = seq.start(&select(&["d1", "d2"]), &dir, &mut links).unwrap().unwrap();
        assert_eq!(step.action, StepAction::Sent);
        assert_eq!(seq.cursor(), Some(1));
        assert_eq!(links.links().len(), 1);
    }

    #[test]
    fn test_dispatch_first_single_recipient_ends_idle() {
        let dir = directory(&["d1"]);
        let mut seq = sequencer(StartMode::DispatchFirst);
        let mut links = LinkCollector::new();

        let step = seq.start(&select(&["d1"]), &dir, &mut links).unwrap().unwrap();
        assert!(step.finished);
        assert!(!seq.is_active());
        assert_eq!(links.links().len(), 1);
    }

    #[test]
    fn test_restart_resets_tally() {
        let dir = directory(&["d1"]);
        let mut seq = sequencer(StartMode::Armed);
        let mut links = LinkCollector::new();
        seq.start(&select(&["d1"]), &dir, &mut links).unwrap();
        seq.send_current(&dir, &mut links);
        assert_eq!(seq.tally().sent, 1);

        seq.start(&select(&["d1"]), &dir, &mut links).unwrap();
        assert_eq!(seq.tally(), Tally::default());
    }
}
