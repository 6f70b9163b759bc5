//! Playback notifications for UI layers and tools.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use treetalk_graph::NodeId;

use crate::playback::PlaybackState;

/// Something that happened during a playback session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    StateChanged {
        from: PlaybackState,
        to: PlaybackState,
    },
    /// A sentence became current; `text` is the resolved display text.
    SentenceEntered {
        id: NodeId,
        speaker: String,
        text: String,
    },
    /// The entered sentence carries an external hook name.
    Signal { id: NodeId, name: String },
    RevealCompleted { id: NodeId },
    ChoicePresented {
        answer: NodeId,
        index: usize,
        text: String,
        bound: bool,
    },
    /// The session ended. Sent at most once per session.
    Stopped,
}

/// Receives events from a [`PlaybackController`](crate::PlaybackController).
pub trait PlaybackObserver {
    fn on_event(&mut self, event: &PlaybackEvent);
}

impl<F> PlaybackObserver for F
where
    F: FnMut(&PlaybackEvent),
{
    fn on_event(&mut self, event: &PlaybackEvent) {
        self(event)
    }
}

/// Observer that records every event; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<PlaybackEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn count(&self, pred: impl Fn(&PlaybackEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }
}

impl PlaybackObserver for EventLog {
    fn on_event(&mut self, event: &PlaybackEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
