//! Presentation state machine.
//!
//! A [`PlaybackController`] drives one dialog session at a time: it reveals
//! each sentence character by character, pauses, then either moves on or
//! presents the answer's choices one by one. Everything time-based goes
//! through a [`Timeline`]; the host lets time pass with
//! [`PlaybackController::advance`].
//!
//! ```text
//!   Idle ──start──▶ Revealing ──pause──▶ AwaitingChoice
//!                     ▲  │                    │
//!                     │  └─sentence──┐        │ select_choice
//!                     └──────────────┴────────┘
//!   any ──close / dialog ends──▶ Closed
//! ```

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};
use treetalk_graph::{DialogGraph, Localizer, NoLocalization, Node, NodeId, NodeKind};

use crate::config::PlaybackConfig;
use crate::error::PlaybackError;
use crate::observer::{PlaybackEvent, PlaybackObserver};
use crate::runner::DialogRunner;
use crate::timeline::Timeline;

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Revealing,
    AwaitingChoice,
    Closed,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Revealing => write!(f, "revealing"),
            PlaybackState::AwaitingChoice => write!(f, "awaiting a choice"),
            PlaybackState::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Reveal one more character.
    Reveal,
    /// Follow an edge out of the fully revealed sentence.
    Advance,
    /// Present the choice at this index.
    Present(usize),
}

/// A choice that is currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentedChoice {
    pub index: usize,
    pub text: String,
    /// Whether selecting it leads anywhere.
    pub bound: bool,
}

/// Everything a UI needs to draw the current frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackView {
    pub state: PlaybackState,
    pub node: Option<NodeId>,
    pub speaker: String,
    pub text: String,
    pub fully_revealed: bool,
    pub choices: Vec<PresentedChoice>,
}

/// Drives reveal, choice presentation and skipping for dialog sessions.
pub struct PlaybackController<'g> {
    config: PlaybackConfig,
    localizer: Box<dyn Localizer>,
    observers: Vec<Box<dyn PlaybackObserver>>,
    timeline: Timeline<Step>,
    runner: Option<DialogRunner<'g>>,
    state: PlaybackState,
    speaker: String,
    text: String,
    text_len: usize,
    progress: usize,
    presented: Vec<PresentedChoice>,
    stopped: bool,
}

impl fmt::Debug for PlaybackController<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("node", &self.current_id())
            .field("progress", &self.progress)
            .field("text_len", &self.text_len)
            .field("presented", &self.presented.len())
            .field("now", &self.timeline.now())
            .field("pending", &self.timeline.pending())
            .finish()
    }
}

impl Default for PlaybackController<'_> {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl<'g> PlaybackController<'g> {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            localizer: Box::new(NoLocalization),
            observers: Vec::new(),
            timeline: Timeline::new(),
            runner: None,
            state: PlaybackState::Idle,
            speaker: String::new(),
            text: String::new(),
            text_len: 0,
            progress: 0,
            presented: Vec::new(),
            stopped: false,
        }
    }

    /// Resolve display text through `localizer` instead of raw text.
    pub fn with_localizer(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Box::new(localizer);
        self
    }

    /// Register an observer for every future event.
    pub fn subscribe(&mut self, observer: impl PlaybackObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // --- Session control ---

    /// Begin a session over `graph`, seeding from the configured seed or
    /// from entropy when none is set.
    pub fn start(&mut self, graph: &'g DialogGraph) {
        let runner = match self.config.seed {
            Some(seed) => DialogRunner::seeded(graph, seed),
            None => DialogRunner::from_entropy(graph),
        };
        self.start_with_runner(runner);
    }

    /// Begin a session with an explicit seed.
    pub fn start_seeded(&mut self, graph: &'g DialogGraph, seed: u64) {
        self.start_with_runner(DialogRunner::seeded(graph, seed));
    }

    /// Begin a session driven by `runner`. An unfinished session is closed
    /// first.
    pub fn start_with_runner(&mut self, mut runner: DialogRunner<'g>) {
        if matches!(
            self.state,
            PlaybackState::Revealing | PlaybackState::AwaitingChoice
        ) {
            self.close();
        }
        self.timeline.cancel_all();
        self.stopped = false;
        self.clear_frame();
        self.set_state(PlaybackState::Idle);

        let first = runner.init();
        self.runner = Some(runner);
        match first {
            Some(node) if node.is_sentence() => self.enter_sentence(node),
            _ => self.close(),
        }
        self.run_due();
    }

    /// End the session. `Stopped` is sent once per session no matter how
    /// often this is called.
    pub fn close(&mut self) {
        self.timeline.cancel_all();
        self.presented.clear();
        self.set_state(PlaybackState::Closed);
        if !self.stopped {
            self.stopped = true;
            self.emit(PlaybackEvent::Stopped);
        }
    }

    /// Let `elapsed` pass on the session clock, firing every step that
    /// becomes due. Returns the number of steps fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let until = self.timeline.now().saturating_add(elapsed);
        let fired = self.pump(until);
        self.timeline.set_now(until);
        fired
    }

    /// Hurry the session along.
    ///
    /// While a sentence is still being revealed it is shown in full and the
    /// usual pause follows. Once it is fully shown the dialog moves on
    /// immediately. While choices are being presented the rest appear at
    /// once.
    pub fn skip(&mut self) -> Result<(), PlaybackError> {
        match self.state {
            PlaybackState::Revealing => {
                self.timeline.cancel_all();
                if self.progress < self.text_len {
                    self.progress = self.text_len;
                    self.complete_reveal();
                } else {
                    self.advance_node();
                }
            }
            PlaybackState::AwaitingChoice => {
                self.timeline.cancel_all();
                if let Some(answer) = self.current_node() {
                    for index in self.presented.len()..answer_len(answer) {
                        self.present(answer, index);
                    }
                    self.choices_shown(answer);
                }
            }
            state => {
                return Err(PlaybackError::NotAccepting {
                    state,
                    action: "skip",
                })
            }
        }
        debug!(state = %self.state, "skipped");
        self.run_due();
        Ok(())
    }

    /// Follow choice `index` of the answer being presented.
    pub fn select_choice(&mut self, answer: NodeId, index: usize) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::AwaitingChoice {
            return Err(PlaybackError::NotAccepting {
                state: self.state,
                action: "select a choice",
            });
        }
        let runner = match self.runner.as_mut() {
            Some(r) if r.current_id() == Some(answer) => r,
            _ => return Err(PlaybackError::NotCurrentAnswer(answer)),
        };
        let child = runner
            .graph()
            .answer(&answer)
            .and_then(|a| a.child_at(index))
            .ok_or(PlaybackError::UnboundChoice {
                node: answer,
                index,
            })?;
        let node = runner.goto_node(child)?;
        debug!(%answer, index, sentence = %child, "choice selected");
        self.timeline.cancel_all();
        self.enter_sentence(node);
        self.run_due();
        Ok(())
    }

    // --- Views ---

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_node(&self) -> Option<&'g Node> {
        self.runner.as_ref().and_then(DialogRunner::current)
    }

    fn current_id(&self) -> Option<NodeId> {
        self.runner.as_ref().and_then(DialogRunner::current_id)
    }

    /// The revealed prefix of the current sentence.
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.progress) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    /// The whole display text of the current sentence.
    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.progress >= self.text_len
    }

    pub fn presented_choices(&self) -> &[PresentedChoice] {
        &self.presented
    }

    /// Speaker of the current sentence: its own speaker if set, otherwise
    /// the graph's character.
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// Session clock.
    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    pub fn snapshot(&self) -> PlaybackView {
        PlaybackView {
            state: self.state,
            node: self.current_id(),
            speaker: self.speaker.clone(),
            text: self.visible_text().to_string(),
            fully_revealed: self.is_fully_revealed(),
            choices: self.presented.clone(),
        }
    }

    // --- Internals ---

    fn run_due(&mut self) -> usize {
        let now = self.timeline.now();
        self.pump(now)
    }

    fn pump(&mut self, until: Duration) -> usize {
        let mut fired = 0;
        while let Some(step) = self.timeline.pop_due(until) {
            fired += 1;
            self.fire(step);
        }
        fired
    }

    fn fire(&mut self, step: Step) {
        trace!(?step, state = %self.state, now = ?self.timeline.now(), "step fired");
        match (step, self.state) {
            (Step::Reveal, PlaybackState::Revealing) => self.reveal_tick(),
            (Step::Advance, PlaybackState::Revealing) => self.advance_node(),
            (Step::Present(index), PlaybackState::AwaitingChoice) => {
                let Some(answer) = self.current_node() else {
                    return;
                };
                if index == self.presented.len() && self.present(answer, index) {
                    let next = index + 1;
                    if next < answer_len(answer) {
                        self.timeline
                            .schedule(self.config.choice_delay(), Step::Present(next));
                    } else {
                        self.choices_shown(answer);
                    }
                }
            }
            _ => {}
        }
    }

    fn reveal_tick(&mut self) {
        if self.progress < self.text_len {
            self.progress += 1;
        }
        if self.progress < self.text_len {
            self.timeline.schedule(self.config.char_delay(), Step::Reveal);
        } else {
            self.complete_reveal();
        }
    }

    fn complete_reveal(&mut self) {
        if let Some(id) = self.current_id() {
            self.emit(PlaybackEvent::RevealCompleted { id });
        }
        self.timeline
            .schedule(self.config.natural_pause(), Step::Advance);
    }

    /// Take exactly one step through the graph.
    fn advance_node(&mut self) {
        let next = self.runner.as_mut().and_then(DialogRunner::next);
        match next {
            Some(node) => match node.kind() {
                NodeKind::Sentence(_) => self.enter_sentence(node),
                NodeKind::Answer(_) => self.enter_answer(),
            },
            None => self.close(),
        }
    }

    fn enter_sentence(&mut self, node: &'g Node) {
        let Some(sentence) = node.as_sentence() else {
            self.close();
            return;
        };
        let localizer = self.localizer.as_ref();
        let text = sentence.display_text(localizer).into_owned();
        let speaker = match (&sentence.speaker, &self.runner) {
            (Some(speaker), _) => speaker.clone(),
            (None, Some(runner)) => runner
                .graph()
                .character()
                .display_name(localizer)
                .into_owned(),
            (None, None) => String::new(),
        };

        self.text_len = text.chars().count();
        self.text = text;
        self.speaker = speaker;
        self.progress = 0;
        self.presented.clear();
        self.set_state(PlaybackState::Revealing);

        self.emit(PlaybackEvent::SentenceEntered {
            id: node.id(),
            speaker: self.speaker.clone(),
            text: self.text.clone(),
        });
        if let Some(name) = &sentence.signal {
            self.emit(PlaybackEvent::Signal {
                id: node.id(),
                name: name.clone(),
            });
        }
        self.timeline.schedule(Duration::ZERO, Step::Reveal);
    }

    /// Every choice is on screen. With nothing bound there is nowhere to
    /// go, so the runner is asked to move on and the session closes.
    fn choices_shown(&mut self, answer: &'g Node) {
        let dead_end = answer.as_answer().map_or(true, |a| a.bound_count() == 0);
        if dead_end && self.state == PlaybackState::AwaitingChoice {
            debug!(answer = %answer.id(), "answer has no bound choices");
            self.timeline.cancel_all();
            self.advance_node();
        }
    }

    fn enter_answer(&mut self) {
        self.presented.clear();
        self.set_state(PlaybackState::AwaitingChoice);
        self.timeline.schedule(Duration::ZERO, Step::Present(0));
    }

    /// Put one choice on screen. Returns false if the index does not exist.
    fn present(&mut self, node: &'g Node, index: usize) -> bool {
        let Some(answer) = node.as_answer() else {
            return false;
        };
        let Some(choice) = answer.choice(index) else {
            return false;
        };
        let presented = PresentedChoice {
            index,
            text: choice.display_text(self.localizer.as_ref()).into_owned(),
            bound: answer.child_at(index).is_some(),
        };
        self.emit(PlaybackEvent::ChoicePresented {
            answer: node.id(),
            index,
            text: presented.text.clone(),
            bound: presented.bound,
        });
        self.presented.push(presented);
        true
    }

    fn clear_frame(&mut self) {
        self.speaker.clear();
        self.text.clear();
        self.text_len = 0;
        self.progress = 0;
        self.presented.clear();
    }

    fn set_state(&mut self, to: PlaybackState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        debug!(%from, %to, "playback state changed");
        self.emit(PlaybackEvent::StateChanged { from, to });
    }

    fn emit(&mut self, event: PlaybackEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}

fn answer_len(node: &Node) -> usize {
    node.as_answer().map_or(0, |a| a.choice_count())
}
