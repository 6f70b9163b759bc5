//! Runtime side of treetalk: walking a dialog graph and presenting it.
//!
//! [`DialogRunner`] is the traversal cursor. [`PlaybackController`] wraps a
//! runner with timed text reveal, choice presentation and skipping, all on
//! a virtual clock the host advances explicitly.

pub mod config;
pub mod error;
pub mod observer;
pub mod playback;
pub mod runner;
pub mod timeline;
pub mod trace;

pub use config::{PlaybackConfig, CONFIG_FILE_NAME};
pub use error::{ConfigError, PlaybackError, RunnerError};
pub use observer::{EventLog, PlaybackEvent, PlaybackObserver};
pub use playback::{PlaybackController, PlaybackState, PlaybackView, PresentedChoice};
pub use runner::DialogRunner;
pub use timeline::Timeline;
pub use trace::TraceStep;
