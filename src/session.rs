//! The Session value and its transition function.
//!
//! A [`Session`] is the whole state of one file-processing attempt. It is only
//! ever changed by [`transition`], which consumes the current session and an
//! [`Event`] and returns the next session. Nothing here touches the network,
//! a clock or a terminal.
//!
//! Every Processing episode gets a fresh number. Events produced on behalf of
//! an episode (emitter ticks, request outcomes) carry that number and are
//! ignored once the session has moved on to another episode or left
//! Processing. That is what keeps a late tick or a late response from
//! touching a reset or reselected session.

use crate::api::FileBlob;
use crate::config::ProgressPolicy;
use crate::error::USER_ERROR_MESSAGE;
use crate::mode::Mode;
use crate::result::ResultHandle;

/// Lifecycle state. The result handle and the error message live inside the
/// variant they belong to, so neither can exist in any other state.
#[derive(Debug)]
pub enum Status {
    /// Nothing running. A file may or may not be selected.
    Idle,
    Processing,
    Completed(ResultHandle),
    Error(String),
}

/// Data-free mirror of [`Status`] for snapshots and comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Idle,
    Processing,
    Completed,
    Error,
}

impl Status {
    pub fn kind(&self) -> StatusKind {
        match self {
            Status::Idle => StatusKind::Idle,
            Status::Processing => StatusKind::Processing,
            Status::Completed(_) => StatusKind::Completed,
            Status::Error(_) => StatusKind::Error,
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug)]
pub enum Event {
    /// The user picked a file.
    SelectFile(FileBlob),
    /// The user switched direction. Always resets the session.
    SetMode(Mode),
    /// The user asked to process the selected file.
    Start,
    /// The progress emitter fired for `episode`.
    Tick { episode: u64 },
    /// The request for `episode` returned a payload.
    Succeeded { episode: u64, result: ResultHandle },
    /// The request for `episode` failed.
    Failed { episode: u64 },
    Reset,
}

/// Cheap copy of the observable parts of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub mode: Mode,
    pub status: StatusKind,
    pub progress: u8,
    pub episode: u64,
}

#[derive(Debug)]
pub struct Session {
    mode: Mode,
    policy: ProgressPolicy,
    file: Option<FileBlob>,
    status: Status,
    progress: u8,
    episode: u64,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Mode::default(), ProgressPolicy::default())
    }
}

impl Session {
    /// An empty, idle session.
    pub fn new(mode: Mode, policy: ProgressPolicy) -> Self {
        Self {
            mode,
            policy,
            file: None,
            status: Status::Idle,
            progress: 0,
            episode: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn file(&self) -> Option<&FileBlob> {
        self.file.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Number of the current (or most recent) Processing episode.
    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.status, Status::Processing)
    }

    pub fn result(&self) -> Option<&ResultHandle> {
        match &self.status {
            Status::Completed(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            Status::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Whether [`Event::Start`] would be accepted right now.
    pub fn can_start(&self) -> bool {
        self.file.is_some() && matches!(self.status, Status::Idle | Status::Error(_))
    }

    /// Download name for the current result, if there is one.
    pub fn artifact_name(&self) -> Option<String> {
        let file = self.file.as_ref()?;
        self.result()?;
        Some(self.mode.artifact_name(file.name()))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            status: self.status.kind(),
            progress: self.progress,
            episode: self.episode,
        }
    }

    /// Consume the session and return the one after `event`.
    pub fn apply(self, event: Event) -> Session {
        transition(self, event)
    }

    // Everything cleared; mode, policy and the episode counter survive so
    // events from earlier episodes stay stale.
    fn cleared(&self) -> Session {
        Session {
            episode: self.episode,
            ..Session::new(self.mode, self.policy)
        }
    }

    fn owns(&self, episode: u64) -> bool {
        self.is_processing() && self.episode == episode
    }
}

/// The state machine. Events that are not allowed in the current state leave
/// the session unchanged.
pub fn transition(session: Session, event: Event) -> Session {
    match event {
        Event::SelectFile(file) => {
            if session.is_processing() {
                tracing::debug!(file = file.name(), "Ignoring file selection while processing");
                return session;
            }
            Session {
                file: Some(file),
                ..session.cleared()
            }
        }

        Event::SetMode(mode) => Session {
            mode,
            ..session.cleared()
        },

        Event::Start => {
            if !session.can_start() {
                tracing::debug!(status = ?session.status.kind(), has_file = session.file.is_some(), "Start rejected");
                return session;
            }
            let initial = session.policy.initial.min(session.policy.ceiling);
            Session {
                status: Status::Processing,
                progress: initial,
                episode: session.episode + 1,
                ..session
            }
        }

        Event::Tick { episode } => {
            if !session.owns(episode) {
                return session;
            }
            let ceiling = session.policy.ceiling;
            let progress = if session.progress >= ceiling {
                session.progress
            } else {
                session.progress.saturating_add(session.policy.step).min(ceiling)
            };
            Session { progress, ..session }
        }

        Event::Succeeded { episode, result } => {
            if !session.owns(episode) {
                tracing::debug!(episode, current = session.episode, "Dropping stale result");
                return session;
            }
            Session {
                status: Status::Completed(result),
                progress: 100,
                ..session
            }
        }

        Event::Failed { episode } => {
            if !session.owns(episode) {
                return session;
            }
            Session {
                status: Status::Error(USER_ERROR_MESSAGE.to_string()),
                progress: 0,
                ..session
            }
        }

        Event::Reset => session.cleared(),
    }
}
