// Controller: owns the Session and runs Processing episodes. All session
// changes go through `dispatch`, which applies the pure transition and
// publishes a snapshot for whoever renders progress.
//
// Ordering within an episode: the emitter is stopped (cancelled *and* awaited)
// before the terminal event is dispatched, so no tick can land after
// Completed or Error.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{mpsc, watch};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

use crate::api::{FileBlob, Transfer};
use crate::config::{Config, ProgressPolicy};
use crate::error::TransferError;
use crate::mode::Mode;
use crate::progress::ProgressEmitter;
use crate::result::ResultStore;
use crate::session::{transition, Event, Session, Snapshot, StatusKind};

pub struct Controller {
    transfer: Arc<dyn Transfer>,
    store: ResultStore,
    session: Session,
    policy: ProgressPolicy,
    deadline: Option<Duration>,
    updates: watch::Sender<Snapshot>,
}

impl Controller {
    pub fn new(transfer: Arc<dyn Transfer>, config: &Config) -> Self {
        let session = Session::new(Mode::default(), config.progress);
        let (updates, _) = watch::channel(session.snapshot());
        Self {
            transfer,
            store: ResultStore::new(),
            session,
            policy: config.progress,
            deadline: config.request_deadline,
            updates,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Receive a snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.updates.subscribe()
    }

    pub fn select_file(&mut self, file: FileBlob) {
        self.dispatch(Event::SelectFile(file));
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.dispatch(Event::SetMode(mode));
    }

    pub fn reset(&mut self) {
        self.dispatch(Event::Reset);
    }

    fn dispatch(&mut self, event: Event) {
        let current = std::mem::take(&mut self.session);
        self.session = transition(current, event);
        self.updates.send_replace(self.session.snapshot());
    }

    /// Run one Processing episode for the selected file and return the state
    /// it ends in.
    ///
    /// Does nothing if the session cannot start. Cancelling `cancel` while the
    /// request is in flight abandons it and resets the session.
    pub async fn process(&mut self, cancel: &CancellationToken) -> StatusKind {
        self.dispatch(Event::Start);
        if !self.session.is_processing() {
            return self.session.status().kind();
        }

        let episode = self.session.episode();
        let mode = self.session.mode();
        let Some(file) = self.session.file().cloned() else {
            self.dispatch(Event::Reset);
            return self.session.status().kind();
        };
        tracing::info!(episode, %mode, file = file.name(), size = file.size(), "Processing started");

        let (ticks_tx, mut ticks) = mpsc::unbounded_channel();
        let emitter = ProgressEmitter::spawn(episode, self.policy.period, ticks_tx);
        let mut request = spawn_submission(Arc::clone(&self.transfer), mode, file, self.deadline);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break None,
                joined = &mut request => {
                    break Some(joined.unwrap_or_else(|err| Err(TransferError::Aborted(err.to_string()))));
                }
                Some(tick) = ticks.recv() => self.dispatch(Event::Tick { episode: tick }),
            }
        };

        emitter.stop().await;
        drop(request);

        match outcome {
            Some(Ok(payload)) => {
                let result = self.store.insert(payload);
                tracing::info!(episode, size = result.len(), "Processing completed");
                self.dispatch(Event::Succeeded { episode, result });
            }
            Some(Err(err)) => {
                tracing::warn!(episode, error = %err, "Processing failed");
                self.dispatch(Event::Failed { episode });
            }
            None => {
                tracing::info!(episode, "Processing cancelled");
                self.dispatch(Event::Reset);
            }
        }
        self.session.status().kind()
    }
}

fn spawn_submission(
    transfer: Arc<dyn Transfer>,
    mode: Mode,
    file: FileBlob,
    deadline: Option<Duration>,
) -> AbortOnDropHandle<Result<Bytes, TransferError>> {
    AbortOnDropHandle::new(tokio::spawn(async move {
        let submission = transfer.submit(mode, &file);
        match deadline {
            Some(limit) => match time::timeout(limit, submission).await {
                Ok(result) => result,
                Err(_) => Err(TransferError::DeadlineExceeded(limit)),
            },
            None => submission.await,
        }
    }))
}
