//! Effect executor for a story session
//!
//! Owns the session, feeds events through the pure transition function and
//! performs the resulting effects. Proxy calls run on worker threads and
//! report back over a channel drained by `pump`.

use super::transport::ChatTransport;
use crate::session::{transition, Effect, Event, Session, TransitionError};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Failed to write transcript to {path}: {source}")]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub struct SessionDriver<T: ChatTransport> {
    session: Session,
    transport: Arc<T>,
    export_dir: PathBuf,
    replies_tx: mpsc::Sender<Event>,
    replies_rx: mpsc::Receiver<Event>,
    focus_requested: bool,
    last_export: Option<PathBuf>,
}

impl<T: ChatTransport> SessionDriver<T> {
    #[must_use]
    pub fn new(transport: T, export_dir: impl Into<PathBuf>) -> Self {
        let (replies_tx, replies_rx) = mpsc::channel();
        Self {
            session: Session::new(),
            transport: Arc::new(transport),
            export_dir: export_dir.into(),
            replies_tx,
            replies_rx,
            focus_requested: true,
            last_export: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Path of the most recent successful export
    #[must_use]
    pub fn last_export(&self) -> Option<&Path> {
        self.last_export.as_deref()
    }

    /// Returns true once after any transition asked for input focus
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Apply an event and execute its effects
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Transition`] when the session refuses the event
    /// and [`DriverError::Export`] when the transcript cannot be written.
    pub fn dispatch(&mut self, event: Event) -> Result<(), DriverError> {
        let result = transition(&self.session, event)?;
        self.session = result.session;
        for effect in result.effects {
            self.execute(effect)?;
        }
        Ok(())
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        // Input edits are accepted in every state
        let _ = self.dispatch(Event::InputChanged { text: text.into() });
    }

    /// Submit the current input buffer as the next user turn
    ///
    /// # Errors
    ///
    /// Fails when the input is blank or a reply is still pending.
    pub fn submit_input(&mut self) -> Result<(), DriverError> {
        let text = self.session.input.clone();
        self.dispatch(Event::submit(text))
    }

    pub fn reset(&mut self) {
        let _ = self.dispatch(Event::Reset);
    }

    /// Write the transcript to `story.md` in the export directory
    ///
    /// # Errors
    ///
    /// Fails when there is nothing to export, a reply is pending, or the
    /// file cannot be written.
    pub fn export(&mut self) -> Result<(), DriverError> {
        self.dispatch(Event::Export)
    }

    /// Timer callback, invoked by the hosting loop every `TICK_INTERVAL`
    pub fn tick(&mut self) {
        let _ = self.dispatch(Event::Tick);
    }

    /// Integrate finished proxy calls. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.replies_rx.try_recv() {
            if self.integrate(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until one proxy call finishes or `timeout` elapses
    pub fn wait_for_reply(&mut self, timeout: Duration) -> bool {
        match self.replies_rx.recv_timeout(timeout) {
            Ok(event) => self.integrate(event),
            Err(_) => false,
        }
    }

    fn integrate(&mut self, event: Event) -> bool {
        match self.dispatch(event) {
            Ok(()) => true,
            Err(DriverError::Transition(TransitionError::StaleResponse)) => {
                tracing::debug!("Discarding reply for a turn that is no longer pending");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to integrate reply");
                false
            }
        }
    }

    fn execute(&mut self, effect: Effect) -> Result<(), DriverError> {
        match effect {
            Effect::SendChat { turn, request } => {
                let transport = Arc::clone(&self.transport);
                let tx = self.replies_tx.clone();
                tracing::info!(%turn, messages = request.messages.len(), "Sending story turn");

                std::thread::spawn(move || {
                    let event = match transport.send(&request) {
                        Ok(message) => Event::Response { turn, message },
                        Err(e) if e.is_too_many_messages() => {
                            tracing::warn!(%turn, "Proxy refused story at history ceiling");
                            Event::HistoryRejected { turn }
                        }
                        Err(e) => {
                            tracing::error!(%turn, error = %e, "Story turn failed");
                            Event::TransportFailed {
                                turn,
                                error: e.to_string(),
                            }
                        }
                    };
                    // The driver may be gone already
                    let _ = tx.send(event);
                });
                Ok(())
            }
            Effect::SaveTranscript { file_name, contents } => {
                let path = self.export_dir.join(file_name);
                std::fs::write(&path, contents).map_err(|source| DriverError::Export {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(path = %path.display(), "Transcript exported");
                self.last_export = Some(path);
                Ok(())
            }
            Effect::FocusInput => {
                self.focus_requested = true;
                Ok(())
            }
        }
    }
}
