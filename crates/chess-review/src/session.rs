//! Engine session lifecycle.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use uci_protocol::{EngineCommand, EngineMessage};

use crate::sequencer::CommandSequencer;
use crate::transport::EngineTransport;

/// Errors that can occur when working with an engine session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Failed to spawn the engine process.
    #[error("Failed to spawn engine: {0}")]
    Spawn(#[from] std::io::Error),
    /// The UCI handshake did not complete.
    #[error("Engine initialization failed: {0}")]
    InitFailed(String),
    /// The transport closed before the request's terminal line arrived.
    #[error("Engine transport closed mid-request")]
    TransportClosed,
    /// The engine did not produce the terminal line within the bound.
    #[error("Engine did not respond within {0:?}")]
    Timeout(Duration),
    /// A request was made in a state that cannot serve it.
    #[error("Session is {0:?}, not accepting requests")]
    InvalidState(SessionState),
}

/// Lifecycle states of an [`EngineSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, handshake not yet performed.
    Uninitialized,
    /// Handshake in progress.
    Initializing,
    /// Idle and accepting evaluation requests.
    Ready,
    /// An evaluation request is in flight.
    Evaluating,
    /// Shut down; terminal.
    Terminated,
}

/// Configuration for an engine session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of principal variations the engine reports per position.
    pub multipv: u32,
    /// Upper bound on how long any single command batch may wait for its
    /// terminal line. A stalled engine fails the request instead of hanging
    /// the pipeline.
    pub response_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            multipv: 3,
            response_timeout: Duration::from_secs(30),
        }
    }
}

/// A session with one UCI engine.
///
/// Owns the transport exclusively and tracks the lifecycle state machine:
/// `Uninitialized -> Initializing -> Ready <-> Evaluating -> Terminated`,
/// with shutdown reachable from every non-terminal state. One session serves
/// many evaluations; independent sessions are fully isolated and may run
/// concurrently.
pub struct EngineSession {
    transport: EngineTransport,
    state: SessionState,
    config: EngineConfig,
    name: String,
}

impl EngineSession {
    /// Spawn the engine subprocess. Non-blocking; the UCI handshake happens
    /// in [`initialize`](Self::initialize).
    pub fn spawn<P: AsRef<Path>>(path: P, config: EngineConfig) -> Result<Self, SessionError> {
        let transport = EngineTransport::spawn(path)?;
        tracing::debug!("engine process spawned");
        Ok(Self::from_transport(transport, config))
    }

    /// Wrap an already-connected transport (a worker, an in-process engine).
    pub fn from_transport(transport: EngineTransport, config: EngineConfig) -> Self {
        Self {
            transport,
            state: SessionState::Uninitialized,
            config,
            name: String::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True only in [`SessionState::Ready`].
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Engine name as reported during the handshake, empty before then.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the transport into a [`CommandSequencer`] for one batch.
    ///
    /// The borrow is what serializes requests: no second sequencer can exist
    /// until the current batch has returned its terminal line.
    pub fn sequencer(&mut self) -> CommandSequencer<'_> {
        CommandSequencer::new(&mut self.transport, self.config.response_timeout)
    }

    pub(crate) fn send(&self, command: &EngineCommand) -> Result<(), SessionError> {
        self.transport.send(command.to_uci())
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    /// Perform the UCI handshake: `uci` until `uciok`, then MultiPV
    /// configuration and `isready` until `readyok`.
    ///
    /// Only valid from `Uninitialized`; double initialization is an
    /// [`SessionError::InvalidState`]. On failure the session reverts to
    /// `Uninitialized` so the caller may retry or recreate it.
    pub async fn initialize(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Uninitialized {
            return Err(SessionError::InvalidState(self.state));
        }
        self.state = SessionState::Initializing;

        match self.handshake().await {
            Ok(()) => {
                self.state = SessionState::Ready;
                tracing::info!(engine = %self.name, "engine session initialized");
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Uninitialized;
                Err(SessionError::InitFailed(err.to_string()))
            }
        }
    }

    async fn handshake(&mut self) -> Result<(), SessionError> {
        let multipv = self.config.multipv;
        let mut seq = self.sequencer();

        let lines = seq.send_commands(&[EngineCommand::Uci], "uciok").await?;
        let mut name = String::new();
        for line in &lines {
            if let EngineMessage::Id {
                name: Some(id_name),
                ..
            } = EngineMessage::parse(line)
            {
                name = id_name;
            }
        }

        seq.send_commands(
            &[
                EngineCommand::set_option("MultiPV", multipv),
                EngineCommand::IsReady,
            ],
            "readyok",
        )
        .await?;

        self.name = if name.is_empty() {
            "Unknown Engine".to_string()
        } else {
            name
        };
        Ok(())
    }

    /// Shut the session down: best-effort `quit`, then transport teardown.
    ///
    /// Idempotent; calling it on a terminated session does nothing. Teardown
    /// closes the inbound channel, so a request caught mid-flight resolves
    /// to [`SessionError::TransportClosed`] instead of dangling.
    pub async fn shutdown(&mut self) {
        if self.state == SessionState::Terminated {
            return;
        }
        let _ = self.transport.send(EngineCommand::Quit.to_uci());
        self.transport.close().await;
        self.state = SessionState::Terminated;
        tracing::info!("engine session shut down");
    }
}
